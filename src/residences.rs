use column_prefs::{Alignment, ColumnDescriptor};

pub const STORAGE_KEY: &str = "hex:columns:residences";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidenceKind {
    Tower,
    Villa,
    Amenity,
    Parcel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidenceStatus {
    Occupied,
    Vacant,
    Maintenance,
}

#[derive(Debug, Clone)]
pub struct ResidenceRecord {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ResidenceKind,
    pub status: ResidenceStatus,
    pub residents: Vec<&'static str>,
    pub bedrooms: u8,
    pub area_sq_ft: u32,
    pub site_name: &'static str,
    pub last_inspection: &'static str,
}

impl ResidenceKind {
    fn label(self) -> &'static str {
        match self {
            ResidenceKind::Tower => "High-rise",
            ResidenceKind::Villa => "Villa",
            ResidenceKind::Amenity => "Amenity",
            ResidenceKind::Parcel => "Parcel",
        }
    }
}

impl ResidenceStatus {
    fn label(self) -> &'static str {
        match self {
            ResidenceStatus::Occupied => "Occupied",
            ResidenceStatus::Vacant => "Vacant",
            ResidenceStatus::Maintenance => "Maintenance",
        }
    }
}

/// Columns of the residences table; `admin` adds the inspection column
pub fn residence_columns(admin: bool) -> Vec<ColumnDescriptor<ResidenceRecord>> {
    let mut columns = vec![
        ColumnDescriptor::new("label", "Residence", |r: &ResidenceRecord| {
            format!("{} ({})", r.label, r.id)
        })
        .with_min_width(22)
        .locked(),
        ColumnDescriptor::new("status", "Status", |r: &ResidenceRecord| {
            r.status.label().to_string()
        })
        .with_min_width(12),
        ColumnDescriptor::new("residents", "Residents", |r: &ResidenceRecord| {
            if r.residents.is_empty() {
                "No residents".to_string()
            } else {
                r.residents.join(", ")
            }
        })
        .with_min_width(20),
        ColumnDescriptor::new("layout", "Layout", |r: &ResidenceRecord| {
            if r.bedrooms > 0 {
                format!("{} BR", r.bedrooms)
            } else {
                "N/A".to_string()
            }
        })
        .with_min_width(8),
        ColumnDescriptor::new("area", "Area (sq ft)", |r: &ResidenceRecord| {
            r.area_sq_ft.to_string()
        })
        .align(Alignment::Right)
        .hidden_by_default(),
        ColumnDescriptor::new("type", "Type", |r: &ResidenceRecord| {
            r.kind.label().to_string()
        })
        .with_description("Building category")
        .hidden_by_default(),
        ColumnDescriptor::new("site", "Site", |r: &ResidenceRecord| {
            r.site_name.to_string()
        })
        .with_min_width(14),
    ];

    if admin {
        columns.push(
            ColumnDescriptor::new("inspection", "Last inspection", |r: &ResidenceRecord| {
                match r.status {
                    ResidenceStatus::Maintenance => format!("{} (follow-up)", r.last_inspection),
                    _ => r.last_inspection.to_string(),
                }
            })
            .with_description("Admins only")
            .with_min_width(16),
        );
    }

    columns
}

pub fn sample_residences() -> Vec<ResidenceRecord> {
    vec![
        ResidenceRecord {
            id: "R-1001",
            label: "Tower A 1201",
            kind: ResidenceKind::Tower,
            status: ResidenceStatus::Occupied,
            residents: vec!["Amira Haddad", "Omar Haddad"],
            bedrooms: 2,
            area_sq_ft: 1180,
            site_name: "Marina Heights",
            last_inspection: "2024-03-12",
        },
        ResidenceRecord {
            id: "R-1002",
            label: "Tower A 1202",
            kind: ResidenceKind::Tower,
            status: ResidenceStatus::Vacant,
            residents: vec![],
            bedrooms: 1,
            area_sq_ft: 760,
            site_name: "Marina Heights",
            last_inspection: "2024-02-28",
        },
        ResidenceRecord {
            id: "R-2040",
            label: "Villa 40",
            kind: ResidenceKind::Villa,
            status: ResidenceStatus::Maintenance,
            residents: vec!["Lina Farouk"],
            bedrooms: 4,
            area_sq_ft: 3420,
            site_name: "Palm Grove",
            last_inspection: "2024-04-02",
        },
        ResidenceRecord {
            id: "R-3001",
            label: "Clubhouse",
            kind: ResidenceKind::Amenity,
            status: ResidenceStatus::Occupied,
            residents: vec![],
            bedrooms: 0,
            area_sq_ft: 5200,
            site_name: "Palm Grove",
            last_inspection: "2024-01-19",
        },
        ResidenceRecord {
            id: "R-4107",
            label: "Plot 7",
            kind: ResidenceKind::Parcel,
            status: ResidenceStatus::Vacant,
            residents: vec![],
            bedrooms: 0,
            area_sq_ft: 9800,
            site_name: "Desert Ridge",
            last_inspection: "2023-12-07",
        },
    ]
}
