use std::fmt;
use std::sync::Arc;

/// Horizontal alignment hint for a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Produces the display text of one cell for a row
pub type CellRenderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Static definition of one table column
///
/// Only `id`, `label`, `default_visible` and `toggle_locked` matter to the
/// preference manager. The remaining fields are carried for the rendering layer.
pub struct ColumnDescriptor<T> {
    pub id: String,
    pub label: String,
    /// Secondary text shown under the label in the column editor
    pub description: Option<String>,
    pub default_visible: bool,
    /// Locked columns are always rendered and can never be hidden
    pub toggle_locked: bool,
    pub min_width: Option<u16>,
    pub alignment: Alignment,
    render: CellRenderer<T>,
}

impl<T> ColumnDescriptor<T> {
    pub fn new<F>(id: impl Into<String>, label: impl Into<String>, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            default_visible: true,
            toggle_locked: false,
            min_width: None,
            alignment: Alignment::default(),
            render: Arc::new(render),
        }
    }

    /// Start the column hidden until the user reveals it
    pub fn hidden_by_default(mut self) -> Self {
        self.default_visible = false;
        self
    }

    /// Prevent the user from hiding this column
    pub fn locked(mut self) -> Self {
        self.toggle_locked = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Render the cell for `row`
    pub fn render(&self, row: &T) -> String {
        (self.render)(row)
    }

    /// Width to reserve for this column: the hint if present, else the label
    pub fn display_width(&self) -> u16 {
        let label_width = u16::try_from(self.label.chars().count()).unwrap_or(u16::MAX);
        self.min_width.unwrap_or(label_width).max(label_width)
    }

    /// Is the column hidden when no user choice exists for it
    pub(crate) fn starts_hidden(&self) -> bool {
        !self.default_visible && !self.toggle_locked
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            default_visible: self.default_visible,
            toggle_locked: self.toggle_locked,
            min_width: self.min_width,
            alignment: self.alignment,
            render: Arc::clone(&self.render),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("default_visible", &self.default_visible)
            .field("toggle_locked", &self.toggle_locked)
            .field("min_width", &self.min_width)
            .field("alignment", &self.alignment)
            .finish_non_exhaustive()
    }
}

/// The parts of a descriptor list that affect reconciliation
///
/// Two lists with equal signatures reconcile identically, so swapping one for
/// the other only needs to replace render callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DescriptorSignature(Vec<(String, String, bool, bool)>);

impl DescriptorSignature {
    pub(crate) fn of<T>(descriptors: &[ColumnDescriptor<T>]) -> Self {
        Self(
            descriptors
                .iter()
                .map(|d| {
                    (
                        d.id.clone(),
                        d.label.clone(),
                        d.default_visible,
                        d.toggle_locked,
                    )
                })
                .collect(),
        )
    }
}
