use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use crate::columns::descriptor::Alignment;
use crate::columns::manager::ColumnPreferences;
use crate::storage::KeyValueStore;

/// Build a plain-text table of `rows` using only the visible columns
pub fn build_table<T, S: KeyValueStore>(prefs: &ColumnPreferences<T, S>, rows: &[T]) -> Table {
    let columns = prefs.visible_columns();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(&c.label).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for row in rows {
        table.add_row(
            columns
                .iter()
                .map(|c| Cell::new(c.render(row)).set_alignment(cell_alignment(c.alignment)))
                .collect::<Vec<_>>(),
        );
    }

    table
}

/// One line per column: position, visibility and lock state
pub fn layout_summary<T, S: KeyValueStore>(prefs: &ColumnPreferences<T, S>) -> Vec<String> {
    prefs
        .ordered_columns()
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{:>2}. [{}] {}{}",
                i + 1,
                if prefs.is_visible(&c.id) { "x" } else { " " },
                c.label,
                if c.toggle_locked { " (locked)" } else { "" }
            )
        })
        .collect()
}

pub fn display_rows<T, S: KeyValueStore>(prefs: &ColumnPreferences<T, S>, rows: &[T]) {
    if rows.is_empty() {
        println!("No rows.");
        return;
    }

    println!("{}", build_table(prefs, rows));
    println!(
        "\n{} rows, {} of {} columns shown",
        rows.len(),
        prefs.visible_columns().len(),
        prefs.column_order().len()
    );
}

fn cell_alignment(alignment: Alignment) -> CellAlignment {
    match alignment {
        Alignment::Left => CellAlignment::Left,
        Alignment::Center => CellAlignment::Center,
        Alignment::Right => CellAlignment::Right,
    }
}
