use ratatui::{
    layout::{Alignment as TextAlignment, Constraint, Margin, Rect},
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::columns::descriptor::{Alignment, ColumnDescriptor};
use crate::columns::manager::ColumnPreferences;
use crate::storage::KeyValueStore;

/// Renders rows through the visible columns of a [`ColumnPreferences`]
pub struct ColumnTableView {
    title: String,
    selected_row: Option<usize>,
}

impl ColumnTableView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            selected_row: None,
        }
    }

    pub fn select(&mut self, row: Option<usize>) {
        self.selected_row = row;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected_row
    }

    pub fn render<T, S: KeyValueStore>(
        &self,
        f: &mut Frame,
        area: Rect,
        prefs: &ColumnPreferences<T, S>,
        rows: &[T],
    ) {
        let columns = prefs.visible_columns();

        let header = Row::new(
            columns
                .iter()
                .map(|c| Cell::from(c.label.clone()))
                .collect::<Vec<_>>(),
        )
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| c.render(row)).collect())
            .collect();

        let widths: Vec<Constraint> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| Constraint::Length(column_width(c, &cells, i)))
            .collect();

        let body: Vec<Row> = cells
            .into_iter()
            .map(|values| {
                Row::new(
                    columns
                        .iter()
                        .zip(values)
                        .map(|(c, value)| Cell::from(aligned(c, value)))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let hidden = prefs.hidden().len();
        let title = if hidden > 0 {
            format!("{} ({} hidden)", self.title, hidden)
        } else {
            self.title.clone()
        };

        let table = Table::new(body, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .column_spacing(2);

        let mut state = TableState::default();
        state.select(self.selected_row);
        f.render_stateful_widget(table, area, &mut state);

        if rows.is_empty() {
            self.render_empty(f, area);
        }
    }

    /// Placeholder under the header when there is nothing to show
    fn render_empty(&self, f: &mut Frame, area: Rect) {
        let inner = area.inner(Margin::new(1, 1));
        if inner.height < 2 {
            return;
        }
        let below_header = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };

        let placeholder = Paragraph::new("No records")
            .alignment(TextAlignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, below_header);
    }
}

/// Widest of the label, the width hint and the sampled cells, capped
fn column_width<T>(column: &ColumnDescriptor<T>, cells: &[Vec<String>], index: usize) -> u16 {
    // For large tables, sample rows instead of checking all
    const MAX_ROWS_TO_CHECK: usize = 100;
    const MAX_WIDTH: usize = 50;

    let step = (cells.len() / MAX_ROWS_TO_CHECK).max(1);
    let content = cells
        .iter()
        .step_by(step)
        .filter_map(|row| row.get(index))
        .map(|value| value.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_WIDTH);

    column.display_width().max(u16::try_from(content).unwrap_or(u16::MAX))
}

fn aligned<T>(column: &ColumnDescriptor<T>, content: String) -> Text<'static> {
    let text = Text::from(content);
    match column.alignment {
        Alignment::Left => text.left_aligned(),
        Alignment::Center => text.centered(),
        Alignment::Right => text.right_aligned(),
    }
}
