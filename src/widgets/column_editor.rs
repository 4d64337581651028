use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::columns::manager::ColumnPreferences;
use crate::config::IconConfig;
use crate::storage::KeyValueStore;
use crate::widget_traits::DebugInfoProvider;

/// One line of the editor: a column and which controls are enabled for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRow {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub checked: bool,
    pub toggle_enabled: bool,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

/// Build the editor rows for the current layout, in display order
pub fn editor_rows<T, S: KeyValueStore>(prefs: &ColumnPreferences<T, S>) -> Vec<EditorRow> {
    let columns = prefs.ordered_columns();
    let last = columns.len().saturating_sub(1);
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| EditorRow {
            id: column.id.clone(),
            label: column.label.clone(),
            description: column.description.clone(),
            checked: prefs.is_visible(&column.id),
            toggle_enabled: !column.toggle_locked,
            can_move_up: i > 0,
            can_move_down: i < last,
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ColumnEditorState {
    pub selected_index: usize,
}

/// Actions that can result from column editor interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnEditorAction {
    None,
    Close,
    Quit,
    Toggled { id: String, visible: bool },
    Moved { id: String, to_index: usize },
    Reset,
}

/// Popup listing every column with a visibility checkbox and up/down controls
pub struct ColumnEditorWidget {
    state: ColumnEditorState,
    icons: IconConfig,
    title: String,
}

impl ColumnEditorWidget {
    pub fn new(icons: IconConfig) -> Self {
        Self {
            state: ColumnEditorState::default(),
            icons,
            title: "Columns".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn selected_index(&self) -> usize {
        self.state.selected_index
    }

    pub fn selected_id<T, S: KeyValueStore>(
        &self,
        prefs: &ColumnPreferences<T, S>,
    ) -> Option<String> {
        prefs.column_order().get(self.state.selected_index).cloned()
    }

    /// Keep the selection inside the list after the column set changed
    pub fn clamp_selection(&mut self, len: usize) {
        self.state.selected_index = self.state.selected_index.min(len.saturating_sub(1));
    }

    /// Handle key input while the editor is open
    pub fn handle_key<T, S: KeyValueStore>(
        &mut self,
        key: KeyEvent,
        prefs: &mut ColumnPreferences<T, S>,
    ) -> ColumnEditorAction {
        let rows = editor_rows(prefs);
        self.clamp_selection(rows.len());
        let selected = rows.get(self.state.selected_index);

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ColumnEditorAction::Quit
            }
            KeyCode::Esc | KeyCode::Char('q') => ColumnEditorAction::Close,
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_selected(prefs, selected, true)
            }
            KeyCode::Char('K') => self.move_selected(prefs, selected, true),
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_selected(prefs, selected, false)
            }
            KeyCode::Char('J') => self.move_selected(prefs, selected, false),
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.selected_index = self.state.selected_index.saturating_sub(1);
                ColumnEditorAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.selected_index < rows.len().saturating_sub(1) {
                    self.state.selected_index += 1;
                }
                ColumnEditorAction::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.state.selected_index = 0;
                ColumnEditorAction::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.state.selected_index = rows.len().saturating_sub(1);
                ColumnEditorAction::None
            }
            KeyCode::Char(' ') | KeyCode::Enter => match selected {
                Some(row) if row.toggle_enabled => {
                    prefs.toggle_visibility(&row.id);
                    ColumnEditorAction::Toggled {
                        id: row.id.clone(),
                        visible: prefs.is_visible(&row.id),
                    }
                }
                _ => ColumnEditorAction::None,
            },
            KeyCode::Char('r') => {
                prefs.reset_to_defaults();
                self.clamp_selection(prefs.column_order().len());
                ColumnEditorAction::Reset
            }
            _ => ColumnEditorAction::None,
        }
    }

    /// Move the selected column one place and keep it selected
    fn move_selected<T, S: KeyValueStore>(
        &mut self,
        prefs: &mut ColumnPreferences<T, S>,
        selected: Option<&EditorRow>,
        up: bool,
    ) -> ColumnEditorAction {
        let Some(row) = selected else {
            return ColumnEditorAction::None;
        };
        let index = self.state.selected_index;
        let to_index = match (up, row.can_move_up, row.can_move_down) {
            (true, true, _) => index - 1,
            (false, _, true) => index + 1,
            _ => return ColumnEditorAction::None,
        };

        prefs.move_column(&row.id, to_index);
        self.state.selected_index = to_index;
        ColumnEditorAction::Moved {
            id: row.id.clone(),
            to_index,
        }
    }

    /// Render the editor into `area`, clearing whatever is underneath
    pub fn render<T, S: KeyValueStore>(
        &self,
        f: &mut Frame,
        area: Rect,
        prefs: &ColumnPreferences<T, S>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let rows = editor_rows(prefs);
        let items: Vec<ListItem> = rows.iter().map(|row| self.render_row(row)).collect();

        let hidden_count = prefs.hidden().len();
        let title = format!(
            "{} ({} shown, {} hidden)",
            self.title,
            rows.len() - hidden_count.min(rows.len()),
            hidden_count
        );

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("► ");

        let mut list_state = ListState::default();
        if !rows.is_empty() {
            list_state.select(Some(self.state.selected_index.min(rows.len() - 1)));
        }

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, chunks[0], &mut list_state);

        let help = Paragraph::new(format!(
            "Space toggle  K/J move  r {} reset  Esc close",
            self.icons.reset
        ))
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[1]);
    }

    fn render_row(&self, row: &EditorRow) -> ListItem<'static> {
        let enabled = Style::default().fg(Color::White);
        let disabled = Style::default().fg(Color::DarkGray);

        let check = if row.checked {
            &self.icons.visible
        } else {
            &self.icons.hidden
        };

        let mut spans = vec![
            Span::styled(
                format!("{} ", check),
                if row.toggle_enabled { enabled } else { disabled },
            ),
            Span::styled(row.label.clone(), enabled),
        ];
        if !row.toggle_enabled {
            spans.push(Span::styled(format!(" {}", self.icons.lock), disabled));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            self.icons.move_up.clone(),
            if row.can_move_up { enabled } else { disabled },
        ));
        spans.push(Span::styled(
            self.icons.move_down.clone(),
            if row.can_move_down { enabled } else { disabled },
        ));

        let mut lines = vec![Line::from(spans)];
        if let Some(description) = &row.description {
            lines.push(Line::from(Span::styled(
                format!("    {}", description),
                Style::default().fg(Color::Gray),
            )));
        }
        ListItem::new(lines)
    }
}

/// Rect of `percent_x` by `percent_y` centered inside `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

impl DebugInfoProvider for ColumnEditorWidget {
    fn debug_info(&self) -> String {
        let mut info = String::from("=== COLUMN EDITOR ===\n");
        info.push_str(&format!("Title: '{}'\n", self.title));
        info.push_str(&format!("Selected Index: {}\n", self.state.selected_index));
        info
    }

    fn debug_summary(&self) -> String {
        format!("ColumnEditor: idx={}", self.state.selected_index)
    }
}
