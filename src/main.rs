use anyhow::Result;
use column_prefs::config::Config;
use column_prefs::table_display::{display_rows, layout_summary};
use column_prefs::utils::logging::{init_tracing, LogRingBuffer};
use column_prefs::widget_traits::DebugInfoProvider;
use column_prefs::widgets::column_editor::{centered_rect, ColumnEditorAction, ColumnEditorWidget};
use column_prefs::widgets::table_view::ColumnTableView;
use column_prefs::{ColumnPreferences, FileStore};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info};

mod residences;

use residences::{residence_columns, sample_residences, ResidenceRecord, STORAGE_KEY};

fn print_help() {
    println!("column-prefs - residences console with remembered column layout");
    println!();
    println!("Usage: column-prefs [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --print          Print the current layout and table, then exit");
    println!("  --reset          Reset the stored layout to defaults");
    println!("  --admin          Include admin-only columns");
    println!("  --key KEY        Storage key (default: {})", STORAGE_KEY);
    println!("  --store FILE     Preference store document");
    println!("  --config-init    Write a commented config file and exit");
    println!("  -h, --help       Show this help");
    println!();
    println!("Keys: c columns, a admin view, j/k rows, q quit");
}

#[derive(Debug, Default)]
struct Args {
    print: bool,
    reset: bool,
    admin: bool,
    key: Option<String>,
    store: Option<PathBuf>,
    config_init: bool,
    help: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--print" => args.print = true,
            "--reset" => args.reset = true,
            "--admin" => args.admin = true,
            "--config-init" => args.config_init = true,
            "-h" | "--help" => args.help = true,
            "--key" => {
                args.key = Some(
                    iter.next()
                        .ok_or_else(|| anyhow::anyhow!("--key needs a value"))?,
                )
            }
            "--store" => {
                args.store = Some(PathBuf::from(
                    iter.next()
                        .ok_or_else(|| anyhow::anyhow!("--store needs a value"))?,
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    if args.help {
        print_help();
        return Ok(());
    }

    if args.config_init {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Using default config: {:#}", e);
        Config::default()
    });

    let logs = match init_tracing(&config.logging) {
        Ok(handle) => {
            if let Some(path) = &handle.log_path {
                eprintln!("Logging to {}", path.display());
            }
            handle.buffer
        }
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            LogRingBuffer::new()
        }
    };

    let store_path = match args.store.clone() {
        Some(path) => path,
        None => config.preferences_file()?,
    };
    let store = FileStore::new(&store_path).with_pretty(config.storage.pretty_json);
    let key = args.key.clone().unwrap_or_else(|| STORAGE_KEY.to_string());
    info!(target: "console", "Using store {} with key '{}'", store_path.display(), key);

    let mut prefs = ColumnPreferences::new(key, residence_columns(args.admin), store);
    if args.reset {
        prefs.reset_to_defaults();
        println!("Column layout reset for '{}'", prefs.storage_key());
    }

    let rows = sample_residences();
    if args.print {
        for line in layout_summary(&prefs) {
            println!("{}", line);
        }
        println!();
        display_rows(&prefs, &rows);
        return Ok(());
    }
    if args.reset {
        return Ok(());
    }

    let app = ConsoleApp::new(prefs, rows, &config, logs, args.admin);
    app.run()
}

struct ConsoleApp {
    prefs: ColumnPreferences<ResidenceRecord, FileStore>,
    rows: Vec<ResidenceRecord>,
    table: ColumnTableView,
    editor: ColumnEditorWidget,
    editor_open: bool,
    admin: bool,
    logs: LogRingBuffer,
}

impl ConsoleApp {
    fn new(
        prefs: ColumnPreferences<ResidenceRecord, FileStore>,
        rows: Vec<ResidenceRecord>,
        config: &Config,
        logs: LogRingBuffer,
        admin: bool,
    ) -> Self {
        let mut table = ColumnTableView::new("Residences");
        if !rows.is_empty() {
            table.select(Some(0));
        }
        Self {
            prefs,
            rows,
            table,
            editor: ColumnEditorWidget::new(config.display.icons.clone()),
            editor_open: false,
            admin,
            logs,
        }
    }

    fn run(mut self) -> Result<()> {
        enable_raw_mode()
            .map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}. Try --print.", e))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = disable_raw_mode();
                return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
            }
        };

        let res = self.run_app(&mut terminal);

        // Always restore terminal, even on error
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if self.editor_open {
                match self.editor.handle_key(key, &mut self.prefs) {
                    ColumnEditorAction::Quit => return Ok(()),
                    ColumnEditorAction::Close => self.editor_open = false,
                    ColumnEditorAction::None => {}
                    action => debug!(target: "console", "Editor action {:?}", action),
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char('c') => {
                    self.editor_open = true;
                    debug!(target: "console", "{}", self.editor.debug_summary());
                }
                KeyCode::Char('a') => self.toggle_admin(),
                KeyCode::Down | KeyCode::Char('j') => self.step_row(1),
                KeyCode::Up | KeyCode::Char('k') => self.step_row(-1),
                _ => {}
            }
        }
    }

    /// Switch between the resident and admin column sets
    fn toggle_admin(&mut self) {
        self.admin = !self.admin;
        self.prefs.set_descriptors(residence_columns(self.admin));
        self.editor.clamp_selection(self.prefs.column_order().len());
        info!(target: "console", "Admin view {}", if self.admin { "on" } else { "off" });
    }

    fn step_row(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.rows.len() - 1);
        self.table.select(Some(next));
    }

    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(f.area());

        self.table.render(f, chunks[0], &self.prefs, &self.rows);

        let status = match self.logs.latest() {
            Some(entry) => format!("{} | {}", self.key_hints(), entry.message),
            None => self.key_hints(),
        };
        f.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );

        if self.editor_open {
            let area = centered_rect(50, 70, chunks[0]);
            self.editor.render(f, area, &self.prefs);
        }
    }

    fn key_hints(&self) -> String {
        format!(
            "c columns  a admin ({})  q quit",
            if self.admin { "on" } else { "off" }
        )
    }
}
