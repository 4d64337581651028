use anyhow::{anyhow, Result};
use chrono::Local;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::app_paths::AppPaths;
use crate::config::config::LoggingConfig;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 500;

/// A log entry with timestamp and message
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Parse one line of the compact formatter: "LEVEL target: message"
    pub(crate) fn parse(line: &str) -> Self {
        let line = line.trim();
        let (level, rest) = match line.split_once(' ') {
            Some(("TRACE", rest)) => (Level::TRACE, rest),
            Some(("DEBUG", rest)) => (Level::DEBUG, rest),
            Some(("INFO", rest)) => (Level::INFO, rest),
            Some(("WARN", rest)) => (Level::WARN, rest),
            Some(("ERROR", rest)) => (Level::ERROR, rest),
            _ => return Self::new(Level::INFO, "general", line.to_string()),
        };

        // A target never contains spaces
        match rest.split_once(':') {
            Some((target, msg)) if !target.contains(' ') => {
                Self::new(level, target, msg.trim().to_string())
            }
            _ => Self::new(level, "general", rest.trim().to_string()),
        }
    }

    /// Format for the status line
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring buffer for log entries
#[derive(Clone, Default)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.len() >= MAX_LOG_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().rev().take(count).rev().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn latest(&self) -> Option<LogEntry> {
        self.entries.lock().ok()?.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writer that feeds formatted tracing output into a [`LogRingBuffer`]
#[derive(Clone)]
pub struct RingBufferWriter {
    buffer: LogRingBuffer,
}

impl RingBufferWriter {
    pub fn new(buffer: LogRingBuffer) -> Self {
        Self { buffer }
    }
}

impl std::io::Write for RingBufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                self.buffer.push(LogEntry::parse(line));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RingBufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// What `init_tracing` set up
pub struct LoggingHandle {
    pub buffer: LogRingBuffer,
    /// File receiving the full log, when file logging is enabled
    pub log_path: Option<PathBuf>,
}

/// Install the global subscriber: a file (or stderr) layer plus the ring buffer
///
/// `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<LoggingHandle> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, log_path) = if config.log_to_file {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = AppPaths::log_dir()?.join(format!("column-prefs_{}.log", timestamp));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        (BoxMakeWriter::new(Mutex::new(file)), Some(path))
    } else {
        (BoxMakeWriter::new(std::io::stderr), None)
    };

    let output_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false);

    let buffer = LogRingBuffer::new();
    let buffer_layer = fmt::layer()
        .with_writer(RingBufferWriter::new(buffer.clone()))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(output_layer)
        .with(buffer_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!(target: "logging", "Logging initialized at '{}'", config.level);

    Ok(LoggingHandle { buffer, log_path })
}
