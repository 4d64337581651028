//! Configuration module
//!
//! Settings for the preference store location, editor glyphs and logging.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::{Config, DisplayConfig, IconConfig, LoggingConfig, StorageConfig};
