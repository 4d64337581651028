//! Utility functions and helpers
//!
//! Path discovery and logging setup shared by the library and the binary.

pub mod app_paths;
pub mod logging;
