//! UI widgets for the terminal console
//!
//! The column editor and the table view both read from a `ColumnPreferences`
//! and only call its public operations.

pub mod column_editor;
pub mod table_view;
