//! Column layout preferences
//!
//! Descriptors describe the columns a table can show, `PreferenceState` is the
//! persisted order/hidden pair, and `ColumnPreferences` keeps the two
//! consistent and writes every change back to a `KeyValueStore`.

pub mod descriptor;
pub mod manager;
pub mod state;
