pub mod columns;
pub mod config;
pub mod storage;
pub mod table_display;
pub mod utils;
pub mod widget_traits;
pub mod widgets;

pub use columns::descriptor::{Alignment, ColumnDescriptor};
pub use columns::manager::{ColumnPreferences, SubscriptionId};
pub use columns::state::PreferenceState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
