// Preferences persisted through the JSON file store

use column_prefs::{ColumnDescriptor, ColumnPreferences, FileStore, KeyValueStore};
use std::fs;
use tempfile::tempdir;

fn columns() -> Vec<ColumnDescriptor<()>> {
    vec![
        ColumnDescriptor::new("visitor", "Visitor", |_: &()| String::new()).locked(),
        ColumnDescriptor::new("vehicle", "Vehicle", |_: &()| String::new()),
        ColumnDescriptor::new("host", "Host", |_: &()| String::new()).hidden_by_default(),
    ]
}

#[test]
fn test_layout_round_trips_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let mut prefs =
            ColumnPreferences::new("hex:columns:visits", columns(), FileStore::new(&path));
        prefs.toggle_visibility("host");
        prefs.move_column("host", 0);
    }

    let prefs = ColumnPreferences::new("hex:columns:visits", columns(), FileStore::new(&path));
    assert_eq!(prefs.column_order(), ["host", "visitor", "vehicle"]);
    assert!(prefs.hidden().is_empty());
}

#[test]
fn test_keys_do_not_interfere() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("prefs.json"));

    let mut visits = ColumnPreferences::new("hex:columns:visits", columns(), store.clone());
    let visitors = ColumnPreferences::new("hex:columns:visitors", columns(), store.clone());
    visits.toggle_visibility("vehicle");

    let reloaded = ColumnPreferences::new("hex:columns:visitors", columns(), store.clone());
    assert!(reloaded.is_visible("vehicle"));
    assert_eq!(reloaded.state(), visitors.state());
    assert!(store.get("hex:columns:visits").unwrap().unwrap().contains("vehicle"));
}

#[test]
fn test_corrupt_file_falls_back_and_is_repaired() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "{ this is not json").unwrap();

    let store = FileStore::new(&path);
    assert!(store.get("hex:columns:visits").is_err());

    let prefs = ColumnPreferences::new("hex:columns:visits", columns(), store.clone());
    assert_eq!(prefs.hidden(), ["host"]);

    // The constructor rewrote the document with the defaults
    let raw = store.get("hex:columns:visits").unwrap().unwrap();
    assert_eq!(raw, r#"{"order":["visitor","vehicle","host"],"hidden":["host"]}"#);
}

#[test]
fn test_compact_document_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let _prefs = ColumnPreferences::new("k", columns(), FileStore::new(&path).compact());

    let content = fs::read_to_string(&path).unwrap();
    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    let inner: serde_json::Value = serde_json::from_str(document["k"].as_str().unwrap()).unwrap();
    assert_eq!(inner["order"], serde_json::json!(["visitor", "vehicle", "host"]));
    assert_eq!(inner["hidden"], serde_json::json!(["host"]));
}

#[test]
fn test_unwritable_location_is_absorbed() {
    let dir = tempdir().unwrap();
    // A directory where the document should be makes every write fail
    let path = dir.path().join("prefs.json");
    fs::create_dir_all(&path).unwrap();

    let mut prefs = ColumnPreferences::new("k", columns(), FileStore::new(&path));
    assert!(prefs.toggle_visibility("vehicle"));
    assert!(!prefs.is_visible("vehicle"));
}

#[test]
fn test_malformed_sibling_entry_leaves_other_keys_intact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    let document = serde_json::json!({
        "visits": r#"{"order":["vehicle","visitor"],"hidden":["vehicle"]}"#,
        "hosts": {"order": ["visitor"], "hidden": []},
    });
    fs::write(&path, document.to_string()).unwrap();

    let store = FileStore::new(&path);
    let visits = ColumnPreferences::new("visits", columns(), store.clone());
    assert_eq!(visits.column_order(), ["vehicle", "visitor", "host"]);
    assert_eq!(visits.hidden(), ["vehicle", "host"]);

    // The hand-edited entry reads as nothing stored, for its own key only
    let hosts = ColumnPreferences::new("hosts", columns(), store.clone());
    assert_eq!(hosts.state(), hosts.defaults());

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(document["visits"].as_str().unwrap().contains("vehicle"));
    assert!(document["hosts"].is_string());
}

#[test]
fn test_write_keeps_untouched_non_string_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"notes":{"keep":true}}"#).unwrap();

    let _prefs = ColumnPreferences::new("visits", columns(), FileStore::new(&path));

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["notes"], serde_json::json!({"keep": true}));
    assert!(document["visits"].is_string());
}
