// Behaviour of the column preference manager against an in-memory store

use anyhow::{anyhow, Result};
use column_prefs::{
    ColumnDescriptor, ColumnPreferences, KeyValueStore, MemoryStore, PreferenceState,
};
use std::cell::Cell;

#[derive(Debug, Clone)]
struct Visit {
    id: u32,
    visitor: &'static str,
}

fn col(id: &str) -> ColumnDescriptor<Visit> {
    ColumnDescriptor::new(id, id.to_uppercase(), |v: &Visit| format!("{}:{}", v.id, v.visitor))
}

fn ids(columns: &[&ColumnDescriptor<Visit>]) -> Vec<String> {
    columns.iter().map(|c| c.id.clone()).collect()
}

fn stored(store: &MemoryStore, key: &str) -> PreferenceState {
    PreferenceState::from_json(&store.get(key).unwrap().expect("layout was persisted")).unwrap()
}

/// Store whose reads and/or writes always fail
struct BrokenStore {
    fail_get: bool,
    fail_set: bool,
    writes: Cell<usize>,
}

impl BrokenStore {
    fn new(fail_get: bool, fail_set: bool) -> Self {
        Self {
            fail_get,
            fail_set,
            writes: Cell::new(0),
        }
    }
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        if self.fail_get {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_set {
            return Err(anyhow!("quota exceeded"));
        }
        Ok(())
    }
}

#[test]
fn test_fresh_key_uses_defaults() {
    let store = MemoryStore::new();
    let prefs = ColumnPreferences::new(
        "hex:columns:visits",
        vec![col("a"), col("b"), col("c").hidden_by_default()],
        store.clone(),
    );

    assert_eq!(ids(&prefs.ordered_columns()), vec!["a", "b", "c"]);
    assert_eq!(ids(&prefs.visible_columns()), vec!["a", "b"]);
    assert!(!prefs.is_visible("c"));

    // Defaults are written before any user action
    assert_eq!(
        stored(&store, "hex:columns:visits"),
        PreferenceState {
            order: vec!["a".into(), "b".into(), "c".into()],
            hidden: vec!["c".into()],
        }
    );
}

#[test]
fn test_new_default_hidden_column_is_appended_hidden() {
    let store = MemoryStore::new();
    store
        .set("k", r#"{"order":["b","a"],"hidden":[]}"#)
        .unwrap();

    let prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c").hidden_by_default()],
        store.clone(),
    );

    assert_eq!(prefs.column_order(), ["b", "a", "c"]);
    assert_eq!(prefs.hidden(), ["c"]);
    assert_eq!(stored(&store, "k").order, vec!["b", "a", "c"]);
}

#[test]
fn test_locked_column_is_dropped_from_stored_hidden() {
    let store = MemoryStore::new();
    store.set("k", r#"{"order":["a","b"],"hidden":["a"]}"#).unwrap();

    let prefs = ColumnPreferences::new("k", vec![col("a").locked(), col("b")], store.clone());

    assert!(prefs.is_visible("a"));
    assert!(prefs.hidden().is_empty());
    assert!(stored(&store, "k").hidden.is_empty());
}

#[test]
fn test_move_column_to_front() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c")],
        MemoryStore::new(),
    );

    assert!(prefs.move_column("b", 0));
    assert_eq!(prefs.column_order(), ["b", "a", "c"]);
}

#[test]
fn test_move_column_uses_index_after_removal() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c"), col("d")],
        MemoryStore::new(),
    );

    assert!(prefs.move_column("a", 2));
    assert_eq!(prefs.column_order(), ["b", "c", "a", "d"]);
    assert!(prefs.move_column("d", 0));
    assert_eq!(prefs.column_order(), ["d", "b", "c", "a"]);
}

#[test]
fn test_malformed_stored_state_falls_back_to_defaults() {
    for raw in [
        "{not json",
        r#"{"order":["a"]}"#,
        r#"{"order":null,"hidden":[]}"#,
        r#"{"order":["a"],"hidden":"a"}"#,
        r#"[]"#,
    ] {
        let store = MemoryStore::new();
        store.set("k", raw).unwrap();

        let prefs = ColumnPreferences::new(
            "k",
            vec![col("a"), col("b").hidden_by_default()],
            store.clone(),
        );
        assert_eq!(prefs.state(), prefs.defaults(), "input: {}", raw);
        // The broken document is replaced by the defaults
        assert_eq!(&stored(&store, "k"), prefs.defaults(), "input: {}", raw);
    }
}

#[test]
fn test_read_failure_falls_back_to_defaults() {
    let prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b").hidden_by_default()],
        BrokenStore::new(true, false),
    );
    assert_eq!(ids(&prefs.visible_columns()), vec!["a"]);
}

#[test]
fn test_write_failure_keeps_memory_state() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b")],
        BrokenStore::new(false, true),
    );

    assert!(prefs.toggle_visibility("b"));
    assert!(prefs.move_column("b", 0));
    assert_eq!(prefs.column_order(), ["b", "a"]);
    assert!(!prefs.is_visible("b"));
    // construction + two mutations all attempted a write
    assert_eq!(prefs.store().writes.get(), 3);
}

#[test]
fn test_toggle_is_self_inverse_and_persisted() {
    let store = MemoryStore::new();
    let mut prefs = ColumnPreferences::new("k", vec![col("a"), col("b")], store.clone());

    prefs.toggle_visibility("b");
    assert!(!prefs.is_visible("b"));
    assert_eq!(stored(&store, "k").hidden, vec!["b"]);

    prefs.toggle_visibility("b");
    assert!(prefs.is_visible("b"));
    assert!(stored(&store, "k").hidden.is_empty());
}

#[test]
fn test_toggle_ignores_locked_and_unknown_ids() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a").locked(), col("b")],
        MemoryStore::new(),
    );

    assert!(!prefs.toggle_visibility("a"));
    assert!(!prefs.toggle_visibility("ghost"));
    assert!(prefs.is_visible("a"));
    assert!(prefs.hidden().is_empty());
    assert_eq!(prefs.version(), 0);
}

#[test]
fn test_move_column_ignores_invalid_requests() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c")],
        MemoryStore::new(),
    );

    assert!(!prefs.move_column("ghost", 0));
    assert!(!prefs.move_column("a", 3));
    assert!(!prefs.move_column("a", usize::MAX));
    assert!(!prefs.move_column("b", 1));
    assert_eq!(prefs.column_order(), ["a", "b", "c"]);
}

#[test]
fn test_reset_restores_defaults_and_persists() {
    let store = MemoryStore::new();
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c").hidden_by_default()],
        store.clone(),
    );

    prefs.toggle_visibility("c");
    prefs.toggle_visibility("a");
    prefs.move_column("c", 0);
    prefs.reset_to_defaults();

    assert_eq!(prefs.state(), prefs.defaults());
    assert_eq!(&stored(&store, "k"), prefs.defaults());
}

#[test]
fn test_layout_survives_new_session() {
    let store = MemoryStore::new();
    {
        let mut prefs =
            ColumnPreferences::new("k", vec![col("a"), col("b"), col("c")], store.clone());
        prefs.toggle_visibility("a");
        prefs.move_column("c", 0);
    }

    let prefs = ColumnPreferences::new("k", vec![col("a"), col("b"), col("c")], store.clone());
    assert_eq!(prefs.column_order(), ["c", "a", "b"]);
    assert_eq!(prefs.hidden(), ["a"]);
}

#[test]
fn test_revealed_default_hidden_column_stays_visible_across_schema_change() {
    let store = MemoryStore::new();
    {
        let mut prefs = ColumnPreferences::new(
            "k",
            vec![col("a"), col("b").hidden_by_default()],
            store.clone(),
        );
        prefs.toggle_visibility("b");
        assert!(prefs.is_visible("b"));
    }

    // A release adds "c"; the user's choice for "b" must hold
    let prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b").hidden_by_default(), col("c")],
        store.clone(),
    );
    assert!(prefs.is_visible("b"));
    assert_eq!(prefs.column_order(), ["a", "b", "c"]);
}

#[test]
fn test_removed_columns_disappear_from_state() {
    let store = MemoryStore::new();
    store
        .set("k", r#"{"order":["legacy","b","a"],"hidden":["legacy","b"]}"#)
        .unwrap();

    let prefs = ColumnPreferences::new("k", vec![col("a"), col("b")], store);
    assert_eq!(prefs.column_order(), ["b", "a"]);
    assert_eq!(prefs.hidden(), ["b"]);
}

#[test]
fn test_set_descriptors_reconciles_role_columns() {
    let store = MemoryStore::new();
    let mut prefs = ColumnPreferences::new("k", vec![col("a"), col("b")], store.clone());
    prefs.move_column("b", 0);

    // An admin column appears at the end, hidden by default
    assert!(prefs.set_descriptors(vec![col("a"), col("b"), col("audit").hidden_by_default()]));
    assert_eq!(prefs.column_order(), ["b", "a", "audit"]);
    assert_eq!(prefs.hidden(), ["audit"]);
    assert_eq!(stored(&store, "k").order, vec!["b", "a", "audit"]);

    // And goes away again
    assert!(prefs.set_descriptors(vec![col("a"), col("b")]));
    assert_eq!(prefs.column_order(), ["b", "a"]);
    assert!(prefs.hidden().is_empty());
    assert_eq!(ids(&prefs.ordered_columns()), vec!["b", "a"]);
}

#[test]
fn test_set_descriptors_locking_a_hidden_column_reveals_it() {
    let mut prefs = ColumnPreferences::new("k", vec![col("a"), col("b")], MemoryStore::new());
    prefs.toggle_visibility("b");

    assert!(prefs.set_descriptors(vec![col("a"), col("b").locked()]));
    assert!(prefs.is_visible("b"));
}

#[test]
fn test_stale_id_after_descriptor_change_is_inert() {
    let mut prefs = ColumnPreferences::new(
        "k",
        vec![col("a"), col("b"), col("c")],
        MemoryStore::new(),
    );
    prefs.set_descriptors(vec![col("a"), col("b")]);

    assert!(!prefs.toggle_visibility("c"));
    assert!(!prefs.move_column("c", 0));
    assert_eq!(prefs.column_order(), ["a", "b"]);
    assert!(prefs.hidden().is_empty());
}

#[test]
fn test_instances_sharing_a_key_last_write_wins() {
    let store = MemoryStore::new();
    let mut first = ColumnPreferences::new("k", vec![col("a"), col("b")], store.clone());
    let mut second = ColumnPreferences::new("k", vec![col("a"), col("b")], store.clone());

    first.toggle_visibility("a");
    second.move_column("b", 0);

    assert_eq!(
        stored(&store, "k"),
        PreferenceState {
            order: vec!["b".into(), "a".into()],
            hidden: vec![],
        }
    );
    // Each instance keeps its own in-memory view
    assert!(!first.is_visible("a"));
}

#[test]
fn test_visible_columns_render_cells() {
    let mut prefs = ColumnPreferences::new("k", vec![col("a"), col("b")], MemoryStore::new());
    prefs.toggle_visibility("a");

    let row = Visit {
        id: 7,
        visitor: "Nadia",
    };
    let cells: Vec<String> = prefs.visible_columns().iter().map(|c| c.render(&row)).collect();
    assert_eq!(cells, vec!["7:Nadia"]);
}
