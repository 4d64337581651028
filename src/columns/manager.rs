use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

use super::descriptor::{ColumnDescriptor, DescriptorSignature};
use super::state::{reconcile, PreferenceState};
use crate::storage::KeyValueStore;

/// Handle returned by [`ColumnPreferences::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&PreferenceState)>;

/// Remembers which columns of one table are hidden and in what order they appear
///
/// The layout is loaded from `store` under `storage_key`, reconciled against the
/// descriptors, and written back after every change. No operation fails: stale
/// ids, bad indices and storage errors are absorbed so the editing UI never has
/// to handle an error.
pub struct ColumnPreferences<T, S: KeyValueStore> {
    storage_key: String,
    descriptors: Vec<ColumnDescriptor<T>>,
    /// Descriptor id -> index into `descriptors`
    index: HashMap<String, usize>,
    signature: DescriptorSignature,
    defaults: PreferenceState,
    state: PreferenceState,
    store: S,
    version: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<T, S: KeyValueStore> ColumnPreferences<T, S> {
    pub fn new(
        storage_key: impl Into<String>,
        descriptors: Vec<ColumnDescriptor<T>>,
        store: S,
    ) -> Self {
        let storage_key = storage_key.into();
        let defaults = PreferenceState::defaults(&descriptors);
        let loaded = Self::load(&store, &storage_key);
        let had_stored_state = loaded.is_some();
        let stored = loaded.unwrap_or_else(|| defaults.clone());

        let mut prefs = Self {
            storage_key,
            index: build_index(&descriptors),
            signature: DescriptorSignature::of(&descriptors),
            descriptors,
            defaults,
            state: PreferenceState::default(),
            store,
            version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        };

        prefs.state = prefs.reconciled(&stored);
        if had_stored_state && prefs.state != stored {
            info!(
                target: "column_prefs",
                "Reconciled stored layout for '{}' against {} columns",
                prefs.storage_key,
                prefs.descriptors.len()
            );
        }
        prefs.persist();
        prefs
    }

    /// Read the stored layout, treating every failure as "nothing stored"
    fn load(store: &S, storage_key: &str) -> Option<PreferenceState> {
        let raw = match store.get(storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(target: "column_prefs", "No stored layout for '{}'", storage_key);
                return None;
            }
            Err(e) => {
                warn!(
                    target: "column_prefs",
                    "Failed to read layout for '{}': {:#}", storage_key, e
                );
                return None;
            }
        };

        match PreferenceState::from_json(&raw) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    target: "column_prefs",
                    "Ignoring malformed layout for '{}': {}", storage_key, e
                );
                None
            }
        }
    }

    fn reconciled(&self, state: &PreferenceState) -> PreferenceState {
        let descriptor_ids: Vec<String> = self.descriptors.iter().map(|d| d.id.clone()).collect();
        let locked_ids: Vec<String> = self
            .descriptors
            .iter()
            .filter(|d| d.toggle_locked)
            .map(|d| d.id.clone())
            .collect();
        reconcile(state, &self.defaults, &descriptor_ids, &locked_ids)
    }

    /// Write the current layout to the store; failures only get logged
    fn persist(&self) {
        let raw = match self.state.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                warn!(target: "column_prefs", "Failed to serialize layout: {:#}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(&self.storage_key, &raw) {
            warn!(
                target: "column_prefs",
                "Failed to save layout for '{}': {:#}", self.storage_key, e
            );
        }
    }

    /// Persist and tell observers about a state change
    fn commit(&mut self) {
        self.persist();
        self.version += 1;
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
    }

    /// All columns in display order
    pub fn ordered_columns(&self) -> Vec<&ColumnDescriptor<T>> {
        self.state
            .order
            .iter()
            .filter_map(|id| self.index.get(id).map(|&i| &self.descriptors[i]))
            .collect()
    }

    /// Columns that should be rendered, in display order
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor<T>> {
        self.ordered_columns()
            .into_iter()
            .filter(|d| !self.state.is_hidden(&d.id))
            .collect()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        !self.state.is_hidden(id)
    }

    pub fn hidden(&self) -> &[String] {
        &self.state.hidden
    }

    pub fn column_order(&self) -> &[String] {
        &self.state.order
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.state.position(id)
    }

    pub fn descriptor(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.index.get(id).map(|&i| &self.descriptors[i])
    }

    /// Show a hidden column or hide a shown one
    ///
    /// Locked and unknown ids are left alone. Returns whether anything changed.
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        match self.descriptor(id) {
            None => {
                debug!(target: "column_prefs", "Ignoring toggle of unknown column '{}'", id);
                return false;
            }
            Some(d) if d.toggle_locked => {
                debug!(target: "column_prefs", "Ignoring toggle of locked column '{}'", id);
                return false;
            }
            Some(_) => {}
        }

        if let Some(pos) = self.state.hidden.iter().position(|h| h == id) {
            self.state.hidden.remove(pos);
        } else {
            self.state.hidden.push(id.to_string());
        }
        debug!(target: "column_prefs", "Column '{}' visible={}", id, self.is_visible(id));
        self.commit();
        true
    }

    /// Move a column to `to_index` in the display order
    ///
    /// The column is removed first and then inserted at `to_index` of the
    /// shortened list. Unknown ids, indices past the end and moves onto the
    /// current position are ignored.
    pub fn move_column(&mut self, id: &str, to_index: usize) -> bool {
        let Some(from_index) = self.state.position(id) else {
            return false;
        };
        if to_index >= self.state.order.len() || to_index == from_index {
            return false;
        }

        let column = self.state.order.remove(from_index);
        self.state.order.insert(to_index, column);
        debug!(target: "column_prefs", "Moved column '{}' from {} to {}", id, from_index, to_index);
        self.commit();
        true
    }

    /// Move a column one place towards the front; no wraparound
    pub fn move_column_up(&mut self, id: &str) -> bool {
        match self.state.position(id) {
            Some(pos) if pos > 0 => self.move_column(id, pos - 1),
            _ => false,
        }
    }

    /// Move a column one place towards the back; no wraparound
    pub fn move_column_down(&mut self, id: &str) -> bool {
        match self.state.position(id) {
            Some(pos) => self.move_column(id, pos + 1),
            None => false,
        }
    }

    /// Throw away the user's layout and go back to the descriptor defaults
    pub fn reset_to_defaults(&mut self) {
        self.state = self.defaults.clone();
        info!(target: "column_prefs", "Reset layout for '{}'", self.storage_key);
        self.commit();
    }

    /// Replace the column set, e.g. when a role adds or removes columns
    ///
    /// The stored layout is only reconciled again when ids, labels, lock flags
    /// or default visibility changed; otherwise just the render callbacks are
    /// swapped. Returns whether the layout changed.
    pub fn set_descriptors(&mut self, descriptors: Vec<ColumnDescriptor<T>>) -> bool {
        let signature = DescriptorSignature::of(&descriptors);
        self.index = build_index(&descriptors);
        self.descriptors = descriptors;
        if signature == self.signature {
            return false;
        }

        self.signature = signature;
        self.defaults = PreferenceState::defaults(&self.descriptors);
        let next = self.reconciled(&self.state);
        if next == self.state {
            return false;
        }

        debug!(
            target: "column_prefs",
            "Column set for '{}' changed, now {} columns", self.storage_key, self.descriptors.len()
        );
        self.state = next;
        self.commit();
        true
    }

    /// Register a callback that runs after every layout change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&PreferenceState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Bumped on every layout change; cheap to poll from a render loop
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn defaults(&self) -> &PreferenceState {
        &self.defaults
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor<T>] {
        &self.descriptors
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn build_index<T>(descriptors: &[ColumnDescriptor<T>]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(descriptors.len());
    for (i, d) in descriptors.iter().enumerate() {
        if index.contains_key(&d.id) {
            warn!(target: "column_prefs", "Duplicate column id '{}' ignored", d.id);
            continue;
        }
        index.insert(d.id.clone(), i);
    }
    index
}

impl<T, S: KeyValueStore> fmt::Debug for ColumnPreferences<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnPreferences")
            .field("storage_key", &self.storage_key)
            .field("columns", &self.descriptors.len())
            .field("state", &self.state)
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}
