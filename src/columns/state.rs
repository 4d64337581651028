use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::descriptor::ColumnDescriptor;

/// Persisted column layout for one storage key
///
/// Serialized as `{"order": [...], "hidden": [...]}`. `hidden` keeps insertion
/// order for stable output but never holds the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferenceState {
    pub order: Vec<String>,
    pub hidden: Vec<String>,
}

impl PreferenceState {
    /// Layout used when nothing has been stored yet
    pub fn defaults<T>(descriptors: &[ColumnDescriptor<T>]) -> Self {
        let mut seen = HashSet::new();
        let order: Vec<String> = descriptors
            .iter()
            .filter(|d| seen.insert(d.id.as_str()))
            .map(|d| d.id.clone())
            .collect();

        let mut seen_hidden = HashSet::new();
        let hidden = descriptors
            .iter()
            .filter(|d| d.starts_hidden() && seen_hidden.insert(d.id.as_str()))
            .map(|d| d.id.clone())
            .collect();

        Self { order, hidden }
    }

    /// Parse a stored layout
    ///
    /// Fails when either field is missing or is not an array of strings.
    pub fn from_json(raw: &str) -> Result<Self> {
        let state: PreferenceState = serde_json::from_str(raw)?;
        Ok(state)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.iter().any(|h| h == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|o| o == id)
    }
}

/// Bring a possibly stale layout back in line with the current columns
///
/// Unknown and duplicate ids are dropped from `order`, missing columns are
/// appended in descriptor order, and `hidden` loses unknown and locked ids.
/// A column that starts hidden is only hidden here when it was just appended:
/// once it is tracked in `order`, the stored choice for it wins.
pub fn reconcile(
    state: &PreferenceState,
    defaults: &PreferenceState,
    descriptor_ids: &[String],
    locked_ids: &[String],
) -> PreferenceState {
    let known: HashSet<&str> = descriptor_ids.iter().map(String::as_str).collect();
    let locked: HashSet<&str> = locked_ids.iter().map(String::as_str).collect();

    let mut placed: HashSet<&str> = HashSet::with_capacity(known.len());
    let mut order: Vec<String> = state
        .order
        .iter()
        .filter(|id| known.contains(id.as_str()) && placed.insert(id.as_str()))
        .cloned()
        .collect();

    let mut appended: HashSet<&str> = HashSet::new();
    for id in descriptor_ids {
        if placed.insert(id.as_str()) {
            order.push(id.clone());
            appended.insert(id.as_str());
        }
    }

    let mut hidden_set: HashSet<&str> = HashSet::new();
    let mut hidden: Vec<String> = state
        .hidden
        .iter()
        .filter(|id| {
            known.contains(id.as_str())
                && !locked.contains(id.as_str())
                && hidden_set.insert(id.as_str())
        })
        .cloned()
        .collect();

    for id in &defaults.hidden {
        if appended.contains(id.as_str())
            && !locked.contains(id.as_str())
            && hidden_set.insert(id.as_str())
        {
            hidden.push(id.clone());
        }
    }

    PreferenceState { order, hidden }
}
