use std::collections::BTreeMap;

use foundation::FeatureId;

/// UI-only flags for one feature: the selection flag and the last height
/// offset applied while selected. Never persisted; rebuilt from live events.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FeatureUiState {
    pub selected: bool,
    pub height_offset: u32,
}

/// Application-owned map from feature id to its transient UI state.
///
/// This is the source of truth for selection; the surface's own feature-state
/// store is written through to so the engine's paint expressions see the same
/// flags. Keyed by `FeatureId`, so iteration order is deterministic.
///
/// Selection is exclusive: [`FeatureStateStore::select`] after
/// [`FeatureStateStore::clear`] is the only way entries appear, so at most one
/// selection set is live at a time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeatureStateStore {
    entries: BTreeMap<FeatureId, FeatureUiState>,
}

impl FeatureStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn select(&mut self, id: FeatureId) {
        self.entries.entry(id).or_default().selected = true;
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.entries.get(id).is_some_and(|s| s.selected)
    }

    pub fn set_height_offset(&mut self, id: &FeatureId, offset: u32) {
        if let Some(state) = self.entries.get_mut(id) {
            state.height_offset = offset;
        }
    }

    pub fn get(&self, id: &FeatureId) -> Option<FeatureUiState> {
        self.entries.get(id).copied()
    }

    /// Selected ids in ascending order.
    pub fn selected_ids(&self) -> impl Iterator<Item = &FeatureId> {
        self.entries
            .iter()
            .filter(|(_, s)| s.selected)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
