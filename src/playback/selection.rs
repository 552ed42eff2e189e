use std::sync::Arc;

use crate::anaglyph::preset::FilterPreset;

/// Immutable per-cycle view of the user's selection.
///
/// Taken once at the start of a cycle; later selection changes only affect later cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleConfig {
    preset_id: Arc<str>,
    parallel: bool,
    revision: u64,
}

impl CycleConfig {
    /// Raw selected preset identifier.
    pub fn preset_id(&self) -> &str {
        &self.preset_id
    }

    /// Selected preset, `None` if the identifier is not a built-in preset.
    pub fn preset(&self) -> Option<FilterPreset> {
        FilterPreset::from_id(&self.preset_id)
    }

    /// Whether the pixel transform may use the rayon pool.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Selection revision this snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Holder of the current filter selection. [`PresetSelection::select`] is the only writer.
#[derive(Clone, Debug)]
pub struct PresetSelection {
    current: CycleConfig,
}

impl PresetSelection {
    /// Selection starting at `preset`.
    pub fn new(preset: FilterPreset, parallel: bool) -> Self {
        Self {
            current: CycleConfig {
                preset_id: Arc::from(preset.id()),
                parallel,
                revision: 0,
            },
        }
    }

    /// Replace the selected preset identifier as reported by a selection control.
    ///
    /// Unknown identifiers are stored as-is; cycles skip until a known preset is selected.
    pub fn select(&mut self, id: &str) {
        if &*self.current.preset_id == id {
            return;
        }
        self.current = CycleConfig {
            preset_id: Arc::from(id),
            parallel: self.current.parallel,
            revision: self.current.revision + 1,
        };
        match FilterPreset::from_id(id) {
            Some(preset) => tracing::debug!(preset = %preset, "filter preset selected"),
            None => tracing::warn!(id, "unknown filter preset selected"),
        }
    }

    /// Snapshot for the next cycle.
    pub fn snapshot(&self) -> CycleConfig {
        self.current.clone()
    }

    /// Selected preset identifier.
    pub fn preset_id(&self) -> &str {
        self.current.preset_id()
    }
}

impl Default for PresetSelection {
    fn default() -> Self {
        Self::new(FilterPreset::default(), false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/selection.rs"]
mod tests;
