use std::path::Path;

use anyhow::Context as _;

use crate::{
    anaglyph::preset::FilterPreset,
    foundation::error::{AnaglyphError, AnaglyphResult},
    source::adapter::ResampleFilter,
};

/// Player options, loadable from JSON. Missing fields fall back to [`PlayerOpts::default`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerOpts {
    /// Preset selected at startup.
    pub preset: FilterPreset,
    /// Spread the per-pixel transform over the rayon pool.
    pub parallel: bool,
    /// Filter used when the display size differs from the native eye size.
    pub resample: ResampleFilter,
    /// Start playback as soon as the player is created.
    pub autoplay: bool,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            preset: FilterPreset::RedCyan,
            parallel: false,
            resample: ResampleFilter::Triangle,
            autoplay: false,
        }
    }
}

impl PlayerOpts {
    /// Parse options from a JSON string.
    pub fn from_json(json: &str) -> AnaglyphResult<Self> {
        serde_json::from_str(json).map_err(|e| AnaglyphError::serde(e.to_string()))
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> AnaglyphResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read player options '{}'", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
