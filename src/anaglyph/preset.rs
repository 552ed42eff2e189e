use std::str::FromStr;

use crate::foundation::error::{AnaglyphError, AnaglyphResult};

/// Per-channel selector (R, G, B); each component is 0 (suppressed) or 1 (passed).
pub type ChannelMask = [u8; 3];

/// Left/right channel masks of one filter preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaskPair {
    /// Channels carrying the left eye in full color.
    pub left: ChannelMask,
    /// Channels carrying the right eye's luminance.
    pub right: ChannelMask,
}

impl MaskPair {
    /// `true` when every output channel is sourced by exactly one eye.
    pub fn is_partition(&self) -> bool {
        self.left
            .iter()
            .zip(self.right.iter())
            .all(|(&l, &r)| l <= 1 && r <= 1 && l + r == 1)
    }
}

/// Built-in anaglyph color filter presets, named left-eye color first.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilterPreset {
    /// Red left lens, cyan right lens.
    #[default]
    RedCyan,
    /// Green left lens, magenta right lens.
    GreenMagenta,
    /// Blue left lens, yellow right lens.
    BlueYellow,
}

impl FilterPreset {
    /// Every built-in preset, in menu order.
    pub const ALL: [FilterPreset; 3] = [Self::RedCyan, Self::GreenMagenta, Self::BlueYellow];

    /// Stable identifier used by selection controls, CLI flags and JSON options.
    pub fn id(self) -> &'static str {
        match self {
            Self::RedCyan => "red-cyan",
            Self::GreenMagenta => "green-magenta",
            Self::BlueYellow => "blue-yellow",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::RedCyan => "Red/Cyan",
            Self::GreenMagenta => "Green/Magenta",
            Self::BlueYellow => "Blue/Yellow",
        }
    }

    /// Channel masks for this preset.
    pub fn masks(self) -> MaskPair {
        match self {
            Self::RedCyan => MaskPair {
                left: [1, 0, 0],
                right: [0, 1, 1],
            },
            Self::GreenMagenta => MaskPair {
                left: [0, 1, 0],
                right: [1, 0, 1],
            },
            Self::BlueYellow => MaskPair {
                left: [0, 0, 1],
                right: [1, 1, 0],
            },
        }
    }

    /// Resolve a selection identifier. Accepts `red-cyan`, `red_cyan`, `Red/Cyan` and similar.
    pub fn from_id(id: &str) -> Option<Self> {
        let norm: String = id
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '/' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL.into_iter().find(|p| p.id() == norm)
    }
}

impl FromStr for FilterPreset {
    type Err = AnaglyphError;

    fn from_str(s: &str) -> AnaglyphResult<Self> {
        Self::from_id(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|p| p.id()).collect();
            AnaglyphError::validation(format!(
                "unknown filter preset '{s}' (expected one of: {})",
                known.join(", ")
            ))
        })
    }
}

impl std::fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anaglyph/preset.rs"]
mod tests;
