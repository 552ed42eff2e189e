use crate::foundation::error::{AnaglyphError, AnaglyphResult};

/// Pixel dimensions of a frame, sub-image or display surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Size reported by a stream whose metadata is not loaded yet.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Build a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Size of one eye of a side-by-side frame: half width (rounded down), full height.
    pub fn eye(self) -> Self {
        Self {
            width: self.width / 2,
            height: self.height,
        }
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of an RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.pixel_count() * 4
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rational frame rate of a media stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be > 0.
    pub den: u32,
}

impl Fps {
    /// Build a frame rate, rejecting zero numerator or denominator.
    pub fn new(num: u32, den: u32) -> AnaglyphResult<Self> {
        if den == 0 {
            return Err(AnaglyphError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(AnaglyphError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Presentation time of frame `frames`.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Index of the frame on screen at `secs`.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        // Nudge so exact frame boundaries computed through `frames_to_secs` land on that frame.
        (secs * self.as_f64() + 1e-9).floor().max(0.0) as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
