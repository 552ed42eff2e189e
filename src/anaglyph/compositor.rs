use image::RgbaImage;

use crate::{
    anaglyph::{preset::FilterPreset, transform::compose_in_place},
    display::DisplaySurface,
    foundation::error::AnaglyphResult,
    playback::selection::CycleConfig,
    source::{
        MediaStream,
        adapter::{Extraction, FrameSourceAdapter},
    },
};

/// Why a cycle did not present a frame but still asks for the next refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Display, metadata or frame not available yet.
    NotReady,
    /// The selected preset id is not one of the built-in presets.
    UnknownPreset(String),
}

/// Why a cycle stopped the refresh loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The stream is paused.
    Paused,
    /// The stream ran past its last frame.
    Ended,
}

/// Result of one compositing cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A composite was presented using this preset.
    Presented(FilterPreset),
    /// Nothing was drawn; retry next refresh.
    Skipped(SkipReason),
    /// The loop ends here and is not rescheduled.
    Stopped(StopReason),
}

impl CycleOutcome {
    /// `true` if the cycle should be scheduled again for the next refresh.
    pub fn reschedules(&self) -> bool {
        !matches!(self, Self::Stopped(_))
    }
}

/// Owns the per-eye extraction buffers and turns one stream instant into one presented frame.
#[derive(Debug)]
pub struct Compositor {
    adapter: FrameSourceAdapter,
    left: RgbaImage,
    right: RgbaImage,
}

impl Compositor {
    /// Compositor extracting through `adapter`.
    pub fn new(adapter: FrameSourceAdapter) -> Self {
        Self {
            adapter,
            left: RgbaImage::new(0, 0),
            right: RgbaImage::new(0, 0),
        }
    }

    /// Compositor extracting with the default resampling filter.
    pub fn with_defaults() -> Self {
        Self::new(FrameSourceAdapter::default())
    }

    /// Run one cycle: check play state, extract both eyes, compose into the surface and present.
    pub fn run_cycle<S, D>(
        &mut self,
        stream: &mut S,
        surface: &mut D,
        config: &CycleConfig,
    ) -> AnaglyphResult<CycleOutcome>
    where
        S: MediaStream + ?Sized,
        D: DisplaySurface + ?Sized,
    {
        if stream.is_ended() {
            return Ok(CycleOutcome::Stopped(StopReason::Ended));
        }
        if stream.is_paused() {
            return Ok(CycleOutcome::Stopped(StopReason::Paused));
        }

        let display = surface.size();
        if display.is_empty() || stream.native_size().width == 0 {
            return Ok(CycleOutcome::Skipped(SkipReason::NotReady));
        }
        let Some(preset) = config.preset() else {
            return Ok(CycleOutcome::Skipped(SkipReason::UnknownPreset(
                config.preset_id().to_string(),
            )));
        };

        let extracted = self
            .adapter
            .extract(stream, display, &mut self.left, &mut self.right)?;
        if extracted == Extraction::NotReady {
            return Ok(CycleOutcome::Skipped(SkipReason::NotReady));
        }

        compose_in_place(
            surface.buffer_mut(),
            self.left.as_raw(),
            self.right.as_raw(),
            preset.masks(),
            config.parallel(),
        )?;
        surface.present()?;
        Ok(CycleOutcome::Presented(preset))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anaglyph/compositor.rs"]
mod tests;
