use image::RgbaImage;

use crate::{
    foundation::{
        core::{FrameSize, Fps},
        error::{AnaglyphError, AnaglyphResult},
    },
    source::MediaStream,
};

/// In-memory media stream with a manually advanced playback clock.
///
/// Backs still-image conversion (a one-frame stream that never ends) and deterministic tests of the
/// playback cycle.
#[derive(Clone, Debug)]
pub struct MemoryStream {
    frames: Vec<RgbaImage>,
    fps: Fps,
    size: FrameSize,
    position_secs: f64,
    paused: bool,
    ended: bool,
    loaded: bool,
    holds_last_frame: bool,
    reject_play: Option<String>,
}

impl MemoryStream {
    /// Stream over `frames` at `fps`. All frames must share one non-empty size.
    pub fn new(frames: Vec<RgbaImage>, fps: Fps) -> AnaglyphResult<Self> {
        let first = frames
            .first()
            .ok_or_else(|| AnaglyphError::validation("memory stream needs at least one frame"))?;
        let size = FrameSize::new(first.width(), first.height());
        if size.is_empty() {
            return Err(AnaglyphError::validation(
                "memory stream frames must have non-zero size",
            ));
        }
        if let Some(bad) = frames
            .iter()
            .position(|f| f.dimensions() != (size.width, size.height))
        {
            return Err(AnaglyphError::validation(format!(
                "memory stream frame {bad} does not match the first frame size {size}"
            )));
        }

        Ok(Self {
            frames,
            fps,
            size,
            position_secs: 0.0,
            paused: true,
            ended: false,
            loaded: true,
            holds_last_frame: false,
            reject_play: None,
        })
    }

    /// One-frame stream that keeps showing `frame` forever.
    pub fn still(frame: RgbaImage) -> AnaglyphResult<Self> {
        let mut s = Self::new(vec![frame], Fps::new(1, 1)?)?;
        s.holds_last_frame = true;
        Ok(s)
    }

    /// Same as [`MemoryStream::new`] but reporting no metadata until [`MemoryStream::finish_loading`].
    pub fn pending(frames: Vec<RgbaImage>, fps: Fps) -> AnaglyphResult<Self> {
        let mut s = Self::new(frames, fps)?;
        s.loaded = false;
        Ok(s)
    }

    /// Make metadata and frames available.
    pub fn finish_loading(&mut self) {
        self.loaded = true;
    }

    /// Make the next `play` calls fail with `reason` (`None` accepts again).
    pub fn reject_play(&mut self, reason: Option<&str>) {
        self.reject_play = reason.map(str::to_string);
    }

    /// Advance the clock by `secs` if playing; marks the stream ended past the last frame.
    pub fn advance(&mut self, secs: f64) {
        if self.paused || self.ended {
            return;
        }
        self.position_secs += secs.max(0.0);
        if !self.holds_last_frame && self.position_secs >= self.duration_secs() {
            self.position_secs = self.duration_secs();
            self.ended = true;
            self.paused = true;
        }
    }

    fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames.len() as u64)
    }

    fn frame_index(&self) -> usize {
        let idx = self.fps.secs_to_frames_floor(self.position_secs) as usize;
        idx.min(self.frames.len().saturating_sub(1))
    }
}

impl MediaStream for MemoryStream {
    fn native_size(&self) -> FrameSize {
        if self.loaded {
            self.size
        } else {
            FrameSize::ZERO
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn play(&mut self) -> AnaglyphResult<()> {
        if let Some(reason) = &self.reject_play {
            return Err(AnaglyphError::playback_rejected(reason.clone()));
        }
        if self.ended {
            self.position_secs = 0.0;
            self.ended = false;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn current_time(&self) -> f64 {
        self.position_secs
    }

    fn seek(&mut self, secs: f64) -> AnaglyphResult<()> {
        if !secs.is_finite() {
            return Err(AnaglyphError::validation("seek target must be finite"));
        }
        self.position_secs = secs.clamp(0.0, self.duration_secs());
        self.ended = false;
        Ok(())
    }

    fn duration(&self) -> Option<f64> {
        (!self.holds_last_frame).then(|| self.duration_secs())
    }

    fn current_frame(&mut self) -> AnaglyphResult<&RgbaImage> {
        if !self.loaded {
            return Err(AnaglyphError::not_ready("metadata not loaded"));
        }
        let idx = self.frame_index();
        self.frames
            .get(idx)
            .ok_or_else(|| AnaglyphError::not_ready(format!("no frame at index {idx}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
