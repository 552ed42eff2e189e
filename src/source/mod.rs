//! Media stream boundary and side-by-side frame extraction.

pub(crate) mod adapter;
#[cfg(feature = "media-ffmpeg")]
pub(crate) mod ffmpeg;
pub(crate) mod memory;

use image::RgbaImage;

use crate::foundation::{core::FrameSize, error::AnaglyphResult};

/// A playing or paused media stream as exposed by the host media stack.
///
/// The player only reads frames and play state; seeking stays with whoever drives the stream.
pub trait MediaStream {
    /// Native decoded frame size, [`FrameSize::ZERO`] until metadata is loaded.
    fn native_size(&self) -> FrameSize;

    /// `true` while playback is paused (including before the first play).
    fn is_paused(&self) -> bool;

    /// `true` once playback ran past the last frame.
    fn is_ended(&self) -> bool;

    /// Start or resume playback. Playing an ended stream restarts it from the beginning.
    fn play(&mut self) -> AnaglyphResult<()>;

    /// Pause playback at the current position.
    fn pause(&mut self);

    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position.
    fn seek(&mut self, secs: f64) -> AnaglyphResult<()>;

    /// Total duration in seconds, when known.
    fn duration(&self) -> Option<f64> {
        None
    }

    /// Decoded frame at the current position as straight RGBA8.
    ///
    /// Fails with [`AnaglyphError::NotReady`](crate::AnaglyphError::NotReady) while metadata is
    /// missing or no frame has been decoded yet; callers retry on the next refresh.
    fn current_frame(&mut self) -> AnaglyphResult<&RgbaImage>;
}

impl<S: MediaStream + ?Sized> MediaStream for Box<S> {
    fn native_size(&self) -> FrameSize {
        (**self).native_size()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }

    fn is_ended(&self) -> bool {
        (**self).is_ended()
    }

    fn play(&mut self) -> AnaglyphResult<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }

    fn seek(&mut self, secs: f64) -> AnaglyphResult<()> {
        (**self).seek(secs)
    }

    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }

    fn current_frame(&mut self) -> AnaglyphResult<&RgbaImage> {
        (**self).current_frame()
    }
}
