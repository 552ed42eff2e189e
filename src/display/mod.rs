//! Display surfaces the composite frame is written to and presented on.

pub(crate) mod memory;
#[cfg(feature = "window")]
pub(crate) mod window;

use crate::foundation::{core::FrameSize, error::AnaglyphResult};

/// A fixed-size straight RGBA8 back buffer plus a present operation.
pub trait DisplaySurface {
    /// Current buffer size; [`FrameSize::ZERO`] before the first resize.
    fn size(&self) -> FrameSize;

    /// Resize the back buffer. Contents after a resize are unspecified.
    fn resize(&mut self, size: FrameSize) -> AnaglyphResult<()>;

    /// Back buffer, exactly `size().rgba_len()` bytes, rows top to bottom.
    fn buffer_mut(&mut self) -> &mut [u8];

    /// Show the back buffer.
    fn present(&mut self) -> AnaglyphResult<()>;
}
