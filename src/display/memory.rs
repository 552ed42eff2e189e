use image::RgbaImage;

use crate::{
    display::DisplaySurface,
    foundation::{
        core::FrameSize,
        error::{AnaglyphError, AnaglyphResult},
    },
};

/// Headless surface that keeps a copy of the last presented frame.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    size: FrameSize,
    back: Vec<u8>,
    front: Option<RgbaImage>,
    presents: u64,
}

impl MemorySurface {
    /// Empty surface; sized by the player once stream metadata arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface with a preallocated back buffer.
    pub fn with_size(size: FrameSize) -> Self {
        Self {
            size,
            back: vec![0; size.rgba_len()],
            front: None,
            presents: 0,
        }
    }

    /// Last presented frame.
    pub fn presented(&self) -> Option<&RgbaImage> {
        self.front.as_ref()
    }

    /// Take ownership of the last presented frame.
    pub fn take_presented(&mut self) -> Option<RgbaImage> {
        self.front.take()
    }

    /// Number of `present` calls so far.
    pub fn present_count(&self) -> u64 {
        self.presents
    }
}

impl DisplaySurface for MemorySurface {
    fn size(&self) -> FrameSize {
        self.size
    }

    fn resize(&mut self, size: FrameSize) -> AnaglyphResult<()> {
        self.size = size;
        self.back.resize(size.rgba_len(), 0);
        Ok(())
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.back
    }

    fn present(&mut self) -> AnaglyphResult<()> {
        let frame = RgbaImage::from_raw(self.size.width, self.size.height, self.back.clone())
            .ok_or_else(|| AnaglyphError::validation("memory surface buffer has the wrong size"))?;
        self.front = Some(frame);
        self.presents += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/memory.rs"]
mod tests;
