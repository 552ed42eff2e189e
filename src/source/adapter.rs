use image::{RgbaImage, imageops};

use crate::{
    foundation::{
        core::FrameSize,
        error::{AnaglyphError, AnaglyphResult},
    },
    source::MediaStream,
};

/// Resampling filter used when the working resolution differs from the native eye size.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Nearest neighbour.
    Nearest,
    /// Bilinear.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom).
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResampleFilter {
    fn to_image_filter(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Triangle => imageops::FilterType::Triangle,
            Self::CatmullRom => imageops::FilterType::CatmullRom,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Result of one extraction attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extraction {
    /// Both eye buffers now hold the current instant at the target size.
    Extracted,
    /// No metadata or no frame yet; buffers are untouched. Retry on the next refresh.
    NotReady,
}

/// Splits the current side-by-side frame of a stream into left/right eye images.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSourceAdapter {
    filter: ResampleFilter,
}

impl FrameSourceAdapter {
    /// Adapter resampling with `filter` when sizes differ.
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    /// Working resolution for a stream of native size `native`: one eye, unscaled.
    pub fn working_size(native: FrameSize) -> FrameSize {
        native.eye()
    }

    /// Fill `left` and `right` with the two halves of the stream's current frame, each resampled
    /// to `target`. Both halves come from the same decoded frame.
    pub fn extract<S: MediaStream + ?Sized>(
        &self,
        stream: &mut S,
        target: FrameSize,
        left: &mut RgbaImage,
        right: &mut RgbaImage,
    ) -> AnaglyphResult<Extraction> {
        if target.is_empty() {
            return Ok(Extraction::NotReady);
        }
        let frame = match stream.current_frame() {
            Ok(frame) => frame,
            Err(e) if e.is_transient() => {
                tracing::trace!(reason = %e, "frame not ready");
                return Ok(Extraction::NotReady);
            }
            Err(e) => return Err(e),
        };

        let eye = FrameSize::new(frame.width(), frame.height()).eye();
        if eye.is_empty() {
            return Ok(Extraction::NotReady);
        }

        ensure_size(left, target);
        ensure_size(right, target);
        self.copy_eye(frame, 0, eye, left)?;
        self.copy_eye(frame, eye.width, eye, right)?;
        Ok(Extraction::Extracted)
    }

    fn copy_eye(
        &self,
        frame: &RgbaImage,
        x0: u32,
        eye: FrameSize,
        dst: &mut RgbaImage,
    ) -> AnaglyphResult<()> {
        if dst.dimensions() == (eye.width, eye.height) {
            copy_rows(frame, x0, eye, dst);
            return Ok(());
        }

        let region = imageops::crop_imm(frame, x0, 0, eye.width, eye.height).to_image();
        let resized = imageops::resize(
            &region,
            dst.width(),
            dst.height(),
            self.filter.to_image_filter(),
        );
        if resized.dimensions() != dst.dimensions() {
            return Err(AnaglyphError::decode(format!(
                "resampled eye is {}x{}, expected {}x{}",
                resized.width(),
                resized.height(),
                dst.width(),
                dst.height()
            )));
        }
        dst.copy_from_slice(resized.as_raw());
        Ok(())
    }
}

fn ensure_size(buf: &mut RgbaImage, size: FrameSize) {
    if buf.dimensions() != (size.width, size.height) {
        *buf = RgbaImage::new(size.width, size.height);
    }
}

fn copy_rows(frame: &RgbaImage, x0: u32, eye: FrameSize, dst: &mut RgbaImage) {
    let src_stride = frame.width() as usize * 4;
    let row_len = eye.width as usize * 4;
    let off = x0 as usize * 4;
    let src = frame.as_raw();
    for (y, row) in dst.chunks_exact_mut(row_len).enumerate() {
        let start = y * src_stride + off;
        row.copy_from_slice(&src[start..start + row_len]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/adapter.rs"]
mod tests;
