//! Per-pixel stereo to anaglyph transform.
//!
//! Arithmetic runs in integer hundredths so the luminance weights (0.30, 0.59, 0.11) are exact:
//! white maps to exactly 255 and results do not depend on float rounding.

use rayon::prelude::*;

use crate::{
    anaglyph::preset::MaskPair,
    foundation::error::{AnaglyphError, AnaglyphResult},
};

/// One RGB pixel.
pub type Rgb8 = [u8; 3];

/// Luminance weights in hundredths, ordered R, G, B.
const LUMA_WEIGHTS_CENTI: [u32; 3] = [30, 59, 11];

/// Pixels per rayon work item in the parallel path.
const PAR_CHUNK_PIXELS: usize = 4096;

/// Luminosity-weighted grayscale `0.3 r + 0.59 g + 0.11 b`.
pub fn grayscale(rgb: Rgb8) -> f32 {
    luma_centi(rgb) as f32 / 100.0
}

fn luma_centi(rgb: Rgb8) -> u32 {
    rgb.iter()
        .zip(LUMA_WEIGHTS_CENTI)
        .map(|(&c, w)| u32::from(c) * w)
        .sum()
}

/// Combine one left/right pixel pair.
///
/// Channels passed by the left mask carry the left pixel's raw value; channels passed by the
/// right mask carry the right pixel's grayscale. Each eye's grayscale is computed once.
pub fn compose_pixel(left: Rgb8, right: Rgb8, masks: MaskPair) -> Rgb8 {
    let gray_l = luma_centi(left);
    let gray_r = luma_centi(right);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let ml = u32::from(masks.left[c]);
        let mr = u32::from(masks.right[c]);
        let from_left = (if ml == 1 {
            u32::from(left[c]) * 100
        } else {
            gray_l
        }) * ml;
        let from_right = (if mr == 1 { gray_r } else { 0 }) * mr;
        out[c] = centi_to_u8(from_left + from_right);
    }
    out
}

/// Clamp to [0, 255] and round half to even.
fn centi_to_u8(v: u32) -> u8 {
    let v = v.min(255 * 100);
    let whole = v / 100;
    let rounded = match (v % 100).cmp(&50) {
        std::cmp::Ordering::Less => whole,
        std::cmp::Ordering::Greater => whole + 1,
        std::cmp::Ordering::Equal => whole + (whole & 1),
    };
    rounded.min(255) as u8
}

/// Write the anaglyph of two straight RGBA8 eye buffers into `dst`.
///
/// All three buffers must have equal length. Input alpha is ignored and every alpha byte of `dst`
/// is overwritten with 255: display buffers come back zero-filled (alpha 0) after a resize, and the
/// composite is always shown fully opaque.
pub fn compose_in_place(
    dst: &mut [u8],
    left: &[u8],
    right: &[u8],
    masks: MaskPair,
    parallel: bool,
) -> AnaglyphResult<()> {
    if dst.len() != left.len() || dst.len() != right.len() || !dst.len().is_multiple_of(4) {
        return Err(AnaglyphError::validation(
            "compose_in_place expects equal-length rgba8 buffers",
        ));
    }

    if parallel {
        let chunk = PAR_CHUNK_PIXELS * 4;
        dst.par_chunks_mut(chunk)
            .zip(left.par_chunks(chunk))
            .zip(right.par_chunks(chunk))
            .for_each(|((d, l), r)| compose_span(d, l, r, masks));
    } else {
        compose_span(dst, left, right, masks);
    }
    Ok(())
}

fn compose_span(dst: &mut [u8], left: &[u8], right: &[u8], masks: MaskPair) {
    for ((d, l), r) in dst
        .chunks_exact_mut(4)
        .zip(left.chunks_exact(4))
        .zip(right.chunks_exact(4))
    {
        let px = compose_pixel([l[0], l[1], l[2]], [r[0], r[1], r[2]], masks);
        d[..3].copy_from_slice(&px);
        d[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anaglyph/transform.rs"]
mod tests;
