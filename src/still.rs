use image::RgbaImage;

use crate::{
    anaglyph::{compositor::CycleOutcome, preset::FilterPreset},
    config::PlayerOpts,
    display::memory::MemorySurface,
    foundation::error::{AnaglyphError, AnaglyphResult},
    playback::player::Player,
    source::memory::MemoryStream,
};

/// Convert one side-by-side image to an anaglyph image of half its width.
///
/// Runs a single refresh cycle of a [`Player`] over a one-frame stream, so stills and live video
/// share the exact same path.
#[tracing::instrument(skip(frame, opts), fields(width = frame.width(), height = frame.height()))]
pub fn convert_still(
    frame: RgbaImage,
    preset: FilterPreset,
    opts: &PlayerOpts,
) -> AnaglyphResult<RgbaImage> {
    let opts = PlayerOpts {
        preset,
        autoplay: true,
        ..opts.clone()
    };
    let mut player = Player::new(MemoryStream::still(frame)?, &opts);
    let mut surface = MemorySurface::new();

    match player.on_refresh(&mut surface) {
        Some(CycleOutcome::Presented(_)) => surface
            .take_presented()
            .ok_or_else(|| AnaglyphError::validation("presented frame went missing (bug)")),
        Some(other) => Err(AnaglyphError::validation(format!(
            "image could not be converted ({other:?}); is it at least 2 pixels wide?"
        ))),
        None => Err(AnaglyphError::playback_rejected(
            player.status().unwrap_or("playback did not start").to_string(),
        )),
    }
}

#[cfg(test)]
#[path = "../tests/unit/still.rs"]
mod tests;
