//! Real-time side-by-side stereo to anaglyph conversion.
//!
//! A side-by-side (SBS) video packs the left-eye and right-eye views next to each other in every
//! frame. This crate splits each frame at its horizontal midpoint, recombines the two views into a
//! single color-filtered (anaglyph) image and presents it once per display refresh, so the result
//! can be watched through passive red/cyan, green/magenta or blue/yellow glasses.
//!
//! # Pipeline overview
//!
//! 1. **Extract**: [`FrameSourceAdapter`] reads the current frame of a [`MediaStream`] and fills
//!    two separate eye buffers at the display resolution.
//! 2. **Compose**: [`compose_in_place`] applies the selected [`FilterPreset`] per pixel. Channels
//!    owned by the left lens carry the left view in color; the other channels carry the right
//!    view's luminance.
//! 3. **Present**: the composite is written into a [`DisplaySurface`] and presented.
//!
//! [`Player`] wraps these steps in a [`PlaybackState`] machine and a single-slot
//! [`RefreshScheduler`]: a host calls [`Player::on_refresh`] on each display refresh and keeps
//! requesting refreshes while [`Player::wants_refresh`] is set.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Per-cycle errors never stop the loop**: not-ready streams and unknown presets skip one
//!   refresh; only pausing or reaching the end stops it.
//! - **Decode stays outside**: the optional `media-ffmpeg` backend drives the system `ffmpeg`
//!   binary; the optional `window` feature presents through `winit` + `softbuffer`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod anaglyph;
mod config;
mod display;
mod foundation;
mod playback;
mod source;
mod still;

pub use anaglyph::compositor::{Compositor, CycleOutcome, SkipReason, StopReason};
pub use anaglyph::preset::{ChannelMask, FilterPreset, MaskPair};
pub use anaglyph::transform::{Rgb8, compose_in_place, compose_pixel, grayscale};
pub use config::PlayerOpts;
pub use display::DisplaySurface;
pub use display::memory::MemorySurface;
#[cfg(feature = "window")]
pub use display::window::run_window;
pub use foundation::core::{Fps, FrameSize};
pub use foundation::error::{AnaglyphError, AnaglyphResult};
pub use playback::player::Player;
pub use playback::scheduler::RefreshScheduler;
pub use playback::selection::{CycleConfig, PresetSelection};
pub use playback::state::{PlaybackState, Trigger};
pub use source::MediaStream;
pub use source::adapter::{Extraction, FrameSourceAdapter, ResampleFilter};
#[cfg(feature = "media-ffmpeg")]
pub use source::ffmpeg::{FfmpegStream, VideoSourceInfo, is_ffmpeg_on_path, probe_video};
pub use source::memory::MemoryStream;
pub use still::convert_still;
