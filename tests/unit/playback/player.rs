use image::RgbaImage;

use super::*;
use crate::{
    anaglyph::preset::FilterPreset,
    display::memory::MemorySurface,
    foundation::core::{FrameSize, Fps},
    source::memory::MemoryStream,
};

fn sbs(left: [u8; 3], right: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(4, 2, |x, _| {
        let c = if x < 2 { left } else { right };
        image::Rgba([c[0], c[1], c[2], 255])
    })
}

fn clip(frames: usize) -> MemoryStream {
    let frames = (0..frames).map(|i| sbs([i as u8; 3], [100; 3])).collect();
    MemoryStream::new(frames, Fps::new(10, 1).unwrap()).unwrap()
}

fn first_pixel(surface: &MemorySurface) -> [u8; 4] {
    surface.presented().unwrap().get_pixel(0, 0).0
}

#[test]
fn new_player_is_ready_and_sizes_display_to_one_eye() {
    let mut player = Player::new(clip(3), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert_eq!(player.state(), PlaybackState::Loading);

    assert!(player.poll_metadata(&mut surface).unwrap());
    assert_eq!(player.state(), PlaybackState::Ready);
    assert_eq!(surface.size(), FrameSize::new(2, 2));
    assert!(!player.poll_metadata(&mut surface).unwrap());
}

#[test]
fn refresh_without_play_runs_nothing() {
    let mut player = Player::new(clip(3), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert_eq!(player.on_refresh(&mut surface), None);
    assert_eq!(surface.present_count(), 0);
}

#[test]
fn each_refresh_presents_and_rearms_once() {
    let mut player = Player::new(clip(5), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert!(player.play());
    assert_eq!(player.state(), PlaybackState::Playing);

    for _ in 0..3 {
        let out = player.on_refresh(&mut surface).unwrap();
        assert_eq!(out, CycleOutcome::Presented(FilterPreset::RedCyan));
        assert_eq!(player.outstanding_requests(), 1);
        player.stream_mut().advance(0.1);
    }
    assert_eq!(player.frames_presented(), 3);
    assert_eq!(surface.present_count(), 3);
}

#[test]
fn pause_then_resume_leaves_exactly_one_request() {
    let mut player = Player::new(clip(50), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.play();
    player.on_refresh(&mut surface).unwrap();

    // Pause lets the armed cycle run once and lapse.
    player.pause();
    assert_eq!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Stopped(StopReason::Paused))
    );
    assert_eq!(player.outstanding_requests(), 0);
    assert_eq!(player.on_refresh(&mut surface), None);

    assert!(player.play());
    assert_eq!(player.outstanding_requests(), 1);
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
    assert_eq!(player.outstanding_requests(), 1);
}

#[test]
fn resume_before_the_stale_cycle_runs_does_not_double_arm() {
    let mut player = Player::new(clip(50), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.play();
    player.pause();
    assert!(!player.play());
    assert_eq!(player.outstanding_requests(), 1);
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
    assert_eq!(player.outstanding_requests(), 1);
}

#[test]
fn preset_switch_applies_to_the_next_frame() {
    let mut player = Player::new(
        MemoryStream::still(sbs([10, 20, 30], [100, 100, 100])).unwrap(),
        &PlayerOpts::default(),
    );
    let mut surface = MemorySurface::new();
    player.play();

    player.on_refresh(&mut surface).unwrap();
    assert_eq!(first_pixel(&surface), [10, 100, 100, 255]);

    player.select_preset("green-magenta");
    assert_eq!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(FilterPreset::GreenMagenta))
    );
    assert_eq!(first_pixel(&surface), [100, 20, 100, 255]);
}

#[test]
fn unknown_preset_skips_until_fixed() {
    let mut player = Player::new(clip(50), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.play();
    player.select_preset("sepia");

    for _ in 0..3 {
        assert!(matches!(
            player.on_refresh(&mut surface),
            Some(CycleOutcome::Skipped(SkipReason::UnknownPreset(_)))
        ));
        assert_eq!(player.outstanding_requests(), 1);
    }
    assert_eq!(surface.present_count(), 0);

    player.select_preset("blue-yellow");
    assert_eq!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(FilterPreset::BlueYellow))
    );
}

#[test]
fn not_ready_stream_is_retried_every_refresh() {
    let frames = vec![sbs([5; 3], [5; 3])];
    let stream = MemoryStream::pending(frames, Fps::new(10, 1).unwrap()).unwrap();
    let mut player = Player::new(stream, &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert!(player.play());

    for _ in 0..4 {
        assert_eq!(
            player.on_refresh(&mut surface),
            Some(CycleOutcome::Skipped(SkipReason::NotReady))
        );
        assert_eq!(player.outstanding_requests(), 1);
    }
    assert!(player.status().is_some());

    player.stream_mut().finish_loading();
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
    assert_eq!(surface.size(), FrameSize::new(2, 2));
    assert_eq!(player.status(), None);
}

#[test]
fn rejected_play_reports_status_and_stays_paused() {
    let mut stream = clip(5);
    stream.reject_play(Some("autoplay blocked by host"));
    let mut player = Player::new(stream, &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.poll_metadata(&mut surface).unwrap();

    assert!(!player.play());
    assert_eq!(player.state(), PlaybackState::Paused);
    assert_eq!(player.outstanding_requests(), 0);
    assert!(player.status().unwrap().contains("autoplay blocked"));

    player.stream_mut().reject_play(None);
    assert!(player.play());
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.status(), None);
}

#[test]
fn end_of_stream_stops_and_play_restarts() {
    let mut player = Player::new(clip(2), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.play();
    player.on_refresh(&mut surface).unwrap();
    player.stream_mut().advance(1.0);

    assert_eq!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Stopped(StopReason::Ended))
    );
    assert_eq!(player.state(), PlaybackState::Ended);
    assert_eq!(player.outstanding_requests(), 0);

    assert!(player.play());
    assert_eq!(player.stream().current_time(), 0.0);
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
}

#[test]
fn toggle_and_seek_follow_the_state_machine() {
    let mut player = Player::new(clip(20), &PlayerOpts::default());
    assert!(player.toggle());
    assert_eq!(player.state(), PlaybackState::Playing);
    assert!(!player.toggle());
    assert_eq!(player.state(), PlaybackState::Paused);

    player.seek_by(1.0).unwrap();
    assert!((player.stream().current_time() - 1.0).abs() < 1e-9);
    player.seek_by(-5.0).unwrap();
    assert_eq!(player.stream().current_time(), 0.0);
}

#[test]
fn autoplay_arms_the_first_cycle() {
    let opts = PlayerOpts {
        autoplay: true,
        preset: FilterPreset::BlueYellow,
        ..PlayerOpts::default()
    };
    let mut player = Player::new(clip(3), &opts);
    let mut surface = MemorySurface::new();
    assert!(player.wants_refresh());
    assert_eq!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(FilterPreset::BlueYellow))
    );
}

/// Stream with known metadata whose first frames are still being decoded.
struct Warming {
    inner: MemoryStream,
    misses: u32,
}

impl MediaStream for Warming {
    fn native_size(&self) -> FrameSize {
        self.inner.native_size()
    }

    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    fn is_ended(&self) -> bool {
        self.inner.is_ended()
    }

    fn play(&mut self) -> AnaglyphResult<()> {
        self.inner.play()
    }

    fn pause(&mut self) {
        self.inner.pause()
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn seek(&mut self, secs: f64) -> AnaglyphResult<()> {
        self.inner.seek(secs)
    }

    fn current_frame(&mut self) -> AnaglyphResult<&RgbaImage> {
        if self.misses > 0 {
            self.misses -= 1;
            return Err(crate::AnaglyphError::not_ready("decoder starting"));
        }
        self.inner.current_frame()
    }
}

#[test]
fn frame_not_decoded_yet_skips_quietly_and_retries() {
    let stream = Warming {
        inner: clip(5),
        misses: 2,
    };
    let mut player = Player::new(stream, &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert!(player.play());

    for _ in 0..2 {
        assert_eq!(
            player.on_refresh(&mut surface),
            Some(CycleOutcome::Skipped(SkipReason::NotReady))
        );
        assert_eq!(player.status(), Some("waiting for video"));
        assert_eq!(player.outstanding_requests(), 1);
    }
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
    assert_eq!(player.status(), None);
}

#[test]
fn replacing_the_stream_reloads_and_drops_the_pending_cycle() {
    let mut player = Player::new(clip(5), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    assert!(player.play());
    player.on_refresh(&mut surface).unwrap();
    assert_eq!(surface.size(), FrameSize::new(2, 2));

    let wide = RgbaImage::from_pixel(8, 3, image::Rgba([7, 7, 7, 255]));
    let old = player.replace_stream(MemoryStream::still(wide).unwrap());
    assert!(old.is_paused());
    assert_eq!(player.state(), PlaybackState::Loading);
    assert_eq!(player.outstanding_requests(), 0);
    assert_eq!(player.on_refresh(&mut surface), None);
    assert_eq!(surface.size(), FrameSize::new(4, 3));

    assert!(player.play());
    assert!(matches!(
        player.on_refresh(&mut surface),
        Some(CycleOutcome::Presented(_))
    ));
    assert_eq!(first_pixel(&surface), [7, 7, 7, 255]);
}

#[test]
fn applied_revision_trails_selection_until_next_frame() {
    let mut player = Player::new(clip(50), &PlayerOpts::default());
    let mut surface = MemorySurface::new();
    player.play();
    player.on_refresh(&mut surface).unwrap();
    assert_eq!(player.applied_revision(), 0);

    player.select_preset("blue-yellow");
    let wanted = player.selection().snapshot().revision();
    assert!(wanted > player.applied_revision());

    player.on_refresh(&mut surface).unwrap();
    assert_eq!(player.applied_revision(), wanted);
}
