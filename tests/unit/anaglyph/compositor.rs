use super::*;
use crate::{
    display::memory::MemorySurface,
    foundation::core::FrameSize,
    playback::selection::PresetSelection,
    source::memory::MemoryStream,
};

fn sbs(left: [u8; 3], right: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(4, 2, |x, _| {
        let c = if x < 2 { left } else { right };
        image::Rgba([c[0], c[1], c[2], 255])
    })
}

fn playing(frame: RgbaImage) -> MemoryStream {
    let mut s = MemoryStream::still(frame).unwrap();
    s.play().unwrap();
    s
}

fn config(id: &str) -> CycleConfig {
    let mut sel = PresetSelection::default();
    sel.select(id);
    sel.snapshot()
}

#[test]
fn presents_the_expected_red_cyan_composite() {
    let mut stream = playing(sbs([200, 50, 50], [50, 200, 50]));
    let mut surface = MemorySurface::with_size(FrameSize::new(2, 2));
    let mut comp = Compositor::with_defaults();

    let out = comp
        .run_cycle(&mut stream, &mut surface, &config("red-cyan"))
        .unwrap();
    assert_eq!(out, CycleOutcome::Presented(FilterPreset::RedCyan));
    let frame = surface.presented().unwrap();
    assert!(frame.pixels().all(|p| p.0 == [200, 138, 138, 255]));
}

#[test]
fn black_in_black_out_for_every_preset() {
    for preset in FilterPreset::ALL {
        let mut stream = playing(sbs([0; 3], [0; 3]));
        let mut surface = MemorySurface::with_size(FrameSize::new(2, 2));
        Compositor::with_defaults()
            .run_cycle(&mut stream, &mut surface, &config(preset.id()))
            .unwrap();
        assert!(
            surface
                .presented()
                .unwrap()
                .pixels()
                .all(|p| p.0 == [0, 0, 0, 255])
        );
    }
}

#[test]
fn paused_and_ended_streams_stop_the_loop() {
    let mut surface = MemorySurface::with_size(FrameSize::new(2, 2));
    let mut comp = Compositor::with_defaults();

    let mut paused = MemoryStream::still(sbs([1; 3], [2; 3])).unwrap();
    let out = comp
        .run_cycle(&mut paused, &mut surface, &config("red-cyan"))
        .unwrap();
    assert_eq!(out, CycleOutcome::Stopped(StopReason::Paused));
    assert!(!out.reschedules());

    let fps = crate::foundation::core::Fps::new(10, 1).unwrap();
    let mut ended = MemoryStream::new(vec![sbs([1; 3], [2; 3])], fps).unwrap();
    ended.play().unwrap();
    ended.advance(1.0);
    let out = comp
        .run_cycle(&mut ended, &mut surface, &config("red-cyan"))
        .unwrap();
    assert_eq!(out, CycleOutcome::Stopped(StopReason::Ended));
    assert_eq!(surface.present_count(), 0);
}

#[test]
fn empty_display_is_not_ready() {
    let mut stream = playing(sbs([1; 3], [2; 3]));
    let mut surface = MemorySurface::new();
    let out = Compositor::with_defaults()
        .run_cycle(&mut stream, &mut surface, &config("red-cyan"))
        .unwrap();
    assert_eq!(out, CycleOutcome::Skipped(SkipReason::NotReady));
    assert!(out.reschedules());
}

#[test]
fn unknown_preset_skips_without_drawing() {
    let mut stream = playing(sbs([1; 3], [2; 3]));
    let mut surface = MemorySurface::with_size(FrameSize::new(2, 2));
    let out = Compositor::with_defaults()
        .run_cycle(&mut stream, &mut surface, &config("sepia"))
        .unwrap();
    assert_eq!(
        out,
        CycleOutcome::Skipped(SkipReason::UnknownPreset("sepia".to_string()))
    );
    assert_eq!(surface.present_count(), 0);
}

#[test]
fn repeated_cycles_on_a_frozen_frame_are_identical() {
    let mut stream = playing(sbs([12, 180, 90], [240, 3, 77]));
    let mut surface = MemorySurface::with_size(FrameSize::new(2, 2));
    let mut comp = Compositor::with_defaults();
    let cfg = config("blue-yellow");

    comp.run_cycle(&mut stream, &mut surface, &cfg).unwrap();
    let first = surface.take_presented().unwrap();
    comp.run_cycle(&mut stream, &mut surface, &cfg).unwrap();
    assert_eq!(surface.presented().unwrap(), &first);
}

#[test]
fn zero_filled_surface_comes_out_opaque() {
    let mut stream = playing(sbs([0; 3], [0; 3]));
    let mut surface = MemorySurface::new();
    surface.resize(FrameSize::new(2, 2)).unwrap();
    assert!(surface.buffer_mut().iter().all(|&b| b == 0));

    Compositor::with_defaults()
        .run_cycle(&mut stream, &mut surface, &config("red-cyan"))
        .unwrap();
    assert!(surface.buffer_mut().chunks_exact(4).all(|px| px[3] == 255));
}
