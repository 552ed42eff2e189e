use super::*;
use crate::anaglyph::preset::FilterPreset;

fn solid(px: [u8; 4], n: usize) -> Vec<u8> {
    px.repeat(n)
}

#[test]
fn grayscale_uses_luminosity_weights() {
    assert_eq!(grayscale([0, 0, 0]), 0.0);
    assert_eq!(grayscale([255, 255, 255]), 255.0);
    assert_eq!(grayscale([100, 0, 0]), 30.0);
    assert_eq!(grayscale([0, 100, 0]), 59.0);
    assert_eq!(grayscale([0, 0, 100]), 11.0);
    assert!((grayscale([50, 200, 50]) - 138.5).abs() < 1e-4);
}

#[test]
fn red_cyan_passes_left_red_and_right_luminance() {
    let out = compose_pixel([200, 50, 50], [50, 200, 50], FilterPreset::RedCyan.masks());
    // 138.5 rounds half to even.
    assert_eq!(out, [200, 138, 138]);
}

#[test]
fn each_preset_routes_left_color_to_its_channel() {
    let left = [10, 20, 30];
    let right = [100, 100, 100];
    assert_eq!(
        compose_pixel(left, right, FilterPreset::RedCyan.masks()),
        [10, 100, 100]
    );
    assert_eq!(
        compose_pixel(left, right, FilterPreset::GreenMagenta.masks()),
        [100, 20, 100]
    );
    assert_eq!(
        compose_pixel(left, right, FilterPreset::BlueYellow.masks()),
        [100, 100, 30]
    );
}

#[test]
fn white_stays_white_and_black_stays_black() {
    for preset in FilterPreset::ALL {
        let m = preset.masks();
        assert_eq!(compose_pixel([255; 3], [255; 3], m), [255; 3]);
        assert_eq!(compose_pixel([0; 3], [0; 3], m), [0; 3]);
    }
}

#[test]
fn overlapping_masks_are_clamped() {
    let both = MaskPair {
        left: [1, 1, 1],
        right: [1, 1, 1],
    };
    assert_eq!(compose_pixel([200; 3], [200; 3], both), [255; 3]);
}

#[test]
fn rounding_is_half_to_even() {
    assert_eq!(centi_to_u8(13850), 138);
    assert_eq!(centi_to_u8(13950), 140);
    assert_eq!(centi_to_u8(13849), 138);
    assert_eq!(centi_to_u8(13851), 139);
    assert_eq!(centi_to_u8(99_999), 255);
}

#[test]
fn compose_in_place_sets_opaque_alpha_and_ignores_input_alpha() {
    let left = solid([200, 50, 50, 0], 3);
    let right = solid([50, 200, 50, 7], 3);
    let mut dst = vec![9u8; 12];
    compose_in_place(&mut dst, &left, &right, FilterPreset::RedCyan.masks(), false).unwrap();
    assert_eq!(dst, solid([200, 138, 138, 255], 3));
}

#[test]
fn compose_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    let m = FilterPreset::RedCyan.masks();
    assert!(compose_in_place(&mut dst, &[0; 4], &[0; 8], m, false).is_err());
    let mut odd = vec![0u8; 6];
    assert!(compose_in_place(&mut odd, &[0; 6], &[0; 6], m, false).is_err());
}

#[test]
fn parallel_and_serial_paths_agree_and_are_idempotent() {
    let n = PAR_CHUNK_PIXELS * 2 + 17;
    let left: Vec<u8> = (0..n * 4).map(|i| (i * 7 % 251) as u8).collect();
    let right: Vec<u8> = (0..n * 4).map(|i| (i * 13 % 241) as u8).collect();
    let m = FilterPreset::GreenMagenta.masks();

    let mut serial = vec![0u8; n * 4];
    let mut par = vec![0u8; n * 4];
    compose_in_place(&mut serial, &left, &right, m, false).unwrap();
    compose_in_place(&mut par, &left, &right, m, true).unwrap();
    assert_eq!(serial, par);

    let first = serial.clone();
    compose_in_place(&mut serial, &left, &right, m, false).unwrap();
    assert_eq!(serial, first);
}
