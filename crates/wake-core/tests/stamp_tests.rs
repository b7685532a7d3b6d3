use glam::Vec2;

use wake_core::stamp::{
    decode_velocity, encode_velocity, radius_to_grid, world_to_grid, StagingGrid,
};
use wake_core::{Rgba, WakeError};

#[test]
fn hex_parses_six_digit_colors() {
    let c = Rgba::from_hex("#ff8000").unwrap();
    assert!((c.r - 1.0).abs() < 1e-6);
    assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
    assert!(c.b.abs() < 1e-6);
    assert_eq!(c.a, 1.0);
}

#[test]
fn hex_parses_three_digit_colors() {
    let c = Rgba::from_hex("#f80").unwrap();
    assert!((c.r - 1.0).abs() < 1e-6);
    assert!((c.g - 136.0 / 255.0).abs() < 1e-6);
    assert!(c.b.abs() < 1e-6);
}

#[test]
fn hex_accepts_missing_hash() {
    assert!(Rgba::from_hex("00ff00").is_ok());
}

#[test]
fn hex_rejects_bad_literals() {
    for bad in ["", "#", "#ff", "#fffff", "#gg0000", "not a color"] {
        match Rgba::from_hex(bad) {
            Err(WakeError::InvalidColor(s)) => assert_eq!(s, bad),
            other => panic!("expected InvalidColor for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn rgba_to_bytes_clamps() {
    let c = Rgba::new(2.0, -1.0, 0.5, 1.0);
    assert_eq!(c.to_bytes(), [255, 0, 127, 255]);
}

#[test]
fn stamp_fills_a_circle() {
    let mut g = StagingGrid::new(32, 32);
    assert!(!g.is_dirty());
    g.stamp_circle(Vec2::new(16.0, 16.0), 4.0, [255, 0, 0, 255]);
    assert!(g.is_dirty());

    assert_eq!(g.pixel(16, 16), [255, 0, 0, 255]);
    assert_eq!(g.pixel(16, 13), [255, 0, 0, 255]);
    // Outside the radius stays transparent.
    assert_eq!(g.pixel(16, 22), [0, 0, 0, 0]);
    assert_eq!(g.pixel(0, 0), [0, 0, 0, 0]);
}

#[test]
fn stamp_wraps_at_the_border() {
    let mut g = StagingGrid::new(16, 16);
    g.stamp_circle(Vec2::new(0.0, 8.0), 3.0, [0, 255, 0, 255]);
    // The half of the circle hanging off the left edge lands on the right.
    assert_eq!(g.pixel(15, 8), [0, 255, 0, 255]);
    assert_eq!(g.pixel(1, 8), [0, 255, 0, 255]);
}

#[test]
fn overlapping_stamps_are_last_write_wins() {
    let mut g = StagingGrid::new(16, 16);
    g.stamp_circle(Vec2::new(8.0, 8.0), 3.0, [255, 0, 0, 255]);
    g.stamp_circle(Vec2::new(8.0, 8.0), 2.0, [0, 0, 255, 255]);
    assert_eq!(g.pixel(8, 8), [0, 0, 255, 255]);
    assert_eq!(g.pixel(8, 5), [255, 0, 0, 255]);
}

#[test]
fn clear_resets_to_transparent() {
    let mut g = StagingGrid::new(8, 8);
    g.stamp_circle(Vec2::new(4.0, 4.0), 2.0, [1, 2, 3, 255]);
    g.clear();
    assert!(!g.is_dirty());
    assert!(g.bytes().iter().all(|b| *b == 0));
}

#[test]
fn tiny_radii_still_mark_a_pixel() {
    let mut g = StagingGrid::new(8, 8);
    g.stamp_circle(Vec2::new(4.5, 4.5), 0.0, [9, 9, 9, 255]);
    assert_eq!(g.pixel(4, 4), [9, 9, 9, 255]);
}

#[test]
fn world_origin_maps_to_grid_center() {
    let g = StagingGrid::new(128, 128);
    let dims = Vec2::new(128.0, 128.0);
    let p = world_to_grid(0.0, 0.0, dims, &g);
    assert!((p.x - 64.0).abs() < 1e-4);
    assert!((p.y - 64.0).abs() < 1e-4);
}

#[test]
fn world_radius_scales_with_grid_resolution() {
    let g = StagingGrid::new(64, 64);
    let dims = Vec2::new(128.0, 128.0);
    assert!((radius_to_grid(16.0, dims, &g) - 8.0).abs() < 1e-4);
}

#[test]
fn velocity_encoding_round_trips_near_midpoint() {
    let dims = Vec2::new(128.0, 128.0);
    let px = encode_velocity(0.0, 0.0, dims);
    let v = decode_velocity(px);
    assert!(v.x.abs() < 0.01);
    assert!(v.y.abs() < 0.01);

    let px = encode_velocity(64.0, -64.0, dims);
    let v = decode_velocity(px);
    assert!((v.x - 0.5).abs() < 0.02);
    assert!((v.y + 0.5).abs() < 0.02);
}

#[test]
fn velocity_encoding_saturates() {
    let dims = Vec2::new(128.0, 128.0);
    let px = encode_velocity(1e6, -1e6, dims);
    let v = decode_velocity(px);
    assert!((v.x - 1.0).abs() < 0.01);
    assert!((v.y + 1.0).abs() < 0.01);
}
