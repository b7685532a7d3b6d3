use glam::{Vec2, Vec3};

use wake_core::sampler::{sample, HeightSample};
use wake_core::Field;

#[test]
fn neutral_sample_is_flat_water() {
    let s = HeightSample::NEUTRAL;
    assert_eq!(s.normal, Vec3::Z);
    assert_eq!(s.height, 0.0);
    assert_eq!(s.to_array(), [0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn uniform_composite_decodes_to_a_normalized_height() {
    let mut composite = Field::new(64, 64);
    composite.fill([0.5, 0.5, 1.0, 0.25]);

    let s = sample(
        &composite,
        Vec2::new(32.0, 32.0),
        Vec2::ZERO,
        1.7,
        5.0,
        -3.0,
    );
    // The height channel is shifted down by one: a 0.25 texel reads as a
    // -0.75 offset from the crest.
    assert!((s.height - (0.25 - 1.0)).abs() < 1e-6);
    assert!(s.normal.x.abs() < 1e-6);
    assert!(s.normal.y.abs() < 1e-6);
    assert!((s.normal.z - 1.0).abs() < 1e-6);
    assert!(s.is_finite());
}

#[test]
fn full_crest_reads_as_zero_height_offset() {
    let mut composite = Field::new(32, 32);
    composite.fill([0.5, 0.5, 1.0, 1.0]);

    let dims = Vec2::new(16.0, 16.0);
    let s = sample(&composite, dims, Vec2::ZERO, 0.0, 0.0, 0.0);
    assert!(s.height.abs() < 1e-6);
    // At a crest the buoyancy offset reduces to the bias floor alone.
    let bias = Vec2::new(0.1125, -0.0775);
    assert!((s.buoyancy_offset(bias) + bias.y).abs() < 1e-6);
}

#[test]
fn tilted_normals_decode_off_axis() {
    let mut composite = Field::new(64, 64);
    // Midpoint-encoded lean toward +x.
    composite.fill([0.75, 0.5, 0.8, 0.5]);

    let s = sample(&composite, Vec2::new(32.0, 32.0), Vec2::ZERO, 0.0, 0.0, 0.0);
    assert!(s.normal.x > 0.1);
    assert!(s.normal.y.abs() < 1e-6);
    assert!((s.normal.length() - 1.0).abs() < 1e-5);
}

#[test]
fn degenerate_z_channel_is_clamped_before_normalizing() {
    let mut composite = Field::new(16, 16);
    composite.fill([0.5, 0.5, 0.0, 0.0]);

    let s = sample(&composite, Vec2::new(8.0, 8.0), Vec2::ZERO, 0.0, 0.0, 0.0);
    assert!(s.is_finite());
    assert!(s.normal.z > 0.0);
}

#[test]
fn buoyancy_offset_scales_and_sinks() {
    let s = HeightSample {
        normal: Vec3::Z,
        height: 0.5,
    };
    let offset = s.buoyancy_offset(Vec2::new(0.2, 0.1));
    assert!((offset - 0.0).abs() < 1e-6);

    let crest = HeightSample {
        normal: Vec3::Z,
        height: 1.0,
    };
    assert!(crest.buoyancy_offset(Vec2::new(0.2, 0.1)) > offset);
}

#[test]
fn octaves_drift_over_time() {
    let mut composite = Field::new(64, 64);
    // A single bright column makes any tap movement visible.
    for y in 0..64 {
        composite.set(10, y, [0.5, 0.5, 1.0, 1.0]);
    }

    let dims = Vec2::new(32.0, 32.0);
    let a = sample(&composite, dims, Vec2::ZERO, 0.0, -8.0, 0.0);
    let b = sample(&composite, dims, Vec2::ZERO, 500.0, -8.0, 0.0);
    assert!((a.height - b.height).abs() > 1e-6);
}
