use wake_core::field::{split_main, Field, FieldBuffers};
use wake_core::WakeError;

#[test]
fn get_and_set_wrap_toroidally() {
    let mut f = Field::new(8, 4);
    f.set(1, 2, [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(f.get(1, 2), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(f.get(9, 2), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(f.get(-7, 2), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(f.get(1, -2), [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(f.get(1, 6), [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn set_wraps_negative_coordinates() {
    let mut f = Field::new(4, 4);
    f.set(-1, -1, [9.0, 0.0, 0.0, 0.0]);
    assert_eq!(f.get(3, 3), [9.0, 0.0, 0.0, 0.0]);
}

#[test]
fn bilinear_is_exact_at_integer_coordinates() {
    let mut f = Field::new(4, 4);
    f.set(2, 1, [0.25, 0.5, 0.75, 1.0]);
    assert_eq!(f.sample_linear(2.0, 1.0), [0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn bilinear_interpolates_midpoints() {
    let mut f = Field::new(4, 4);
    f.set(0, 0, [1.0, 0.0, 0.0, 0.0]);
    f.set(1, 0, [0.0, 0.0, 0.0, 0.0]);
    let s = f.sample_linear(0.5, 0.0);
    assert!((s[0] - 0.5).abs() < 1e-6);
}

#[test]
fn bilinear_wraps_across_the_edge() {
    let mut f = Field::new(4, 4);
    f.set(3, 0, [1.0, 0.0, 0.0, 0.0]);
    f.set(0, 0, [0.0, 0.0, 0.0, 0.0]);
    let s = f.sample_linear(3.5, 0.0);
    assert!((s[0] - 0.5).abs() < 1e-6);
}

#[test]
fn energy_sums_squared_xy_channels() {
    let mut f = Field::new(2, 1);
    f.set(0, 0, [3.0, 4.0, 100.0, 100.0]);
    f.set(1, 0, [1.0, 0.0, 50.0, 50.0]);
    assert!((f.energy_xy() - 26.0).abs() < 1e-9);
}

#[test]
fn is_finite_flags_nan_texels() {
    let mut f = Field::new(2, 2);
    assert!(f.is_finite());
    f.set(1, 1, [0.0, f32::NAN, 0.0, 0.0]);
    assert!(!f.is_finite());
}

#[test]
fn fill_sets_every_texel() {
    let mut f = Field::new(3, 3);
    f.fill([0.0, 0.0, 0.0, 0.5]);
    assert!(f.texels().iter().all(|t| *t == [0.0, 0.0, 0.0, 0.5]));
}

#[test]
fn byte_view_matches_texel_layout() {
    let mut f = Field::new(1, 1);
    f.set(0, 0, [1.0, 0.0, 0.0, 0.0]);
    let bytes = f.as_bytes();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
}

#[test]
fn allocate_scales_the_fluid_grids() {
    let b = FieldBuffers::allocate(256, 128, 2).unwrap();
    assert_eq!(b.main[0].width(), 256);
    assert_eq!(b.main[0].height(), 128);
    assert_eq!(b.composite.width(), 256);
    assert_eq!(b.velocity.width(), 128);
    assert_eq!(b.velocity.height(), 64);
    assert_eq!(b.pressure.width(), 128);
    assert_eq!(b.back.width(), 128);
}

#[test]
fn allocate_rejects_zero_size() {
    match FieldBuffers::allocate(0, 64, 2) {
        Err(WakeError::InvalidSize { width: 0, height: 64 }) => {}
        other => panic!("expected InvalidSize, got {other:?}"),
    }
}

#[test]
fn allocate_clamps_degenerate_scale() {
    let b = FieldBuffers::allocate(64, 64, 0).unwrap();
    assert_eq!(b.velocity.width(), 64);
    let b = FieldBuffers::allocate(2, 2, 16).unwrap();
    assert_eq!(b.velocity.width(), 1);
}

#[test]
fn split_main_pairs_read_and_write() {
    let mut main = [Field::new(2, 2), Field::new(2, 2)];
    main[0].fill([1.0; 4]);
    main[1].fill([2.0; 4]);

    let (read, write) = split_main(&mut main, 0);
    assert_eq!(read.get(0, 0), [1.0; 4]);
    write.fill([3.0; 4]);
    assert_eq!(main[1].get(0, 0), [3.0; 4]);

    let (read, write) = split_main(&mut main, 1);
    assert_eq!(read.get(0, 0), [3.0; 4]);
    write.fill([4.0; 4]);
    assert_eq!(main[0].get(0, 0), [4.0; 4]);
}
