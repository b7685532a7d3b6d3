//! Multi-octave height and normal queries against the composite field.
//!
//! Consumers (buoyant objects, spray emitters) ask for the water surface at
//! a world position. The query blends four bilinear taps of the composite,
//! each on a slightly detuned copy of the world-to-field mapping that
//! drifts over time. The detune ratios and drift rates use near-coprime
//! divisors so the octaves never phase-lock into a visible repeat.

use glam::{Vec2, Vec3};

use crate::field::Field;

/// Relative frequency of each octave around the base mapping.
const OCTAVE_SCALES: [f32; 4] = [
    100.0 / 103.0,
    100.0 / 107.0,
    100.0 / 897.0,
    100.0 / 991.0,
];

/// Shift applied to the blended height channel so the returned height is
/// an offset around the resting surface rather than a raw texel value.
const HEIGHT_NORM: f32 = 1.0;

/// Per-octave drift velocity in field-normalized units per time unit.
const OCTAVE_DRIFT: [Vec2; 4] = [
    Vec2::new(1.0 / 17.0, 1.0 / 29.0),
    Vec2::new(1.0 / 19.0, -1.0 / 31.0),
    Vec2::new(1.0 / 101.0, 1.0 / 97.0),
    Vec2::new(-1.0 / 109.0, 1.0 / 113.0),
];

/// A decoded water-surface query result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSample {
    /// Unit surface normal, +Z up.
    pub normal: Vec3,
    /// Blended composite height taps shifted by [`HEIGHT_NORM`]; zero at a
    /// full crest, negative below it.
    pub height: f32,
}

impl HeightSample {
    /// Flat water. Returned for queries made before the first tick has
    /// produced a composite.
    pub const NEUTRAL: Self = Self {
        normal: Vec3::Z,
        height: 0.0,
    };

    /// Packed `[nx, ny, nz, height]` form.
    pub fn to_array(self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.height]
    }

    /// Vertical placement for a floating object: the surface height scaled
    /// by the wave bias gain, sunk by the bias floor.
    pub fn buoyancy_offset(self, wave_bias: Vec2) -> f32 {
        self.height * wave_bias.x - wave_bias.y
    }

    pub fn is_finite(self) -> bool {
        self.normal.is_finite() && self.height.is_finite()
    }
}

/// Sample the composite at a world position.
///
/// `world_offset` comes from the scroll tracker and re-anchors the query to
/// world space: the field's content follows the viewpoint, so a fixed world
/// position maps to a moving field coordinate.
pub fn sample(
    composite: &Field,
    dimensions: Vec2,
    world_offset: Vec2,
    time: f32,
    x: f32,
    y: f32,
) -> HeightSample {
    let size = Vec2::new(composite.width() as f32, composite.height() as f32);
    let base = Vec2::new(
        0.5 + 1.5 * x / dimensions.x,
        0.5 + 1.5 * y / dimensions.y,
    ) + world_offset;
    let t = time * 0.25;

    let mut acc = [0.0f32; 4];
    for (scale, drift) in OCTAVE_SCALES.iter().zip(OCTAVE_DRIFT.iter()) {
        let uv = Vec2::splat(0.5) + (base - Vec2::splat(0.5)) * *scale + *drift * t;
        let tap = composite.sample_linear(uv.x * size.x, uv.y * size.y);
        for (a, v) in acc.iter_mut().zip(tap.iter()) {
            *a += v;
        }
    }
    let avg = acc.map(|v| v * 0.25);

    // Channels 0..2 hold the midpoint-encoded normal from the composite
    // pass; re-center and renormalize the blend of four taps.
    let normal = Vec3::new(
        avg[0] * 2.0 - 1.0,
        avg[1] * 2.0 - 1.0,
        avg[2].max(0.05),
    )
    .normalize();

    HeightSample {
        normal,
        height: avg[3] - HEIGHT_NORM,
    }
}
