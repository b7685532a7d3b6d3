use glam::{Vec2, Vec3};

/// Per-tick simulation parameters shared by every kernel pass.
///
/// Passed by shared reference into each pass, so a pass can read but
/// never mutate them mid-pipeline.
#[derive(Clone, Debug)]
pub struct SimulationParams {
    /// World-space extent scale of the field (half the pixel size).
    pub dimensions: Vec2,
    /// Viewpoint position fed into the composite shading.
    pub view: Vec3,
    /// Sun position and color fed into the composite shading.
    pub sun: Vec3,
    pub sun_color: Vec3,
    /// Directional wave bias folded into the composite height channel and
    /// reported to consumers for buoyancy mapping.
    pub wave_bias: Vec2,

    /// Multiplicative per-tick decay factors, already degenerate-safe:
    /// 1.0 means no decay.
    pub velocity_decay: f32,
    pub pressure_decay: f32,

    /// Whole-texel scroll delta for this tick, field-normalized.
    pub offset: Vec2,
    /// Fractional part of this tick's scroll delta, compensated with a
    /// bilinear shift in the offset and advance passes.
    pub offset_fraction: Vec2,
    /// Absolute sub-texel remainder applied when rendering the composite.
    pub display_fraction: Vec2,

    /// Advection displacement per unit velocity, in texels.
    pub delta: f32,
    /// Accumulated simulation time in seconds.
    pub time: f32,

    /// Height channel retention and flow-speed gain for the advance blend.
    pub height_persistence: f32,
    pub wake_gain: f32,

    /// Index of the main buffer read this tick; its partner is written.
    pub read_main: usize,
}

impl SimulationParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Vec2::new(width as f32 * 0.5, height as f32 * 0.5),
            view: Vec3::new(0.0, 5.0, 10.0),
            sun: Vec3::new(0.0, 500.0, 1000.0),
            sun_color: Vec3::new(1.0, 0.92, 0.75),
            wave_bias: Vec2::ZERO,
            velocity_decay: 1.0,
            pressure_decay: 1.0,
            offset: Vec2::ZERO,
            offset_fraction: Vec2::ZERO,
            display_fraction: Vec2::ZERO,
            delta: 0.0,
            time: 0.0,
            height_persistence: 1.0,
            wake_gain: 0.0,
            read_main: 0,
        }
    }

    /// Rescale the derived world extent. Buffers are never reallocated
    /// mid-simulation; only this mapping changes.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.dimensions = Vec2::new((width * 0.5).abs(), (height * 0.5).abs());
    }
}
