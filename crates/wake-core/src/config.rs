use glam::Vec2;

/// Tuning parameters for a [`WakeEngine`](crate::WakeEngine).
///
/// Defaults give half-resolution fluid grids, a single relaxation pass
/// per tick, a ~2.5 second velocity fade and the stock wave bias.
#[derive(Clone, Debug)]
pub struct WakeConfig {
    /// Divisor applied to the velocity/pressure/back-buffer resolution.
    pub sim_scale: u32,
    /// Jacobi relaxation passes per tick. A single pass trades solver
    /// accuracy for frame budget; raise this for stiffer incompressibility
    /// at a linear cost per tick.
    pub relax_passes: u32,
    /// Wall-time window (milliseconds) over which injected velocity fades
    /// to zero. Zero disables velocity decay entirely.
    pub velocity_fade_ms: f32,
    /// Tick count over which residual pressure fades. Zero disables decay.
    pub pressure_fade_ticks: f32,
    /// Per-tick retention of the height channel in the main state buffers.
    pub height_persistence: f32,
    /// Height contribution of local flow speed during the advance blend.
    pub wake_gain: f32,
    /// Velocity-to-displacement scale for semi-Lagrangian transport,
    /// in texels per second per unit of normalized velocity.
    pub advect_speed: f32,
    /// Bias vector reported by `wave_bias()` and folded into the composite.
    pub wave_bias: Vec2,
    /// Seed for the resting noise written into the main state buffers.
    pub seed: u64,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            sim_scale: 2,
            relax_passes: 1,
            velocity_fade_ms: 2500.0,
            pressure_fade_ticks: 120.0,
            height_persistence: 0.995,
            wake_gain: 4.0,
            advect_speed: 128.0,
            wave_bias: Vec2::new(0.1125, -0.0775),
            seed: 42,
        }
    }
}

/// Multiplicative decay factor expressed as `(n - 1) / n` for a fade
/// window of `n` ticks. Non-positive windows mean "no decay" and map to
/// 1.0 so that stalled or degenerate frame timing never divides by zero.
pub fn decay_factor(ticks: f32) -> f32 {
    let n = ticks.round();
    if n <= 0.0 {
        1.0
    } else {
        (n - 1.0) / n
    }
}

/// Velocity decay for one tick of `elapsed_ms` wall time: the fade window
/// is converted into a tick count first so the visual fade rate is
/// independent of frame rate.
pub fn velocity_decay_for(fade_ms: f32, elapsed_ms: f32) -> f32 {
    if fade_ms <= 0.0 || elapsed_ms <= 0.0 {
        return 1.0;
    }
    decay_factor(fade_ms / elapsed_ms)
}
