//! The simulation engine: owns all fields, runs the kernel pipeline once
//! per tick and answers surface queries.

use std::time::Duration;

use glam::{Vec2, Vec3};
use instant::Instant;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::{self, WakeConfig};
use crate::error::WakeError;
use crate::field::{Field, FieldBuffers};
use crate::kernels::KernelSet;
use crate::params::SimulationParams;
use crate::sampler::{self, HeightSample};
use crate::scroll::ScrollTracker;
use crate::stamp::{self, Rgba, Staging, StagingGrid};

/// A scrolling wake simulation over toroidal float fields.
///
/// One `tick` runs the full pipeline: upload staged velocity disturbances,
/// scroll-correct and self-advect the velocity field, relax pressure,
/// project out divergence, advance the ping-ponged main state and shade the
/// composite. Queries between ticks are read-only.
pub struct WakeEngine {
    config: WakeConfig,
    kernels: KernelSet,
    buffers: FieldBuffers,
    staging: Staging,
    scroll: ScrollTracker,
    params: SimulationParams,
    tick_count: u64,
    time: f32,
    last_tick: Option<Instant>,
}

impl WakeEngine {
    /// Build an engine over a `width` by `height` composite. Fails if the
    /// size is degenerate or a kernel program cannot be loaded.
    pub fn new(width: u32, height: u32, config: WakeConfig) -> Result<Self, WakeError> {
        let kernels = KernelSet::load()?;
        let mut buffers = FieldBuffers::allocate(width, height, config.sim_scale)?;

        // Seed the main state with calm-water color noise so the first
        // composite already looks like a surface rather than a void.
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (w, h) = (buffers.main[0].width(), buffers.main[0].height());
        for y in 0..h {
            for x in 0..w {
                let r: f32 = rng.gen();
                let g: f32 = rng.gen();
                let b: f32 = rng.gen();
                buffers.main[0].set(
                    x as i32,
                    y as i32,
                    [0.10 + 0.15 * r, 0.20 + 0.20 * g, 0.45 + 0.25 * b, 0.5],
                );
            }
        }
        let seeded = buffers.main[0].clone();
        buffers.main[1] = seeded;

        let staging = Staging::new(buffers.velocity.width(), buffers.velocity.height());
        let mut params = SimulationParams::new(width, height);
        params.wave_bias = config.wave_bias;
        params.height_persistence = config.height_persistence;
        params.wake_gain = config.wake_gain;

        log::info!(
            "wake engine up: {width}x{height}, fluid {}x{}",
            buffers.velocity.width(),
            buffers.velocity.height()
        );

        Ok(Self {
            config,
            kernels,
            buffers,
            staging,
            scroll: ScrollTracker::new(width, height),
            params,
            tick_count: 0,
            time: 0.0,
            last_tick: None,
        })
    }

    /// Rescale the world extent covered by the field. Buffers keep their
    /// resolution; only the world-to-field mapping changes.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.params.set_size(width, height);
    }

    /// Translate the viewpoint by `(dx, dy)` in field-normalized units.
    /// Takes effect on the next tick.
    pub fn move_to(&mut self, dx: f32, dy: f32) {
        self.scroll.move_to(dx, dy);
    }

    /// Stamp a velocity disturbance at a world position. The stamp lands in
    /// the staging grid immediately and is uploaded at the start of the
    /// next tick.
    pub fn inject_velocity(&mut self, x: f32, y: f32, radius: f32, dx: f32, dy: f32) {
        let center = stamp::world_to_grid(x, y, self.params.dimensions, &self.staging.velocity);
        let r = stamp::radius_to_grid(radius, self.params.dimensions, &self.staging.velocity);
        let px = stamp::encode_velocity(dx, dy, self.params.dimensions);
        self.staging.velocity.stamp_circle(center, r, px);
    }

    /// Stamp a color disturbance at a world position. Consumed by the next
    /// tick's advance pass, then cleared.
    pub fn inject_color(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        let center = stamp::world_to_grid(x, y, self.params.dimensions, &self.staging.color);
        let r = stamp::radius_to_grid(radius, self.params.dimensions, &self.staging.color);
        self.staging.color.stamp_circle(center, r, color.to_bytes());
    }

    pub fn set_viewpoint(&mut self, view: Vec3) {
        self.params.view = view;
    }

    pub fn set_sun_position(&mut self, sun: Vec3) {
        self.params.sun = sun;
    }

    pub fn set_sun_color(&mut self, color: Vec3) {
        self.params.sun_color = color;
    }

    /// Run one tick against the wall clock. The first call sees a zero
    /// elapsed time, which the decay math treats as "no decay".
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|t| now.duration_since(t))
            .unwrap_or_default();
        self.last_tick = Some(now);
        self.step(dt);
    }

    /// Run one tick with an explicit elapsed time. Deterministic: the same
    /// sequence of inputs and durations always produces the same fields.
    pub fn step(&mut self, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        self.time += dt_sec;

        self.params.time = self.time;
        self.params.delta = dt_sec * self.config.advect_speed;
        self.params.velocity_decay =
            config::velocity_decay_for(self.config.velocity_fade_ms, dt_sec * 1000.0);
        self.params.pressure_decay = config::decay_factor(self.config.pressure_fade_ticks);
        self.params.offset = self.scroll.offset;
        self.params.offset_fraction = self.scroll.fraction_delta();
        self.params.display_fraction = self.scroll.display_fraction();
        self.params.read_main = (self.tick_count % 2) as usize;

        self.upload_velocity();

        (self.kernels.offset)(&self.params, &mut self.buffers, &self.staging);
        (self.kernels.advect)(&self.params, &mut self.buffers, &self.staging);
        (self.kernels.divergence)(&self.params, &mut self.buffers, &self.staging);
        for _ in 0..self.config.relax_passes.max(1) {
            (self.kernels.pressure)(&self.params, &mut self.buffers, &self.staging);
        }
        (self.kernels.project)(&self.params, &mut self.buffers, &self.staging);
        (self.kernels.advance)(&self.params, &mut self.buffers, &self.staging);
        (self.kernels.composite)(&self.params, &mut self.buffers, &self.staging);

        self.staging.color.clear();
        self.scroll.end_tick();
        self.tick_count += 1;
    }

    /// Decode staged velocity stamps additively into the velocity field.
    fn upload_velocity(&mut self) {
        if !self.staging.velocity.is_dirty() {
            return;
        }
        let grid = &self.staging.velocity;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let px = grid.pixel(x as i32, y as i32);
                if px[3] == 0 {
                    continue;
                }
                let d = stamp::decode_velocity(px);
                let (xi, yi) = (x as i32, y as i32);
                let mut v = self.buffers.velocity.get(xi, yi);
                v[0] += d.x;
                v[1] += d.y;
                self.buffers.velocity.set(xi, yi, v);
            }
        }
        self.staging.velocity.clear();
    }

    /// Water height and surface normal at a world position. Flat water
    /// before the first tick.
    pub fn height_and_normal_at(&self, x: f32, y: f32) -> HeightSample {
        if self.tick_count == 0 {
            return HeightSample::NEUTRAL;
        }
        sampler::sample(
            &self.buffers.composite,
            self.params.dimensions,
            self.scroll.world_offset,
            self.time,
            x,
            y,
        )
    }

    /// Half the current world extent, the scale used by world-to-field
    /// mappings.
    pub fn dimensions(&self) -> Vec2 {
        self.params.dimensions
    }

    /// The wave bias consumers combine with height samples, see
    /// [`HeightSample::buoyancy_offset`].
    pub fn wave_bias(&self) -> Vec2 {
        self.params.wave_bias
    }

    /// The displayable shaded field, refreshed every tick.
    pub fn composite(&self) -> &Field {
        &self.buffers.composite
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Index of the most recently written main buffer.
    pub fn read_index(&self) -> usize {
        (self.tick_count % 2) as usize
    }

    /// Main state buffer by index, for inspection.
    pub fn main_buffer(&self, index: usize) -> &Field {
        &self.buffers.main[index % 2]
    }

    /// Sum of squared velocity components across the fluid grid.
    pub fn velocity_energy(&self) -> f64 {
        self.buffers.velocity.energy_xy()
    }

    pub fn velocity_staging(&self) -> &StagingGrid {
        &self.staging.velocity
    }

    pub fn color_staging(&self) -> &StagingGrid {
        &self.staging.color
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    /// True if every buffer holds only finite values.
    pub fn is_finite(&self) -> bool {
        self.buffers.velocity.is_finite()
            && self.buffers.pressure.is_finite()
            && self.buffers.back.is_finite()
            && self.buffers.main[0].is_finite()
            && self.buffers.main[1].is_finite()
            && self.buffers.composite.is_finite()
    }
}
