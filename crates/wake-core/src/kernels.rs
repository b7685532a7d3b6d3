//! The named kernel passes that make up one simulation tick.
//!
//! Each kernel has the shape of a fragment program: it reads one or more
//! fields plus the shared per-tick parameters, and writes exactly one
//! field. The registry resolves kernels by name at engine construction,
//! and construction fails up front if any required kernel is missing
//! rather than producing a partial pipeline.

use fnv::FnvHashMap;
use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::error::WakeError;
use crate::field::{split_main, Field, FieldBuffers};
use crate::params::SimulationParams;
use crate::stamp::Staging;

/// A single simulation pass. Parameters are read-only; the pass picks its
/// source and destination buffers out of `FieldBuffers` so that a source is
/// never also a destination.
pub type Kernel = fn(&SimulationParams, &mut FieldBuffers, &Staging);

/// Every pass a tick runs, in pipeline order.
pub const REQUIRED_KERNELS: [&str; 7] = [
    "offset",
    "advect",
    "divergence",
    "pressure",
    "project",
    "advance",
    "composite",
];

/// Look up a kernel by its registry name.
pub fn resolve(name: &str) -> Option<Kernel> {
    match name {
        "offset" => Some(offset_pass),
        "advect" => Some(advect_pass),
        "divergence" => Some(divergence_pass),
        "pressure" => Some(pressure_pass),
        "project" => Some(project_pass),
        "advance" => Some(advance_pass),
        "composite" => Some(composite_pass),
        _ => None,
    }
}

/// The resolved set of passes run by the engine each tick.
pub struct KernelSet {
    pub offset: Kernel,
    pub advect: Kernel,
    pub divergence: Kernel,
    pub pressure: Kernel,
    pub project: Kernel,
    pub advance: Kernel,
    pub composite: Kernel,
}

impl KernelSet {
    /// Resolve every required kernel, reporting each missing name before
    /// failing with the combined list.
    pub fn load() -> Result<Self, WakeError> {
        let mut table: FnvHashMap<&str, Kernel> = FnvHashMap::default();
        let mut missing: SmallVec<[&str; 8]> = SmallVec::new();
        for name in REQUIRED_KERNELS {
            match resolve(name) {
                Some(kernel) => {
                    table.insert(name, kernel);
                }
                None => {
                    log::error!("kernel program '{name}' failed to load");
                    missing.push(name);
                }
            }
        }
        if !missing.is_empty() {
            return Err(WakeError::KernelLoad {
                names: missing.join(", "),
            });
        }
        log::debug!("loaded {} kernel programs", table.len());
        Ok(Self {
            offset: table["offset"],
            advect: table["advect"],
            divergence: table["divergence"],
            pressure: table["pressure"],
            project: table["project"],
            advance: table["advance"],
            composite: table["composite"],
        })
    }
}

/// Scroll shift for this tick in texels of `field`: whole-texel delta plus
/// the fractional remainder, both field-normalized in the params.
fn scroll_shift(params: &SimulationParams, field: &Field) -> Vec2 {
    (params.offset + params.offset_fraction)
        * Vec2::new(field.width() as f32, field.height() as f32)
}

/// Shift the velocity field by this tick's scroll delta so disturbances
/// stay put in world space while the buffers follow the viewpoint.
/// Velocity moves into the back buffer; `advect` moves it home again.
fn offset_pass(params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    let shift = scroll_shift(params, &buffers.velocity);
    let (w, h) = (buffers.velocity.width(), buffers.velocity.height());
    for y in 0..h {
        for x in 0..w {
            let v = buffers
                .velocity
                .sample_linear(x as f32 - shift.x, y as f32 - shift.y);
            buffers.back.set(x as i32, y as i32, v);
        }
    }
}

/// Semi-Lagrangian self-advection: each texel pulls velocity from the
/// upstream position `p - v * delta`, reading the scroll-corrected copy in
/// the back buffer and writing the velocity field.
fn advect_pass(params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    let (w, h) = (buffers.velocity.width(), buffers.velocity.height());
    for y in 0..h {
        for x in 0..w {
            let v = buffers.back.get(x as i32, y as i32);
            let src_x = x as f32 - v[0] * params.delta;
            let src_y = y as f32 - v[1] * params.delta;
            let out = buffers.back.sample_linear(src_x, src_y);
            buffers.velocity.set(x as i32, y as i32, out);
        }
    }
}

/// Central-difference divergence of the advected velocity, packed next to
/// the scroll-shifted previous pressure so the relaxation passes have both
/// in one buffer.
fn divergence_pass(params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    let shift = scroll_shift(params, &buffers.pressure);
    let (w, h) = (buffers.velocity.width(), buffers.velocity.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as i32, y as i32);
            let p = buffers
                .pressure
                .sample_linear(x as f32 - shift.x, y as f32 - shift.y);
            let div = 0.5
                * (buffers.velocity.get(xi + 1, yi)[0] - buffers.velocity.get(xi - 1, yi)[0]
                    + buffers.velocity.get(xi, yi + 1)[1]
                    - buffers.velocity.get(xi, yi - 1)[1]);
            buffers.back.set(xi, yi, [p[0], div, 0.0, 0.0]);
        }
    }
}

/// One Jacobi relaxation step: pressure in the first channel, divergence
/// carried along in the second so every iteration sees it.
fn jacobi(src: &Field, dst: &mut Field) {
    let (w, h) = (src.width(), src.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as i32, y as i32);
            let here = src.get(xi, yi);
            let p = 0.25
                * (src.get(xi - 1, yi)[0]
                    + src.get(xi + 1, yi)[0]
                    + src.get(xi, yi - 1)[0]
                    + src.get(xi, yi + 1)[0]
                    - here[1]);
            dst.set(xi, yi, [p, here[1], 0.0, 0.0]);
        }
    }
}

/// A pair of Jacobi iterations ping-ponged between the back buffer and the
/// pressure field, finishing with the relaxed pressure back in place. The
/// engine repeats this kernel `relax_passes` times.
fn pressure_pass(_params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    jacobi(&buffers.back, &mut buffers.pressure);
    jacobi(&buffers.pressure, &mut buffers.back);
    buffers.pressure.clone_from(&buffers.back);
}

/// Subtract the pressure gradient from the velocity field, then apply the
/// per-tick decay factors. The gradient read touches only the pressure
/// field, so the in-place velocity update is texel-local.
fn project_pass(params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    let (w, h) = (buffers.velocity.width(), buffers.velocity.height());
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (x as i32, y as i32);
            let gx = 0.5 * (buffers.pressure.get(xi + 1, yi)[0] - buffers.pressure.get(xi - 1, yi)[0]);
            let gy = 0.5 * (buffers.pressure.get(xi, yi + 1)[0] - buffers.pressure.get(xi, yi - 1)[0]);
            let mut v = buffers.velocity.get(xi, yi);
            v[0] = (v[0] - gx) * params.velocity_decay;
            v[1] = (v[1] - gy) * params.velocity_decay;
            buffers.velocity.set(xi, yi, v);
        }
    }
    if params.pressure_decay < 1.0 {
        for y in 0..h {
            for x in 0..w {
                let (xi, yi) = (x as i32, y as i32);
                let mut p = buffers.pressure.get(xi, yi);
                p[0] *= params.pressure_decay;
                buffers.pressure.set(xi, yi, p);
            }
        }
    }
}

/// Advance the full-resolution main state: carry the previous tick's state
/// through the scroll shift, blend stamped color on top and rebuild the
/// height channel from persistence plus local flow speed.
fn advance_pass(params: &SimulationParams, buffers: &mut FieldBuffers, staging: &Staging) {
    let FieldBuffers {
        velocity, main, ..
    } = buffers;
    let (prev, next) = split_main(main, params.read_main);
    let (w, h) = (next.width(), next.height());
    let shift = params.offset * Vec2::new(w as f32, h as f32)
        + params.offset_fraction * Vec2::new(w as f32, h as f32);
    let sx = velocity.width() as f32 / w as f32;
    let sy = velocity.height() as f32 / h as f32;
    let gx = staging.color.width() as f32 / w as f32;
    let gy = staging.color.height() as f32 / h as f32;
    let color_dirty = staging.color.is_dirty();

    for y in 0..h {
        for x in 0..w {
            let mut t = prev.sample_linear(x as f32 - shift.x, y as f32 - shift.y);

            if color_dirty {
                let px = staging
                    .color
                    .pixel((x as f32 * gx) as i32, (y as f32 * gy) as i32);
                let a = px[3] as f32 / 255.0;
                if a > 0.0 {
                    t[0] += (px[0] as f32 / 255.0 - t[0]) * a;
                    t[1] += (px[1] as f32 / 255.0 - t[1]) * a;
                    t[2] += (px[2] as f32 / 255.0 - t[2]) * a;
                }
            }

            let v = velocity.sample_linear(x as f32 * sx, y as f32 * sy);
            let speed = (v[0] * v[0] + v[1] * v[1]).sqrt();
            t[3] = (t[3] * params.height_persistence + speed * params.wake_gain)
                .clamp(0.0, 1.0);
            next.set(x as i32, y as i32, t);
        }
    }
}

/// Shade the freshly advanced main state into the displayable composite:
/// surface normal from central height differences, a bounded sun glint and
/// a slow ambient ripple scaled by the wave bias.
fn composite_pass(params: &SimulationParams, buffers: &mut FieldBuffers, _staging: &Staging) {
    let FieldBuffers {
        main, composite, ..
    } = buffers;
    let fresh = &main[1 - params.read_main];
    let (w, h) = (composite.width(), composite.height());
    let shift = params.display_fraction * Vec2::new(w as f32, h as f32);

    let sun_dir = params.sun.try_normalize().unwrap_or(Vec3::Z);
    let view_dir = params.view.try_normalize().unwrap_or(Vec3::Z);
    let half = (sun_dir + view_dir).try_normalize().unwrap_or(Vec3::Z);

    const HEIGHT_SLOPE: f32 = 4.0;
    let tau = std::f32::consts::TAU;

    for y in 0..h {
        for x in 0..w {
            let fx = x as f32 - shift.x;
            let fy = y as f32 - shift.y;
            let here = fresh.sample_linear(fx, fy);
            let dhx = fresh.sample_linear(fx + 1.0, fy)[3] - fresh.sample_linear(fx - 1.0, fy)[3];
            let dhy = fresh.sample_linear(fx, fy + 1.0)[3] - fresh.sample_linear(fx, fy - 1.0)[3];
            let n = Vec3::new(-dhx * HEIGHT_SLOPE, -dhy * HEIGHT_SLOPE, 1.0).normalize();

            let glint = n.dot(half).max(0.0).powi(8) * 0.25;

            let u = x as f32 / w as f32;
            let v = y as f32 / h as f32;
            let ripple = (tau * (u * 13.0 + params.time / 17.0)).sin()
                * (tau * (v * 11.0 - params.time / 19.0)).cos();
            let height =
                (here[3] + params.wave_bias.x * 0.25 * ripple).clamp(0.0, 1.0);

            composite.set(
                x as i32,
                y as i32,
                [
                    (n.x * 0.5 + 0.5 + glint * params.sun_color.x).clamp(0.0, 1.0),
                    (n.y * 0.5 + 0.5 + glint * params.sun_color.y).clamp(0.0, 1.0),
                    (n.z + glint * params.sun_color.z).clamp(0.0, 1.0),
                    height,
                ],
            );
        }
    }
}
