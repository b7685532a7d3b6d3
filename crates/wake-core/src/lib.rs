//! Core wake simulation.
//!
//! A scrolling 2D fluid field for water surfaces: velocity and pressure on
//! a reduced-resolution grid, a ping-ponged full-resolution state buffer
//! and a shaded composite that a front-end uploads as a float texture.
//! Everything here is pure CPU state so it can be driven and inspected
//! headlessly; `wake-native` owns the window and the GPU presentation.

pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod kernels;
pub mod params;
pub mod sampler;
pub mod scroll;
pub mod stamp;

pub use config::WakeConfig;
pub use engine::WakeEngine;
pub use error::WakeError;
pub use field::{Field, FieldBuffers};
pub use sampler::HeightSample;
pub use stamp::Rgba;

/// Fullscreen shader that presents the composite field, shared with the
/// native front-end so the display path lives next to the passes that
/// produce its input.
pub const DISPLAY_WGSL: &str = include_str!("../shaders/display.wgsl");
