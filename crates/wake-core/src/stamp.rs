//! Disturbance rasterization.
//!
//! External events (a point, a radius and either a velocity vector or a
//! color) are stamped as filled circles into CPU-side RGBA8 staging grids.
//! Velocity vectors are encoded as signed offsets around the 128 midpoint
//! so they fit unsigned channels, and the whole grid is cleared to
//! transparent once a tick has uploaded it. Overlapping stamps within a
//! tick are last-write-wins per pixel.

use glam::Vec2;

use crate::error::WakeError;

/// An RGBA color with unit-range channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb` or `#rrggbb` hex literals; alpha is always 1.
    pub fn from_hex(s: &str) -> Result<Self, WakeError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let bad = || WakeError::InvalidColor(s.to_string());
        let channel = |t: &str| u8::from_str_radix(t, 16).map_err(|_| bad());
        let (r, g, b) = match hex.len() {
            3 => {
                let d = |i: usize| -> Result<u8, WakeError> {
                    let v = channel(&hex[i..i + 1])?;
                    Ok(v * 17)
                };
                (d(0)?, d(1)?, d(2)?)
            }
            6 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ),
            _ => return Err(bad()),
        };
        Ok(Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            1.0,
        ))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0) as u8,
            (self.a.clamp(0.0, 1.0) * 255.0) as u8,
        ]
    }
}

/// A CPU-side RGBA8 grid that disturbances are stamped into before upload.
#[derive(Clone, Debug)]
pub struct StagingGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
    dirty: bool,
}

impl StagingGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
            dirty: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// True if anything has been stamped since the last clear.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
        let xi = x.rem_euclid(self.width as i32) as usize;
        let yi = y.rem_euclid(self.height as i32) as usize;
        let i = (yi * self.width + xi) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Stamp a filled circle, wrapping toroidally at the edges so that
    /// disturbances near a border re-enter on the opposite side.
    pub fn stamp_circle(&mut self, center: Vec2, radius: f32, rgba: [u8; 4]) {
        let r = radius.max(0.5);
        let r2 = r * r;
        let x0 = (center.x - r).floor() as i32;
        let x1 = (center.x + r).ceil() as i32;
        let y0 = (center.y - r).floor() as i32;
        let y1 = (center.y + r).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let xi = x.rem_euclid(self.width as i32) as usize;
                let yi = y.rem_euclid(self.height as i32) as usize;
                let i = (yi * self.width + xi) * 4;
                self.data[i..i + 4].copy_from_slice(&rgba);
            }
        }
        self.dirty = true;
    }

    /// Reset to fully transparent after a tick's upload.
    pub fn clear(&mut self) {
        if self.dirty {
            self.data.fill(0);
            self.dirty = false;
        }
    }
}

/// The pair of staging grids a tick uploads: velocity stamps feed the fluid
/// solver, color stamps tint the main state buffers.
#[derive(Clone, Debug)]
pub struct Staging {
    pub velocity: StagingGrid,
    pub color: StagingGrid,
}

impl Staging {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            velocity: StagingGrid::new(width, height),
            color: StagingGrid::new(width, height),
        }
    }
}

/// World position to staging-grid texel mapping. The world origin lands at
/// the grid center and `dimensions` sets the world extent of the field.
pub fn world_to_grid(x: f32, y: f32, dimensions: Vec2, grid: &StagingGrid) -> Vec2 {
    let u = 0.5 + 1.5 * x / dimensions.x;
    let v = 0.5 + 1.5 * y / dimensions.y;
    Vec2::new(u * grid.width() as f32, v * grid.height() as f32)
}

/// World radius to staging-grid texels.
pub fn radius_to_grid(radius: f32, dimensions: Vec2, grid: &StagingGrid) -> f32 {
    radius / dimensions.x * grid.width() as f32
}

/// Encode a velocity vector around the unsigned midpoint as
/// `128 + component * 127` per channel.
pub fn encode_velocity(dx: f32, dy: f32, dimensions: Vec2) -> [u8; 4] {
    let nx = (dx / dimensions.x).clamp(-1.0, 1.0);
    let ny = (dy / dimensions.y).clamp(-1.0, 1.0);
    [
        (128.0 + nx * 127.0) as u8,
        (128.0 + ny * 127.0) as u8,
        0,
        255,
    ]
}

/// Decode one staged velocity pixel back to a signed normalized vector.
#[inline]
pub fn decode_velocity(px: [u8; 4]) -> Vec2 {
    Vec2::new(
        (px[0] as f32 - 128.0) / 127.0,
        (px[1] as f32 - 128.0) / 127.0,
    )
}
