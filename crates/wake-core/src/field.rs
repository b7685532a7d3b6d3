//! Toroidal RGBA float fields and the render-target set owned by the engine.
//!
//! Every buffer in the simulation wraps at the edges. This is intentional:
//! the field scrolls under the viewpoint indefinitely, so a disturbance
//! leaving one edge must re-enter at the opposite edge instead of clamping.

use crate::error::WakeError;

/// A fixed-size 2D grid of RGBA `f32` texels with wrap-around addressing.
#[derive(Clone, Debug)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<[f32; 4]>,
}

impl Field {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 4]; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw texel storage, row-major.
    pub fn texels(&self) -> &[[f32; 4]] {
        &self.data
    }

    /// Byte view of the texel storage, laid out for a `Rgba32Float`
    /// texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    fn wrap(v: i32, n: usize) -> usize {
        v.rem_euclid(n as i32) as usize
    }

    /// Texel read with toroidal addressing: any integer coordinate is
    /// equivalent to `(x mod width, y mod height)`.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> [f32; 4] {
        let xi = Self::wrap(x, self.width);
        let yi = Self::wrap(y, self.height);
        self.data[yi * self.width + xi]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, texel: [f32; 4]) {
        let xi = Self::wrap(x, self.width);
        let yi = Self::wrap(y, self.height);
        self.data[yi * self.width + xi] = texel;
    }

    /// Bilinear read at a fractional texel coordinate, wrapping at edges.
    /// Exact at integer coordinates.
    pub fn sample_linear(&self, x: f32, y: f32) -> [f32; 4] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let xi = x0 as i32;
        let yi = y0 as i32;

        let p00 = self.get(xi, yi);
        let p10 = self.get(xi + 1, yi);
        let p01 = self.get(xi, yi + 1);
        let p11 = self.get(xi + 1, yi + 1);

        let mut out = [0.0; 4];
        for c in 0..4 {
            let top = p00[c] * (1.0 - fx) + p10[c] * fx;
            let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
            out[c] = top * (1.0 - fy) + bottom * fy;
        }
        out
    }

    pub fn fill(&mut self, texel: [f32; 4]) {
        for t in &mut self.data {
            *t = texel;
        }
    }

    /// Sum of squared values in the first two channels. The energy metric
    /// used for the velocity field.
    pub fn energy_xy(&self) -> f64 {
        self.data
            .iter()
            .map(|t| (t[0] as f64) * (t[0] as f64) + (t[1] as f64) * (t[1] as f64))
            .sum()
    }

    pub fn is_finite(&self) -> bool {
        self.data
            .iter()
            .all(|t| t.iter().all(|v| v.is_finite()))
    }
}

/// All render targets of the simulation, allocated once at construction.
///
/// The composite and the two ping-pong main buffers run at full resolution;
/// the fluid trio (velocity, pressure, transient back-buffer) runs at the
/// reduced simulation scale.
#[derive(Clone, Debug)]
pub struct FieldBuffers {
    pub velocity: Field,
    pub pressure: Field,
    pub back: Field,
    pub main: [Field; 2],
    pub composite: Field,
}

impl FieldBuffers {
    pub fn allocate(width: u32, height: u32, sim_scale: u32) -> Result<Self, WakeError> {
        if width == 0 || height == 0 {
            return Err(WakeError::InvalidSize { width, height });
        }
        let scale = sim_scale.max(1);
        let sw = (width / scale).max(1) as usize;
        let sh = (height / scale).max(1) as usize;
        let w = width as usize;
        let h = height as usize;
        log::info!("allocating field buffers {w}x{h} (fluid {sw}x{sh})");
        Ok(Self {
            velocity: Field::new(sw, sh),
            pressure: Field::new(sw, sh),
            back: Field::new(sw, sh),
            main: [Field::new(w, h), Field::new(w, h)],
            composite: Field::new(w, h),
        })
    }

}

/// Borrow one main buffer for reading and the other for writing. A pass
/// can therefore never read and write the same buffer.
pub fn split_main(main: &mut [Field; 2], read: usize) -> (&Field, &mut Field) {
    let (a, b) = main.split_at_mut(1);
    if read == 0 {
        (&a[0], &mut b[0])
    } else {
        (&b[0], &mut a[0])
    }
}
