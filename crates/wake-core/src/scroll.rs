use glam::{IVec2, Vec2};

/// Tracks the viewpoint translation applied to the field.
///
/// The continuous position is split into a rounded texel position and a
/// sub-texel fraction. Whole-texel motion is applied through integer buffer
/// addressing in the offset kernel; the fractional part of each tick's
/// motion is compensated with a bilinear shift in the same pass. Splitting
/// the two keeps long scrolls from accumulating resampling blur.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    /// Continuous position in texels.
    pub position: Vec2,
    /// Position rounded down to whole texels.
    pub rounded: IVec2,
    /// Whole-texel delta since the last tick, in field-normalized units.
    /// Accumulates across multiple `move_to` calls within one tick.
    pub offset: Vec2,
    /// Current sub-texel remainder `(position - rounded) / size`.
    pub offset_fraction: Vec2,
    /// Cumulative world offset, used by the height sampler to keep queries
    /// anchored to world space while the buffers follow the viewpoint.
    pub world_offset: Vec2,
    /// Sub-texel remainder at the end of the previous tick.
    fraction_prev: Vec2,
    size: Vec2,
}

impl ScrollTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            rounded: IVec2::ZERO,
            offset: Vec2::ZERO,
            offset_fraction: Vec2::ZERO,
            world_offset: Vec2::ZERO,
            fraction_prev: Vec2::ZERO,
            size: Vec2::new(width as f32, height as f32),
        }
    }

    /// Translate the viewpoint by `(dx, dy)` in field-normalized units.
    pub fn move_to(&mut self, dx: f32, dy: f32) {
        self.world_offset -= Vec2::new(dx, dy);
        self.position += Vec2::new(dx * self.size.x, dy * self.size.y);

        let x = self.position.x.floor() as i32;
        let y = self.position.y.floor() as i32;
        self.offset += Vec2::new(
            (self.rounded.x - x) as f32 / self.size.x,
            (self.rounded.y - y) as f32 / self.size.y,
        );
        self.rounded = IVec2::new(x, y);
        self.offset_fraction = Vec2::new(
            (self.position.x - x as f32) / self.size.x,
            (self.position.y - y as f32) / self.size.y,
        );
    }

    /// Fractional part of this tick's scroll delta, the piece the offset
    /// kernel compensates on top of the whole-texel `offset`.
    pub fn fraction_delta(&self) -> Vec2 {
        self.fraction_prev - self.offset_fraction
    }

    /// Sub-texel shift applied when rendering the composite, so display
    /// motion stays smooth between whole-texel steps.
    pub fn display_fraction(&self) -> Vec2 {
        -self.offset_fraction
    }

    /// Invariant from the data model: the continuous position never drifts
    /// more than one texel from the rounded position.
    pub fn within_one_texel(&self) -> bool {
        let dx = self.position.x - self.rounded.x as f32;
        let dy = self.position.y - self.rounded.y as f32;
        (0.0..1.0).contains(&dx) && (0.0..1.0).contains(&dy)
    }

    /// Clear the per-tick offset once a tick has consumed it. The position
    /// split and the cumulative world offset persist.
    pub fn end_tick(&mut self) {
        self.offset = Vec2::ZERO;
        self.fraction_prev = self.offset_fraction;
    }
}
