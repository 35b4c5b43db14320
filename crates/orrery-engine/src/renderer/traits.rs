//! The drawing sink the engine renders into.
//!
//! The engine only describes what to draw. A host supplies a `Surface`:
//! a Canvas2D wrapper in the browser, the lyon-backed
//! [`VectorSurface`](crate::systems::vector::VectorSurface) for GPU upload, or
//! the [`RecordingSurface`](super::recording::RecordingSurface) for tests.

use glam::Vec2;

use super::color::Color;

/// Dash pattern for stroked circles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    /// Length of each drawn segment in surface units.
    pub on: f32,
    /// Length of each gap in surface units.
    pub off: f32,
    /// Distance into the pattern at which the stroke starts, in surface units.
    pub phase: f32,
}

impl Dash {
    pub const fn new(on: f32, off: f32) -> Self {
        Self { on, off, phase: 0.0 }
    }

    pub const fn with_phase(self, phase: f32) -> Self {
        Self { phase, ..self }
    }
}

/// 2D drawing surface.
///
/// Coordinates passed to the drawing calls are transformed by the current
/// translation; `save`/`restore` push and pop that translation.
pub trait Surface {
    /// Clear an axis-aligned rectangle given in untransformed surface units.
    fn clear(&mut self, origin: Vec2, size: Vec2);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, dash: Option<Dash>);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop the most recently saved transform. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Offset subsequent drawing by `delta`.
    fn translate(&mut self, delta: Vec2);
}
