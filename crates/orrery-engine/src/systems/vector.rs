//! Lyon-backed [`Surface`].
//!
//! Tessellates every draw call on the CPU into a flat triangle-list buffer of
//! [`VectorVertex`] floats that a WebGL/WebGPU host uploads as-is. The buffer
//! is reset by [`Surface::clear`], so it always holds exactly one frame.
//!
//! Circles and lines are culled against the rectangle given to `clear`, so
//! a circle whose radius dwarfs the viewport only tessellates the part that
//! can show. Dashed circles are emitted as one open arc polyline per dash.

use std::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, Vec2};
use lyon::math::point;
use lyon::path::path::Builder as PathBuilder;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

use crate::renderer::color::Color;
use crate::renderer::traits::{Dash, Surface};

/// Stroke width of orbit paths, trails and rings.
pub const LINE_WIDTH: f32 = 1.0;
/// Tessellation tolerance in surface units.
pub const TOLERANCE: f32 = 0.25;
/// Largest angle covered by one chord of an arc.
const MAX_ARC_STEP: f64 = 0.05;
/// Most chords emitted for a single arc.
pub const MAX_ARC_SEGMENTS: usize = 2048;
/// Most dashes emitted for one stroked circle window.
pub const MAX_DASHES: usize = 4096;

/// Per-vertex data: position then RGBA.
/// 6 floats = 24 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn new(position: lyon::math::Point, color: Color) -> Self {
        Self {
            x: position.x,
            y: position.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

struct FillCtor {
    color: Color,
}

impl FillVertexConstructor<VectorVertex> for FillCtor {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        VectorVertex::new(vertex.position(), self.color)
    }
}

struct StrokeCtor {
    color: Color,
}

impl StrokeVertexConstructor<VectorVertex> for StrokeCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        VectorVertex::new(vertex.position(), self.color)
    }
}

/// Split the `[from, to]` window of a circle, in radians within `[0, TAU]`,
/// into the arcs a dash pattern keeps.
///
/// The pattern begins `phase` units into its period at angle 0, the way a
/// canvas `lineDashOffset` does. Dashes are addressed by index, so the cost
/// is proportional to the dashes inside the window, not to the circumference.
///
/// Returns `None` when the pattern is degenerate or the window would need
/// more than [`MAX_DASHES`] dashes; the caller strokes the window solid.
pub fn dash_arcs(radius: f64, dash: Dash, from: f64, to: f64) -> Option<Vec<(f64, f64)>> {
    if !radius.is_finite() || radius <= 0.0 || !from.is_finite() || !to.is_finite() || to <= from {
        return Some(Vec::new());
    }
    let on = f64::from(dash.on);
    let period = on + f64::from(dash.off);
    if on <= 0.0 || !period.is_finite() || period <= 0.0 {
        return None;
    }

    let phase = f64::from(dash.phase);
    let first = ((from * radius + phase) / period).floor();
    let last = ((to * radius + phase) / period).ceil();
    let count = last - first;
    if !count.is_finite() || count > MAX_DASHES as f64 {
        return None;
    }

    let mut arcs = Vec::with_capacity(count as usize);
    for k in 0..count as usize {
        let start = (first + k as f64) * period - phase;
        let a = (start / radius).max(from);
        let b = ((start + on) / radius).min(to);
        if b > a {
            arcs.push((a, b));
        }
    }
    Some(arcs)
}

/// Number of chords needed to sweep `sweep` radians of a circle within
/// [`TOLERANCE`].
fn arc_segments(radius: f64, sweep: f64) -> usize {
    let step = (8.0 * f64::from(TOLERANCE) / radius).sqrt().min(MAX_ARC_STEP);
    let n = (sweep / step).ceil();
    if n.is_finite() {
        (n as usize).clamp(1, MAX_ARC_SEGMENTS)
    } else {
        1
    }
}

fn arc_point(center: DVec2, radius: f64, angle: f64) -> lyon::math::Point {
    let p = center + DVec2::from_angle(angle) * radius;
    point(p.x as f32, p.y as f32)
}

/// Append the open polyline of an arc as one subpath.
fn add_arc(builder: &mut PathBuilder, center: DVec2, radius: f64, from: f64, to: f64) {
    let steps = arc_segments(radius, to - from);
    builder.begin(arc_point(center, radius, from));
    for i in 1..=steps {
        let angle = from + (to - from) * i as f64 / steps as f64;
        builder.line_to(arc_point(center, radius, angle));
    }
    builder.end(false);
}

/// Split an angular window of any start into pieces within `[0, TAU]`.
fn wrap_window(from: f64, to: f64) -> Vec<(f64, f64)> {
    let start = from.rem_euclid(TAU);
    let end = start + (to - from);
    if end <= TAU {
        vec![(start, end)]
    } else {
        vec![(start, TAU), (0.0, end - TAU)]
    }
}

/// Visible area of a frame: the rectangle passed to `clear` and the disc
/// around it that circles and lines are culled against.
#[derive(Debug, Clone, Copy)]
struct Clip {
    origin: DVec2,
    size: DVec2,
    center: DVec2,
    reach: f64,
}

impl Clip {
    fn new(origin: Vec2, size: Vec2) -> Self {
        let origin = origin.as_dvec2();
        let size = size.as_dvec2().abs();
        Self {
            origin,
            size,
            center: origin + size * 0.5,
            reach: size.length() * 0.5 + f64::from(LINE_WIDTH),
        }
    }

    fn visibility(&self, center: DVec2, radius: f64) -> Visibility {
        let to_clip = self.center - center;
        let d = to_clip.length();
        let h = self.reach;
        if d + h < radius {
            return Visibility::Covered;
        }
        if d > radius + h {
            return Visibility::Hidden;
        }
        if d + radius <= h {
            return Visibility::Full;
        }
        // 1 - cos of the half-angle at which the circle crosses the clip
        // disc, in a form that stays accurate when radius and d are both huge.
        let k = (h * h - (radius - d) * (radius - d)) / (2.0 * radius * d);
        if k >= 2.0 {
            return Visibility::Full;
        }
        let half = 2.0 * (k.max(0.0) * 0.5).sqrt().asin();
        let toward = to_clip.y.atan2(to_clip.x);
        Visibility::Arc {
            from: toward - half,
            to: toward + half,
        }
    }

    /// Whether the segment `a..b` passes through the clip disc.
    fn touches_segment(&self, a: DVec2, b: DVec2) -> bool {
        let ab = b - a;
        let len2 = ab.length_squared();
        let t = if len2 > 0.0 {
            ((self.center - a).dot(ab) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a + ab * t).distance(self.center) <= self.reach
    }
}

/// How much of a circle falls inside the clip disc.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Visibility {
    Hidden,
    /// The clip disc lies entirely inside the circle.
    Covered,
    Full,
    /// Only the boundary between these angles is inside.
    Arc { from: f64, to: f64 },
}

/// Triangle-list vertex buffer rebuilt every frame.
///
/// Drawing is culled against the rectangle of the last [`Surface::clear`];
/// before the first `clear` nothing is culled.
pub struct VectorSurface {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    translation: Vec2,
    saved: Vec<Vec2>,
    clip: Option<Clip>,
}

impl VectorSurface {
    pub fn new() -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(16384 * VectorVertex::FLOATS),
            translation: Vec2::ZERO,
            saved: Vec::new(),
            clip: None,
        }
    }

    /// Number of vertices currently in the buffer.
    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Raw pointer to the flat float buffer, for zero-copy reads from JS.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn vertices(&self) -> &[VectorVertex] {
        bytemuck::cast_slice(&self.buffer)
    }

    /// Current accumulated translation.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    fn flush_geometry(&mut self) {
        for idx in &self.geometry.indices {
            let v = &self.geometry.vertices[*idx as usize];
            self.buffer.extend_from_slice(&[v.x, v.y, v.r, v.g, v.b, v.a]);
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, FillCtor { color }),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("fill tessellation failed: {e:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, color: Color) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(LINE_WIDTH),
            &mut BuffersBuilder::new(&mut self.geometry, StrokeCtor { color }),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("stroke tessellation failed: {e:?}");
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Transformed center of a circle and its visible part, or `None` when
    /// nothing of it can show.
    fn place_circle(&self, center: Vec2, radius: f32) -> Option<(DVec2, f64, Visibility)> {
        let c = (center + self.translation).as_dvec2();
        let r = f64::from(radius);
        if !r.is_finite() || r <= 0.0 || !c.is_finite() {
            return None;
        }
        let visibility = match &self.clip {
            Some(clip) => clip.visibility(c, r),
            None => Visibility::Full,
        };
        Some((c, r, visibility))
    }

    fn fill_clip_rect(&mut self, color: Color) {
        let Some(clip) = self.clip else {
            return;
        };
        let (min, max) = (clip.origin, clip.origin + clip.size);
        let mut builder = Path::builder();
        builder.begin(point(min.x as f32, min.y as f32));
        builder.line_to(point(max.x as f32, min.y as f32));
        builder.line_to(point(max.x as f32, max.y as f32));
        builder.line_to(point(min.x as f32, max.y as f32));
        builder.end(true);
        self.fill_path(&builder.build(), color);
    }

    /// Fill the lens where a circle overlaps the clip disc: the circle's arc
    /// from `from` to `to`, closed by the clip disc's boundary.
    fn fill_lens(&mut self, center: DVec2, radius: f64, from: f64, to: f64, color: Color) {
        let Some(clip) = self.clip else {
            return;
        };
        let angle_on_clip = |a: f64| {
            let p = center + DVec2::from_angle(a) * radius - clip.center;
            p.y.atan2(p.x)
        };
        let back_from = angle_on_clip(to);
        let mut back_to = angle_on_clip(from);
        if back_to <= back_from {
            back_to += TAU;
        }

        let mut builder = Path::builder();
        let steps = arc_segments(radius, to - from);
        builder.begin(arc_point(center, radius, from));
        for i in 1..=steps {
            let a = from + (to - from) * i as f64 / steps as f64;
            builder.line_to(arc_point(center, radius, a));
        }
        let steps = arc_segments(clip.reach, back_to - back_from);
        for i in 1..steps {
            let a = back_from + (back_to - back_from) * i as f64 / steps as f64;
            builder.line_to(arc_point(clip.center, clip.reach, a));
        }
        builder.end(true);
        self.fill_path(&builder.build(), color);
    }

    fn stroke_window(
        &mut self,
        center: DVec2,
        radius: f64,
        (from, to): (f64, f64),
        dash: Option<Dash>,
        color: Color,
    ) {
        let mut builder = Path::builder();
        for (a, b) in wrap_window(from, to) {
            match dash.and_then(|d| dash_arcs(radius, d, a, b)) {
                Some(arcs) => {
                    for (x, y) in arcs {
                        add_arc(&mut builder, center, radius, x, y);
                    }
                }
                None => add_arc(&mut builder, center, radius, a, b),
            }
        }
        self.stroke_path(&builder.build(), color);
    }
}

impl Default for VectorSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for VectorSurface {
    fn clear(&mut self, origin: Vec2, size: Vec2) {
        self.buffer.clear();
        self.clip = Some(Clip::new(origin + self.translation, size));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some((c, r, visibility)) = self.place_circle(center, radius) else {
            return;
        };
        match visibility {
            Visibility::Hidden => {}
            Visibility::Covered => self.fill_clip_rect(color),
            Visibility::Full => {
                let mut builder = Path::builder();
                builder.add_circle(point(c.x as f32, c.y as f32), radius, Winding::Positive);
                self.fill_path(&builder.build(), color);
            }
            Visibility::Arc { from, to } => self.fill_lens(c, r, from, to, color),
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, dash: Option<Dash>) {
        let Some((c, r, visibility)) = self.place_circle(center, radius) else {
            return;
        };
        match (visibility, dash) {
            (Visibility::Hidden | Visibility::Covered, _) => {}
            (Visibility::Full, None) => {
                let mut builder = Path::builder();
                builder.add_circle(point(c.x as f32, c.y as f32), radius, Winding::Positive);
                self.stroke_path(&builder.build(), color);
            }
            (Visibility::Full, Some(_)) => self.stroke_window(c, r, (0.0, TAU), dash, color),
            (Visibility::Arc { from, to }, _) => self.stroke_window(c, r, (from, to), dash, color),
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let a = from + self.translation;
        let b = to + self.translation;
        if let Some(clip) = &self.clip {
            if !clip.touches_segment(a.as_dvec2(), b.as_dvec2()) {
                return;
            }
        }
        let mut builder = Path::builder();
        builder.begin(point(a.x, a.y));
        builder.line_to(point(b.x, b.y));
        builder.end(false);
        self.stroke_path(&builder.build(), color);
    }

    fn save(&mut self) {
        self.saved.push(self.translation);
    }

    fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.translation = t;
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.translation += delta;
    }
}
