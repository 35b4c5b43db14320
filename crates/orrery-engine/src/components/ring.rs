use glam::DVec2;

use crate::api::settings::Settings;
use crate::api::types::{PlanetId, StarId};
use crate::core::rng::Rng;
use crate::renderer::color::Color;
use crate::renderer::traits::{Dash, Surface};

/// Opacity applied to every ring stroke.
pub const RING_ALPHA: f32 = 0.5;
/// Planet rings advance their sweep radius by this fraction of the span.
pub const PLANET_RING_STEP: f64 = 0.02;
/// Strokes per planet ring: the sweep covers `[min, max)`.
pub const PLANET_RING_STROKES: usize = 50;
/// Dash pattern of planet ring strokes, in surface units.
pub const PLANET_RING_DASH: Dash = Dash::new(10.0, 3.0);
/// Upper bound of each additive step between star-ring offsets.
pub const STAR_RING_MAX_STEP: f64 = 0.1;

/// Body a ring is drawn around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingAnchor {
    Star(StarId),
    Planet(PlanetId),
}

/// How the annulus is filled in.
#[derive(Debug, Clone, PartialEq)]
pub enum RingStyle {
    /// Evenly spaced dashed strokes, radii follow planet size scaling.
    Planet,
    /// One solid stroke per fixed offset in [0, 1), radii follow planet
    /// distance scaling.
    Star { offsets: Vec<f64> },
}

/// Purely visual annulus around a star or planet. Has no motion of its own.
#[derive(Debug, Clone)]
pub struct Ring {
    pub anchor: RingAnchor,
    pub color: Color,
    min_radius: f64,
    max_radius: f64,
    style: RingStyle,
}

/// Irregular but stable stroke offsets: additive random steps in (0, 0.1]
/// until 1.0 is reached. Only offsets below 1.0 are kept.
pub fn density_offsets(rng: &mut Rng) -> Vec<f64> {
    let mut offsets = Vec::new();
    let mut x = 0.0;
    loop {
        x += rng.next_step(STAR_RING_MAX_STEP);
        if x >= 1.0 {
            break;
        }
        offsets.push(x);
    }
    offsets
}

impl Ring {
    pub fn around_planet(planet: PlanetId, min_radius: f64, max_radius: f64, color: Color) -> Self {
        Self {
            anchor: RingAnchor::Planet(planet),
            color,
            min_radius,
            max_radius,
            style: RingStyle::Planet,
        }
    }

    /// Star rings draw their offsets from `rng` once, here.
    pub fn around_star(
        star: StarId,
        min_radius: f64,
        max_radius: f64,
        color: Color,
        rng: &mut Rng,
    ) -> Self {
        Self {
            anchor: RingAnchor::Star(star),
            color,
            min_radius,
            max_radius,
            style: RingStyle::Star {
                offsets: density_offsets(rng),
            },
        }
    }

    pub fn style(&self) -> &RingStyle {
        &self.style
    }

    fn scale(&self, settings: &Settings) -> f64 {
        let factor = match self.style {
            RingStyle::Planet => settings.planet_size_scaling,
            RingStyle::Star { .. } => settings.planet_distance_scaling,
        };
        factor * settings.total_scaling
    }

    /// Effective inner radius, measured from the anchor's disk edge.
    pub fn rad_min(&self, settings: &Settings) -> f64 {
        self.min_radius * self.scale(settings)
    }

    /// Effective outer radius, measured from the anchor's disk edge.
    pub fn rad_max(&self, settings: &Settings) -> f64 {
        self.max_radius * self.scale(settings)
    }

    /// Draw around an anchor at `anchor_pos` whose disk is `anchor_size`.
    pub fn draw(
        &self,
        anchor_pos: DVec2,
        anchor_size: f64,
        settings: &Settings,
        offset: DVec2,
        surface: &mut dyn Surface,
    ) {
        let min = self.rad_min(settings);
        let max = self.rad_max(settings);
        let span = max - min;
        if span <= 0.0 {
            return;
        }

        let color = self.color.with_alpha(RING_ALPHA);
        let center = anchor_pos.as_vec2();

        surface.save();
        surface.translate((-offset).as_vec2());
        match &self.style {
            RingStyle::Planet => {
                for i in 0..PLANET_RING_STROKES {
                    let r = min + span * PLANET_RING_STEP * i as f64;
                    let dash = PLANET_RING_DASH.with_phase(r as f32);
                    surface.stroke_circle(center, (anchor_size + r) as f32, color, Some(dash));
                }
            }
            RingStyle::Star { offsets } => {
                for t in offsets {
                    surface.stroke_circle(center, (anchor_size + min + t * span) as f32, color, None);
                }
            }
        }
        surface.restore();
    }
}
