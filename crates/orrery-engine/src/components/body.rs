//! Orbital bodies: stationary stars, planets circling a star, moons circling
//! a planet.
//!
//! Every scaled quantity is recomputed from the live [`Settings`] on each
//! call; bodies store only base values plus `angle` and `pos`. Angles are
//! advanced monotonically and never wrapped, which the moon trail relies on.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::api::settings::Settings;
use crate::api::types::{BodyKind, PlanetId, StarId};
use crate::renderer::color::Color;
use crate::renderer::traits::Surface;
use crate::systems::trail::TrailParams;

/// Effective disk radius of a body of `kind` with unscaled radius `base`.
pub fn effective_size(kind: BodyKind, base: f64, settings: &Settings) -> f64 {
    let factor = match kind {
        BodyKind::Star => settings.star_size_scaling,
        BodyKind::Planet => settings.planet_size_scaling,
        BodyKind::Moon => settings.moon_size_scaling,
    };
    base * factor * settings.total_scaling
}

/// Effective orbital radius. Stars do not orbit; their distance factor is 1.
pub fn effective_radius(kind: BodyKind, base: f64, settings: &Settings) -> f64 {
    let factor = match kind {
        BodyKind::Star => 1.0,
        BodyKind::Planet => settings.planet_distance_scaling,
        BodyKind::Moon => settings.moon_distance_scaling,
    };
    base * factor * settings.total_scaling
}

/// Effective angular speed in radians per second.
pub fn effective_speed(rotation_time: f64, retrograde: bool, settings: &Settings) -> f64 {
    let direction = if retrograde { -1.0 } else { 1.0 };
    TAU / rotation_time * settings.time_scaling * direction
}

/// Fill a disk at `pos`, shifted by the negated camera offset.
fn draw_disk(surface: &mut dyn Surface, pos: DVec2, size: f64, color: Color, offset: DVec2) {
    surface.save();
    surface.translate((-offset).as_vec2());
    surface.fill_circle(pos.as_vec2(), size as f32, color);
    surface.restore();
}

/// Unscaled circular-orbit parameters shared by planets and moons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    /// Orbital radius.
    pub radius_rot: f64,
    /// Disk radius.
    pub radius_size: f64,
    /// Seconds per revolution at `timeScaling` 1. Always positive.
    pub rotation_time: f64,
    pub retrograde: bool,
}

impl Orbit {
    pub fn speed(&self, settings: &Settings) -> f64 {
        effective_speed(self.rotation_time, self.retrograde, settings)
    }
}

/// A stationary star.
#[derive(Debug, Clone)]
pub struct Star {
    pub name: String,
    pub pos: DVec2,
    pub color: Color,
    radius_size: f64,
}

impl Star {
    pub fn new(name: impl Into<String>, pos: DVec2, radius_size: f64, color: Color) -> Self {
        Self {
            name: name.into(),
            pos,
            color,
            radius_size,
        }
    }

    pub fn size(&self, settings: &Settings) -> f64 {
        effective_size(BodyKind::Star, self.radius_size, settings)
    }

    pub fn draw(&self, settings: &Settings, offset: DVec2, surface: &mut dyn Surface) {
        draw_disk(surface, self.pos, self.size(settings), self.color, offset);
    }
}

/// A planet on a circular orbit around a star.
#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub star: StarId,
    pub color: Color,
    pub orbit: Orbit,
    /// Star position captured at construction; the orbit path is drawn here.
    pub center: DVec2,
    pub angle: f64,
    pub pos: DVec2,
}

impl Planet {
    pub fn new(
        name: impl Into<String>,
        star: (StarId, &Star),
        orbit: Orbit,
        color: Color,
        settings: &Settings,
    ) -> Self {
        let (star_id, star) = star;
        let center = star.pos;
        let radius = effective_radius(BodyKind::Planet, orbit.radius_rot, settings);
        Self {
            name: name.into(),
            star: star_id,
            color,
            orbit,
            center,
            angle: 0.0,
            pos: center + DVec2::new(radius, 0.0),
        }
    }

    pub fn radius(&self, settings: &Settings) -> f64 {
        effective_radius(BodyKind::Planet, self.orbit.radius_rot, settings)
    }

    pub fn size(&self, settings: &Settings) -> f64 {
        effective_size(BodyKind::Planet, self.orbit.radius_size, settings)
    }

    pub fn speed(&self, settings: &Settings) -> f64 {
        self.orbit.speed(settings)
    }

    /// Advance the angle and place the planet relative to its star.
    pub fn update(&mut self, dt: f64, star_pos: DVec2, settings: &Settings) {
        self.angle += self.speed(settings) * dt;
        self.pos = star_pos + DVec2::from_angle(self.angle) * self.radius(settings);
    }

    /// The orbit clears the star's rendered disk.
    pub fn is_active(&self, star_size: f64, settings: &Settings) -> bool {
        star_size < self.radius(settings) - self.size(settings)
    }

    /// Orbit circle (if enabled) then the disk. Inactive planets draw nothing.
    pub fn draw(&self, star_size: f64, settings: &Settings, offset: DVec2, surface: &mut dyn Surface) {
        if !self.is_active(star_size, settings) {
            return;
        }
        if settings.planet_paths {
            surface.save();
            surface.translate((-offset).as_vec2());
            surface.stroke_circle(
                self.center.as_vec2(),
                self.radius(settings) as f32,
                self.color,
                None,
            );
            surface.restore();
        }
        draw_disk(surface, self.pos, self.size(settings), self.color, offset);
    }
}

/// A moon on a circular orbit around a planet.
#[derive(Debug, Clone)]
pub struct Moon {
    pub name: String,
    pub planet: PlanetId,
    pub color: Color,
    pub orbit: Orbit,
    pub angle: f64,
    pub pos: DVec2,
}

impl Moon {
    pub fn new(
        name: impl Into<String>,
        planet: (PlanetId, &Planet),
        orbit: Orbit,
        color: Color,
        settings: &Settings,
    ) -> Self {
        let (planet_id, planet) = planet;
        let radius = effective_radius(BodyKind::Moon, orbit.radius_rot, settings);
        Self {
            name: name.into(),
            planet: planet_id,
            color,
            orbit,
            angle: 0.0,
            pos: planet.pos + DVec2::new(radius, 0.0),
        }
    }

    pub fn radius(&self, settings: &Settings) -> f64 {
        effective_radius(BodyKind::Moon, self.orbit.radius_rot, settings)
    }

    pub fn size(&self, settings: &Settings) -> f64 {
        effective_size(BodyKind::Moon, self.orbit.radius_size, settings)
    }

    pub fn speed(&self, settings: &Settings) -> f64 {
        self.orbit.speed(settings)
    }

    /// Advance the angle and place the moon relative to its planet's
    /// already-updated position.
    pub fn update(&mut self, dt: f64, planet_pos: DVec2, settings: &Settings) {
        self.angle += self.speed(settings) * dt;
        self.pos = planet_pos + DVec2::from_angle(self.angle) * self.radius(settings);
    }

    /// The orbit clears the planet's disk and the planet itself is active.
    pub fn is_active(&self, planet: &Planet, star_size: f64, settings: &Settings) -> bool {
        planet.size(settings) < self.radius(settings) - self.size(settings)
            && planet.is_active(star_size, settings)
    }

    /// Trail (if enabled) then the disk. Inactive moons draw nothing.
    pub fn draw(
        &self,
        planet: &Planet,
        star_size: f64,
        settings: &Settings,
        offset: DVec2,
        surface: &mut dyn Surface,
    ) {
        if !self.is_active(planet, star_size, settings) {
            return;
        }
        if settings.moon_paths {
            self.draw_trail(planet, settings, offset, surface);
        }
        draw_disk(surface, self.pos, self.size(settings), self.color, offset);
    }

    fn draw_trail(&self, planet: &Planet, settings: &Settings, offset: DVec2, surface: &mut dyn Surface) {
        let path = TrailParams::new(planet, self, settings).points();
        if path.len() < 2 {
            return;
        }
        surface.save();
        surface.translate((-offset).as_vec2());
        for pair in path.windows(2) {
            surface.stroke_line(pair[0].as_vec2(), pair[1].as_vec2(), self.color);
        }
        surface.restore();
    }
}
