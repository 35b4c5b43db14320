//! Moon trail calculator.
//!
//! Re-derives a moon's path over a window centred on "now" from the closed
//! form of both circular orbits, instead of storing position history. The
//! window spans `moonPathLength` seconds either side, sampled every 1/60 s.

use glam::DVec2;

use crate::api::settings::{Settings, MAX_MOON_PATH_LENGTH};
use crate::components::body::{Moon, Planet};

/// Trail samples per simulated second.
pub const TRAIL_RATE: f64 = 60.0;

/// Snapshot of everything the trail depends on, already scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParams {
    /// Point the planet orbits (its star's position at construction).
    pub planet_center: DVec2,
    pub planet_radius: f64,
    pub planet_angle: f64,
    /// Radians per second.
    pub planet_speed: f64,
    pub moon_radius: f64,
    pub moon_angle: f64,
    pub moon_speed: f64,
    /// Half-width of the window in seconds, capped at
    /// [`MAX_MOON_PATH_LENGTH`] when sampled.
    pub path_length: f64,
}

impl TrailParams {
    pub fn new(planet: &Planet, moon: &Moon, settings: &Settings) -> Self {
        Self {
            planet_center: planet.center,
            planet_radius: planet.radius(settings),
            planet_angle: planet.angle,
            planet_speed: planet.speed(settings),
            moon_radius: moon.radius(settings),
            moon_angle: moon.angle,
            moon_speed: moon.speed(settings),
            path_length: settings.moon_path_length,
        }
    }

    fn half_window(&self) -> f64 {
        if self.path_length.is_nan() {
            0.0
        } else {
            self.path_length.min(MAX_MOON_PATH_LENGTH)
        }
    }

    /// Number of samples: one per sub-step until the window end is reached.
    pub fn sample_count(&self) -> usize {
        let half = self.half_window();
        if !(half.is_finite() && half > 0.0) {
            return 0;
        }
        // The epsilon keeps an exact multiple of the sub-step from rounding up.
        (2.0 * half * TRAIL_RATE - 1e-9).ceil().max(0.0) as usize
    }

    /// Absolute position of the moon `t` seconds from now.
    pub fn position_at(&self, t: f64) -> DVec2 {
        let planet_angle = self.planet_angle + self.planet_speed * t;
        let moon_angle = self.moon_angle + self.moon_speed * t;
        self.planet_center
            + DVec2::from_angle(planet_angle) * self.planet_radius
            + DVec2::from_angle(moon_angle) * self.moon_radius
    }

    /// The trail polyline, oldest point first.
    ///
    /// Samples start one sub-step after `-path_length` and end at the first
    /// sub-step at or past `+path_length`.
    pub fn points(&self) -> Vec<DVec2> {
        let n = self.sample_count();
        let start = -self.half_window();
        (1..=n)
            .map(|i| self.position_at(start + i as f64 / TRAIL_RATE))
            .collect()
    }
}
