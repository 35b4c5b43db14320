use serde::{Deserialize, Serialize};

use crate::renderer::color::Color;

/// Body and ring catalog describing a star system.
/// Loaded from a JSON document, possibly after the engine has started.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub stars: Vec<StarDesc>,
    #[serde(default)]
    pub planets: Vec<PlanetDesc>,
    #[serde(default)]
    pub moons: Vec<MoonDesc>,
    #[serde(default)]
    pub rings: Vec<RingDesc>,
}

/// A point in catalog (simulation-space) units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointDesc {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarDesc {
    pub name: String,
    /// Fixed position (default: origin).
    #[serde(default)]
    pub center: PointDesc,
    /// Unscaled disk radius.
    pub radius_size: f64,
    #[serde(default = "default_star_color")]
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetDesc {
    pub name: String,
    /// Name of the star this planet orbits.
    pub star: String,
    /// Unscaled orbital radius.
    pub radius_rot: f64,
    /// Unscaled disk radius.
    pub radius_size: f64,
    /// Seconds per revolution at `timeScaling` 1.
    pub rotation_time: f64,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub retrograde: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoonDesc {
    pub name: String,
    /// Name of the planet this moon orbits.
    pub planet: String,
    pub radius_rot: f64,
    pub radius_size: f64,
    pub rotation_time: f64,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub retrograde: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingDesc {
    /// Planet or star the ring surrounds; planets are matched first.
    #[serde(alias = "center")]
    pub anchor: String,
    pub min_radius: f64,
    pub max_radius: f64,
    #[serde(default)]
    pub color: Color,
}

fn default_star_color() -> Color {
    Color::YELLOW
}

const BUILTIN: &str = include_str!("../../assets/objects.json");

impl Catalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The bundled Sun-and-planets catalog.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN).unwrap_or_else(|e| {
            log::error!("built-in catalog is invalid: {e}");
            Self::default()
        })
    }

    /// Total number of named bodies.
    pub fn body_count(&self) -> usize {
        self.stars.len() + self.planets.len() + self.moons.len()
    }
}
