use thiserror::Error;

/// Reasons a catalog is rejected by [`Solarsystem::setup`](crate::core::scene::Solarsystem::setup).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("planet `{planet}` orbits unknown star `{star}`")]
    UnknownStar { planet: String, star: String },

    #[error("moon `{moon}` orbits unknown planet `{planet}`")]
    UnknownPlanet { moon: String, planet: String },

    #[error("ring anchor `{0}` is neither a planet nor a star")]
    UnknownAnchor(String),

    #[error("body name `{0}` is used more than once")]
    DuplicateName(String),

    #[error("`{name}` has non-positive rotation time {value}")]
    InvalidRotationTime { name: String, value: f64 },

    #[error("ring on `{anchor}` has invalid radii {min}..{max}")]
    InvalidRingSpan { anchor: String, min: f64, max: f64 },

    #[error("catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}
