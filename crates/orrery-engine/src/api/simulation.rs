use crate::api::settings::Settings;
use crate::renderer::traits::Surface;

/// Engine-level constants, fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed simulation step in seconds (default: 1/60).
    pub fixed_dt: f64,
    /// Accumulated time above this is wrapped modulo itself (default: 1 s).
    pub max_backlog: f64,
    /// Viewport width in simulation-space units.
    pub viewport_width: f64,
    /// Viewport height in simulation-space units.
    pub viewport_height: f64,
    /// Seed for the star-ring density offsets.
    pub ring_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_backlog: 1.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            ring_seed: 0x5eed_0001,
        }
    }
}

/// The contract the fixed-step scheduler drives.
pub trait Simulation {
    /// Advance every moving body by `dt` seconds.
    fn update(&mut self, dt: f64, settings: &Settings);

    /// Resolve the camera and draw one frame. May rewrite the camera offset
    /// in `settings` before anything is drawn.
    fn output(&self, settings: &mut Settings, surface: &mut dyn Surface);
}
