pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::settings::{scaling_from_slider, slider_from_scaling, Settings};
pub use api::simulation::{EngineConfig, Simulation};
pub use api::types::{BodyKind, BodyRef, MoonId, PlanetId, StarId};
pub use assets::catalog::Catalog;
pub use components::body::{Moon, Orbit, Planet, Star};
pub use components::ring::{Ring, RingAnchor, RingStyle};
pub use core::scene::Solarsystem;
pub use core::time::{FixedTimestep, FrameHost, Timer, TimerState};
pub use error::SetupError;
pub use input::pan::PointerPan;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::{Camera, Color, Dash, DrawCommand, RecordingSurface, Surface};
pub use systems::trail::TrailParams;

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorSurface, VectorVertex};
