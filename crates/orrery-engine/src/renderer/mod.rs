pub mod camera;
pub mod color;
pub mod recording;
pub mod traits;

// Re-export key types for convenient access
pub use camera::Camera;
pub use color::Color;
pub use recording::{DrawCommand, RecordingSurface};
pub use traits::{Dash, Surface};
