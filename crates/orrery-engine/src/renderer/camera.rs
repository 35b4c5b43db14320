use glam::DVec2;

/// Viewport in simulation-space units.
///
/// The camera itself is just the pan offset stored in
/// [`Settings`](crate::api::settings::Settings): screen = world - offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
}

impl Camera {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Resize the viewport (e.g. on window resize). Non-positive sizes are
    /// ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Pan offset that puts `target` in the middle of the viewport.
    pub fn focus_offset(&self, target: DVec2) -> DVec2 {
        target - self.size() / 2.0
    }

    /// Convert a viewport point to simulation space under `offset`.
    pub fn screen_to_world(&self, screen: DVec2, offset: DVec2) -> DVec2 {
        screen + offset
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
