use glam::DVec2;

use crate::api::settings::Settings;
use crate::core::scene::Solarsystem;

use super::queue::InputEvent;

/// Total pointer travel, in screen units, below which a press counts as a
/// click rather than a drag.
pub const CLICK_SLOP: f64 = 4.0;

/// Translates pointer input into camera state.
///
/// Pressing clears `focus`. Dragging pans by writing `offsetX`/`offsetY`.
/// Releasing after less than [`CLICK_SLOP`] of travel picks the body under
/// the pointer and focuses it.
#[derive(Debug, Default)]
pub struct PointerPan {
    pressed: bool,
    last: DVec2,
    travel: f64,
}

impl PointerPan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.pressed && self.travel >= CLICK_SLOP
    }

    /// Apply one event. Returns the newly focused body, if a click picked one.
    pub fn apply(
        &mut self,
        event: InputEvent,
        settings: &mut Settings,
        system: &mut Solarsystem,
    ) -> Option<String> {
        match event {
            InputEvent::PointerDown { x, y } => {
                settings.focus.clear();
                self.pressed = true;
                self.last = DVec2::new(x, y);
                self.travel = 0.0;
                None
            }
            InputEvent::PointerMove { x, y } => {
                if !self.pressed {
                    return None;
                }
                let pos = DVec2::new(x, y);
                let delta = pos - self.last;
                self.last = pos;
                self.travel += delta.length();
                settings.offset_x -= delta.x;
                settings.offset_y -= delta.y;
                None
            }
            InputEvent::PointerUp { x, y } => {
                if !self.pressed {
                    return None;
                }
                self.pressed = false;
                if self.travel >= CLICK_SLOP {
                    return None;
                }
                let offset = DVec2::new(settings.offset_x, settings.offset_y);
                let point = system.camera().screen_to_world(DVec2::new(x, y), offset);
                let name = system.find_object(point, settings)?.to_string();
                log::debug!("focus -> {name}");
                settings.focus = name.clone();
                Some(name)
            }
            InputEvent::Resize { width, height } => {
                system.set_viewport(width, height);
                None
            }
        }
    }
}
