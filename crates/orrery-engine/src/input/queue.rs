/// Host input the engine reacts to. Pointer coordinates are in screen
/// (viewport) units, not simulation space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began at (x, y).
    PointerDown { x: f64, y: f64 },
    /// A touch/cursor moved to (x, y).
    PointerMove { x: f64, y: f64 },
    /// A touch/click ended at (x, y).
    PointerUp { x: f64, y: f64 },
    /// The viewport changed size.
    Resize { width: f64, height: f64 },
}

/// A queue of input events.
/// The host pushes events as they arrive; they are drained once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
