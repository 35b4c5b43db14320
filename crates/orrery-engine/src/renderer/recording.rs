use glam::Vec2;

use super::color::Color;
use super::traits::{Dash, Surface};

/// One call issued against a [`Surface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { origin: Vec2, size: Vec2 },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color, dash: Option<Dash> },
    StrokeLine { from: Vec2, to: Vec2, color: Color },
    Save,
    Restore,
    Translate { delta: Vec2 },
}

impl DrawCommand {
    /// Whether the command puts pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillCircle { .. }
                | DrawCommand::StrokeCircle { .. }
                | DrawCommand::StrokeLine { .. }
        )
    }
}

/// Surface that records every call verbatim, in order.
///
/// `clear` starts a new frame: earlier commands are dropped, so the list
/// always holds the most recent frame. Useful for hosts that replay commands
/// onto a Canvas2D context, and for asserting on draw order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of commands that paint something.
    pub fn paint_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_paint()).count()
    }

    pub fn fills(&self) -> impl Iterator<Item = (Vec2, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::FillCircle { center, radius, color } => Some((center, radius, color)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::StrokeLine { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, origin: Vec2, size: Vec2) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { origin, size });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, dash: Option<Dash>) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius, color, dash });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::StrokeLine { from, to, color });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, delta: Vec2) {
        self.commands.push(DrawCommand::Translate { delta });
    }
}
