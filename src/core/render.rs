//=========================================================================
// Render Contract
//=========================================================================
//
// What the core promises the renderer, and nothing more.
//
// Architecture:
//   State::game_objects() → GameObject::render(&mut dyn Surface)
//                                      ↓
//                          Frame (ordered DrawCommands)
//                                      ↓
//                SystemEvent::StateUpdated(Frame) → renderer
//
// Draw order is list order. The core never rasterises anything; a Frame
// is plain data so it can cross to the platform thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;

//=== Color ===============================================================

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle in screen space (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

//=== DrawCommand =========================================================

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle.
    FillRect { rect: Rect, color: Color },

    /// A line of text horizontally centred at height `y`.
    CenteredText { text: String, y: f32, color: Color },
}

//=== Surface =============================================================

/// Drawing target handed to [`GameObject::render`].
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn draw_centered_text(&mut self, text: &str, y: f32, color: Color);
}

//=== GameObject ==========================================================

/// Anything a state wants drawn.
pub trait GameObject {
    fn render(&self, surface: &mut dyn Surface);
}

/// Objects shared with bus listeners live in a `RefCell`; they render
/// through a short shared borrow.
impl<T: GameObject> GameObject for RefCell<T> {
    fn render(&self, surface: &mut dyn Surface) {
        self.borrow().render(surface);
    }
}

//=== Frame ===============================================================

/// Recorded surface: the ordered draw list for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `objects` in order into a fresh frame.
    pub fn capture<'a, I>(objects: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn GameObject>,
    {
        let mut frame = Self::new();
        for object in objects {
            object.render(&mut frame);
        }
        frame
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text lines in draw order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::CenteredText { text, .. } => Some(text.as_str()),
            DrawCommand::FillRect { .. } => None,
        })
    }
}

impl Surface for Frame {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_centered_text(&mut self, text: &str, y: f32, color: Color) {
        self.commands.push(DrawCommand::CenteredText {
            text: text.to_string(),
            y,
            color,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
