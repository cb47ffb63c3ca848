//=========================================================================
// System Events
//=========================================================================
//
// The closed set of events carried by the model's system bus.
//
// Producers:
//   Platform (via CoreLoop) → Input
//   Model::tick()           → Tick, then StateUpdated
//   States                  → Quit
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::render::Frame;

//=== SystemEvent =========================================================

/// Engine-level event.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemEvent {
    /// One simulation step from the clock.
    Tick,

    /// Request to stop the run loop.
    Quit,

    /// Keyboard or mouse input from the platform.
    Input(InputEvent),

    /// Published after each tick with the active state's draw list.
    StateUpdated(Frame),
}

impl SystemEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tick => "Tick",
            Self::Quit => "Quit",
            Self::Input(_) => "Input",
            Self::StateUpdated(_) => "StateUpdated",
        }
    }
}
