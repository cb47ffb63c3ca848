//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Messages crossing the thread boundary between platform and core.
//
// Defines the contract for communication between platform and core
// threads. Nothing else is shared.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::render::Frame;

//=== PlatformEvent =======================================================

/// Events sent from platform to core.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a frame.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}

//=== CoreEvent ===========================================================

/// Events sent from core back to the platform.
#[derive(Debug, Clone)]
pub(crate) enum CoreEvent {
    /// Latest draw list of the active state.
    Frame(Frame),

    /// The model observed Quit; the window should close.
    Shutdown,
}
