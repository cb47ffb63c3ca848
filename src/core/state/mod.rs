//=========================================================================
// State System
//=========================================================================
//
// Screen-level game states and the machine that swaps them.
//
// Architecture:
//   StateMachine
//     └─ active: Box<dyn State>     (exactly one, owned)
//
// Flow:
//   system bus → StateMachine::notify() → State::notify(event, ctx)
//                                              ↓
//                          ctx.change_state(next) / ctx.quit()
//                                              ↓
//                 StateMachine applies the replacement after notify()
//
// There is no stack: a transition drops the previous state. Anything
// the next state needs is handed to its constructor.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::event::SystemEvent;
use crate::core::event_bus::EventBus;
use crate::core::render::GameObject;

//=== Module Declarations =================================================

mod machine;

//=== Public API ==========================================================

pub use machine::StateMachine;

//=== State Trait =========================================================

/// A screen of the game (play, game over, ...).
///
/// # Minimal Implementation
///
/// ```rust
/// # use flood_engine::prelude::*;
/// struct Idle;
///
/// impl State for Idle {
///     fn name(&self) -> &'static str {
///         "Idle"
///     }
///
///     fn notify(&mut self, event: &SystemEvent, ctx: &mut StateContext<'_>) {
///         if let SystemEvent::Input(input) = event {
///             if input.is_key_down(KeyCode::Escape) {
///                 ctx.quit();
///             }
///         }
///     }
///
///     fn game_objects(&self) -> Vec<&dyn GameObject> {
///         Vec::new()
///     }
/// }
/// ```
pub trait State {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Handles a system event forwarded by the machine.
    fn notify(&mut self, event: &SystemEvent, ctx: &mut StateContext<'_>);

    /// Objects to draw, in draw order.
    fn game_objects(&self) -> Vec<&dyn GameObject>;
}

//=== StateContext ========================================================

/// What a state may do to the world while handling an event.
///
/// Gives access to the system bus and collects a transition request.
/// The machine applies the request once `notify` has returned.
pub struct StateContext<'a> {
    system_bus: &'a EventBus<SystemEvent>,
    next: Option<Box<dyn State>>,
}

impl<'a> StateContext<'a> {
    pub(crate) fn new(system_bus: &'a EventBus<SystemEvent>) -> Self {
        Self {
            system_bus,
            next: None,
        }
    }

    /// Posts an event on the system bus (delivered after the current pass).
    pub fn post(&self, event: SystemEvent) {
        self.system_bus.post(event);
    }

    /// Posts [`SystemEvent::Quit`].
    pub fn quit(&self) {
        self.post(SystemEvent::Quit);
    }

    /// Requests that `next` replace the current state.
    ///
    /// A later request in the same `notify` call overrides an earlier one.
    pub fn change_state(&mut self, next: Box<dyn State>) {
        if let Some(previous) = &self.next {
            debug!(
                target: "state",
                "Transition to {} overrides pending {}",
                next.name(),
                previous.name()
            );
        }
        self.next = Some(next);
    }

    /// True if a transition has been requested.
    pub fn has_transition(&self) -> bool {
        self.next.is_some()
    }

    pub(crate) fn take_transition(&mut self) -> Option<Box<dyn State>> {
        self.next.take()
    }
}
