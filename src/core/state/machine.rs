//=========================================================================
// State Machine
//=========================================================================
//
// Owns the active state, forwards system events to it and applies the
// transitions it requests.
//
// The machine is a listener on the system bus. Quit is handled here and
// never reaches a state; StateUpdated is for the renderer and is ignored.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{State, StateContext};
use crate::core::event::SystemEvent;
use crate::core::event_bus::{EventBus, Listener};
use crate::core::render::Frame;

//=== StateMachine ========================================================

/// Single authority for which state is active.
pub struct StateMachine {
    active: Box<dyn State>,
    system_bus: EventBus<SystemEvent>,
    running: bool,
    transitions: u64,
}

impl StateMachine {
    //--- Construction -----------------------------------------------------

    /// Creates a machine running `initial`.
    pub fn new(system_bus: EventBus<SystemEvent>, initial: Box<dyn State>) -> Self {
        info!(target: "state", "Initial state: {}", initial.name());
        Self {
            active: initial,
            system_bus,
            running: true,
            transitions: 0,
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Replaces the active state. The previous state is dropped.
    pub fn change_state(&mut self, next: Box<dyn State>) {
        info!(
            target: "state",
            "State change: {} -> {}",
            self.active.name(),
            next.name()
        );
        self.active = next;
        self.transitions += 1;
    }

    //--- Query API --------------------------------------------------------

    pub fn active(&self) -> &dyn State {
        self.active.as_ref()
    }

    /// False once a Quit event has been observed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of transitions applied so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Records the active state's game objects into a frame.
    pub fn frame(&self) -> Frame {
        Frame::capture(self.active.game_objects())
    }

    //--- Internal Helpers -------------------------------------------------

    fn forward(&mut self, event: &SystemEvent) {
        let mut ctx = StateContext::new(&self.system_bus);
        self.active.notify(event, &mut ctx);

        if let Some(next) = ctx.take_transition() {
            self.change_state(next);
        }
    }
}

impl Listener<SystemEvent> for StateMachine {
    fn notify(&mut self, event: &SystemEvent) {
        match event {
            SystemEvent::Quit => {
                if self.running {
                    info!(target: "state", "Quit observed in {}", self.active.name());
                }
                self.running = false;
            }
            SystemEvent::StateUpdated(_) => {}
            SystemEvent::Tick | SystemEvent::Input(_) => {
                if self.running {
                    self.forward(event);
                } else {
                    debug!(target: "state", "Dropping {} after quit", event.kind());
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
