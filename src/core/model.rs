//=========================================================================
// Model
//=========================================================================
//
// Top-level game model: the system bus, the state machine listening on
// it, and the master tick.
//
// Tick sequence:
//   1. post Tick            → active state advances counters
//   2. post StateUpdated    → renderer receives the ordered draw list
//
// Input from the platform is posted as SystemEvent::Input between ticks.
// The model stops running once a Quit has been delivered.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::config::GameConfig;
use crate::core::event::SystemEvent;
use crate::core::event_bus::{EventBus, Subscription};
use crate::core::input::InputEvent;
use crate::core::render::Frame;
use crate::core::state::{State, StateMachine};

//=== Model ===============================================================

/// Owns the system bus and the active state for the lifetime of a run.
pub struct Model {
    system_bus: EventBus<SystemEvent>,
    machine: Rc<RefCell<StateMachine>>,
    screen_size: (u32, u32),
    ticks: u64,
    _machine_subscription: Subscription<SystemEvent>,
}

impl Model {
    //--- Construction -----------------------------------------------------

    /// Creates the model with `initial` as the active state.
    ///
    /// The state machine is registered first on the system bus, so it
    /// sees every event before any other listener.
    pub fn new(config: &GameConfig, initial: Box<dyn State>) -> Self {
        let system_bus = EventBus::new();
        let machine = Rc::new(RefCell::new(StateMachine::new(system_bus.clone(), initial)));
        let subscription = system_bus.register(&machine);

        Self {
            system_bus,
            machine,
            screen_size: (config.screen_width, config.screen_height),
            ticks: 0,
            _machine_subscription: subscription,
        }
    }

    //--- Event Entry Points -----------------------------------------------

    /// Handle to the system bus, e.g. for registering a renderer.
    pub fn system_bus(&self) -> &EventBus<SystemEvent> {
        &self.system_bus
    }

    /// Posts one platform input event.
    pub fn dispatch(&self, input: InputEvent) {
        self.system_bus.post(SystemEvent::Input(input));
    }

    /// Advances one frame and publishes the resulting draw list.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        self.ticks += 1;
        self.system_bus.post(SystemEvent::Tick);

        if self.is_running() {
            let frame = self.frame();
            self.system_bus.post(SystemEvent::StateUpdated(frame));
        } else {
            debug!(target: "core", "Model stopped during tick {}", self.ticks);
        }
    }

    //--- Query API --------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.machine.borrow().is_running()
    }

    /// Name of the active state.
    pub fn active_state(&self) -> &'static str {
        self.machine.borrow().active().name()
    }

    /// Current draw list of the active state.
    pub fn frame(&self) -> Frame {
        self.machine.borrow().frame()
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen_size
    }

    /// Ticks issued so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
