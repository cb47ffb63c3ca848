//=========================================================================
// Core Loop
//=========================================================================
//
// Runs the game model on the logic (non-platform) thread.
//
// Responsibilities:
// - Receive batched platform input over the platform channel
// - Post it on the system bus, then issue the master tick
// - Forward each published frame back to the platform
// - Keep a fixed tick rate (fps)
//
// Notes:
// The model and everything on its buses is single-threaded (Rc) and is
// built inside the spawned thread. Only plain messages cross the thread
// boundary, in both directions.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::config::GameConfig;
use crate::game::{self, FileScoreStore, ScoreStore};
use model::Model;
use platform_bridge::{CoreEvent, EventCollector, FrameSink, PlatformEvent, TickControl};

//=== Module Declarations =================================================

pub mod event;
pub mod event_bus;
pub mod input;
pub mod model;
pub(crate) mod platform_bridge;
pub mod render;
pub mod state;

//=== CoreLoop ============================================================

/// Owns the channels between the logic thread and the platform.
pub(crate) struct CoreLoop {
    config: GameConfig,
    receiver: Receiver<PlatformEvent>,
    sender: Sender<CoreEvent>,
}

impl CoreLoop {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        config: GameConfig,
        receiver: Receiver<PlatformEvent>,
        sender: Sender<CoreEvent>,
    ) -> Self {
        Self {
            config,
            receiver,
            sender,
        }
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Collects platform input (bounded, non-blocking)
    //  2. Posts it on the system bus in arrival order
    //  3. Ticks the model, which publishes a frame to the platform
    //  4. Sleeps to maintain fixed pacing
    //  5. Exits on window close or once the model has seen Quit
    //
    pub(crate) fn spawn_core_thread(self) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let scores: Rc<dyn ScoreStore> =
                Rc::new(FileScoreStore::new(self.config.score_path.clone()));
            match game::start(self.config.clone(), scores) {
                Ok(model) => self.run(model),
                Err(e) => {
                    error!(target: "core", "Cannot start the game: {}", e);
                    if self.sender.send(CoreEvent::Shutdown).is_err() {
                        warn!(target: "core", "Platform gone before shutdown");
                    }
                }
            }
        })
    }

    /// Drives `model` until the window closes or the game quits.
    pub(crate) fn run(self, mut model: Model) {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.config.fps.max(1)));

        let sink = Rc::new(RefCell::new(FrameSink::new(self.sender.clone())));
        let _sink_subscription = model.system_bus().register(&sink);

        let mut collector = EventCollector::new(self.receiver);

        info!(
            target: "core",
            "Core thread started at {} ticks per second",
            self.config.fps
        );

        loop {
            let frame_start = Instant::now();

            //--- Step 1: Gather platform events ---------------------------
            if collector.collect_frame() == TickControl::Exit {
                info!(target: "core", "Platform closed, core thread exiting");
                break;
            }

            //--- Step 2: Dispatch input -----------------------------------
            for batch in collector.take_batches() {
                for input in batch {
                    model.dispatch(input);
                }
            }

            //--- Step 3: Tick ---------------------------------------------
            model.tick();

            if !model.is_running() {
                info!(target: "core", "Game quit after {} ticks", model.ticks());
                if self.sender.send(CoreEvent::Shutdown).is_err() {
                    debug!(target: "core", "Platform already gone at shutdown");
                }
                break;
            }

            //--- Step 4: Maintain deterministic pacing --------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    target: "core",
                    "Tick {} overran its budget: {:?}",
                    model.ticks(),
                    elapsed
                );
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
