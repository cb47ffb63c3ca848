//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core thread via two channels.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  CoreLoop        │
//  │   ↓                      │    │   ↓              │
//  │  InputProcessor          │    │  Model           │
//  │   ├─ Converts Winit      │    │   ├─ system bus  │
//  │   └─ Tracks cursor       │    │   └─ states      │
//  │   ↓                      │    │   ↓              │
//  │  InputBuffer             │    │  FrameSink       │
//  │   ├─ discrete: Vec<>     │    └──────────────────┘
//  │   └─ continuous: Set<>   │         ↑       │
//  │   ↓                      │         │       │
//  │  RedrawRequested (flush) ├─────────┘       │
//  │                          │  PlatformEvent  │
//  │  about_to_wait           │◄────────────────┘
//  │   └─ title ← Frame text  │  CoreEvent
//  └──────────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent atomically
//    → Core processes at fixed fps (independent of refresh rate)
//    → Empty buffers NOT sent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: Batches all input atomically,
//   ensuring deterministic order even with high event rates
// - **Logical pixels**: Cursor positions are converted with the window
//   scale factor so they match the configured screen size
// - **Graceful channel disconnect**: If the core thread dies, the
//   platform logs a warning and keeps running so the window can close
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
// Presentation is minimal: the text of the latest frame becomes the
// window title. Rasterising the draw list is left to a real renderer.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::config::GameConfig;
use crate::core::platform_bridge::{CoreEvent, PlatformEvent};
use crate::core::render::Frame;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: if the event loop can't be created the game cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== Platform ============================================================

/// Window manager, input aggregator and frame presenter.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(...)` - initializes subsystems
/// 2. **Execution**: `platform.run()` - runs the event loop until exit
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: window closed (→ `WindowClosed` to core) or core sent
///    `Shutdown` (→ event loop exits)
///
/// # Thread Safety
///
/// Not Send/Sync - it must remain on the main thread. Communication with
/// the core thread occurs exclusively via the two channels.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Window title shown when the frame carries no text.
    base_title: String,

    /// Logical window size.
    size: (u32, u32),

    /// Title currently applied, to skip redundant updates.
    current_title: String,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    /// Channel to send events to core thread.
    event_sender: Sender<PlatformEvent>,

    /// Channel receiving frames and shutdown from the core thread.
    core_receiver: Receiver<CoreEvent>,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    /// Set once the core asked to stop or went away.
    shutdown: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform instance. The window is created lazily in
    /// `resumed()`.
    pub(crate) fn new(
        config: &GameConfig,
        event_sender: Sender<PlatformEvent>,
        core_receiver: Receiver<CoreEvent>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            base_title: config.title.clone(),
            size: config.window_size(),
            current_title: config.title.clone(),
            buffer: InputBuffer::new(),
            event_sender,
            core_receiver,
            input_processor: InputProcessor::new(),
            shutdown: false,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the core shuts down.
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the event loop cannot be created or fails.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Flushes buffered input events to the core thread.
    ///
    /// If the channel is disconnected (core thread exited), logs and drops
    /// the events so the window can still be closed normally.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            if self
                .event_sender
                .send(PlatformEvent::Inputs { discrete, continuous })
                .is_err()
            {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events ({} discrete, {} continuous)",
                    discrete_count + continuous_count,
                    discrete_count,
                    continuous_count
                );
            }
        }
    }

    /// Drains core messages. Only the newest frame is presented.
    ///
    /// Returns false once the core has shut down or disconnected.
    fn poll_core(&mut self) -> bool {
        let mut latest: Option<Frame> = None;

        loop {
            match self.core_receiver.try_recv() {
                Ok(CoreEvent::Frame(frame)) => latest = Some(frame),
                Ok(CoreEvent::Shutdown) => {
                    info!(target: "platform", "Core requested shutdown");
                    self.shutdown = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.shutdown {
                        warn!(target: "platform", "Core thread disconnected");
                    }
                    self.shutdown = true;
                    break;
                }
            }
        }

        if let Some(frame) = latest {
            self.present(&frame);
        }

        !self.shutdown
    }

    /// Shows the frame's text in the window title.
    fn present(&mut self, frame: &Frame) {
        let title = title_for(&self.base_title, frame);
        if title == self.current_title {
            return;
        }

        trace!(target: "platform", "Title: {}", title);
        if let Some(window) = &self.window {
            window.set_title(&title);
        }
        self.current_title = title;
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

/// Window title for a frame: the base title followed by the frame's
/// text lines.
fn title_for(base: &str, frame: &Frame) -> String {
    let lines: Vec<&str> = frame.text_lines().collect();
    if lines.is_empty() {
        base.to_string()
    } else {
        format!("{} - {}", base, lines.join(" | "))
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.current_title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1))
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                let event = self
                    .input_processor
                    .process_mouse_move(logical.x as f32, logical.y as f32);
                self.buffer.push_continuous(event);
            }

            WindowEvent::CursorLeft { .. } => {
                self.input_processor.cursor_left();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered input
                self.flush_input_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }

    /// Picks up frames and shutdown requests from the core.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.poll_core() {
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
