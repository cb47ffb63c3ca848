//=========================================================================
// Flood Engine
//
// Main entry point and coordinator for the game.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_fps()              └─ spawns core thread
//         ├─ with_cell_count()          runs platform
//         ├─ with_score_path()          blocks until exit
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::PathBuf;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::config::{ConfigError, GameConfig};
use crate::core::platform_bridge::{CoreEvent, PlatformEvent};
use crate::core::render::Color;
use crate::core::CoreLoop;
use crate::platform::{Platform, PlatformError};

//=== Defaults ============================================================

const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// Frames waiting for the platform. The platform only shows the newest,
/// so a short queue is enough.
const FRAME_CHANNEL_CAPACITY: usize = 4;

//=== EngineError =========================================================

/// Fatal errors from building or running the engine.
#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Platform(PlatformError),

    /// The core thread panicked.
    CorePanicked,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {}", e),
            Self::Platform(e) => write!(f, "platform failure: {}", e),
            Self::CorePanicked => write!(f, "core thread panicked"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Platform(e) => Some(e),
            Self::CorePanicked => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PlatformError> for EngineError {
    fn from(e: PlatformError) -> Self {
        Self::Platform(e)
    }
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Grid**: 144 cells (12 x 12), six colours
/// - **Screen**: 600 x 600
/// - **FPS**: 30
/// - **Score file**: `data/high_score.txt`
/// - **Channel capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use flood_engine::EngineBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// EngineBuilder::new()
///     .with_cell_count(196)         // 14 x 14
///     .with_fps(60)
///     .build()?
///     .run()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    config: GameConfig,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Sets the play area in logical pixels.
    pub fn with_screen_size(mut self, width: u32, height: u32) -> Self {
        self.config.screen_width = width;
        self.config.screen_height = height;
        self
    }

    /// Sets the number of puzzle cells. Must be a perfect square.
    pub fn with_cell_count(mut self, cell_count: usize) -> Self {
        self.config.cell_count = cell_count;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.config.palette = palette;
        self
    }

    /// Sets the tick rate of the logic thread.
    ///
    /// Elapsed time is measured in ticks, so this is also the clock rate
    /// of the best-time record.
    ///
    /// Default: 30
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.config.fps = fps;
        self
    }

    pub fn with_score_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.score_path = path.into();
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Validates the configuration and builds the engine.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError`] found.
    pub fn build(self) -> Result<Engine, ConfigError> {
        self.config.validate()?;
        if self.channel_capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }

        info!(
            "Building engine ({} cells, {} fps, channel: {})",
            self.config.cell_count, self.config.fps, self.channel_capacity
        );

        Ok(Engine {
            config: self.config,
            channel_capacity: self.channel_capacity,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Game runtime. Create via [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreLoop (Logic Thread @ fps)
///   │     └─► Model → StateMachine → PlayState / GameOverState
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Input Polling, Title
///
/// Communication: PlatformEvent (→ core), CoreEvent (→ platform)
/// ```
#[derive(Debug)]
pub struct Engine {
    config: GameConfig,
    channel_capacity: usize,
}

impl Engine {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core and core → platform channels
    /// 2. Spawns the logic thread running at the configured fps
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: core receives `WindowClosed` and terminates;
    ///    on quit: core sends `Shutdown` and the event loop exits
    ///
    /// # Errors
    ///
    /// [`EngineError::Platform`] if the event loop fails,
    /// [`EngineError::CorePanicked`] if the logic thread panicked.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Starting engine runtime ({} fps)", self.config.fps);

        //--- 1. Create communication channels -----------------------------
        let (platform_tx, platform_rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);
        let (core_tx, core_rx): (Sender<CoreEvent>, Receiver<CoreEvent>) =
            bounded(FRAME_CHANNEL_CAPACITY);

        info!("Channels created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let platform = Platform::new(&self.config, platform_tx, core_rx);
        let core_handle = CoreLoop::new(self.config, platform_rx, core_tx).spawn_core_thread();
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform_result = platform.run();
        if let Err(e) = &platform_result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate ---------------
        // The platform's sender is gone by now, so the core sees a
        // disconnect even if the loop failed before WindowClosed.
        let core_result = core_handle.join();
        match &core_result {
            Ok(()) => info!("Core thread terminated cleanly"),
            Err(e) => error!("Core thread panicked: {:?}", e),
        }

        platform_result?;
        core_result.map_err(|_| EngineError::CorePanicked)?;

        info!("Engine shutdown complete");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
