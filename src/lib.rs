//=========================================================================
// Flood Engine - Library Root
//
// This crate defines the public API surface of the flood puzzle and the
// small engine it runs on.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder` / `Engine`)
// - Expose the engine-level systems (`core`): event bus, state machine,
//   model, input vocabulary and the render contract
// - Expose the puzzle itself (`game`): grid, play and game-over states,
//   score store
// - Keep the platform layer (winit window, input polling) private
//
// Typical usage:
// ```no_run
// use flood_engine::EngineBuilder;
//
// fn main() -> Result<(), Box<dyn std::error::Error>> {
//     EngineBuilder::new().with_fps(30).build()?.run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the engine systems (event bus, state machine, model).
// `game` contains the flood puzzle built on top of them.
// `config` holds the immutable configuration both layers read from.
//
pub mod config;
pub mod core;
pub mod game;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains OS-specific logic (window, winit integration,
// event loop) and is not part of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use config::{ConfigError, GameConfig};
pub use engine::{Engine, EngineBuilder, EngineError};
pub use platform::PlatformError;
