//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use flood_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade and configuration
pub use crate::config::{ConfigError, GameConfig};
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Event bus
pub use crate::core::event_bus::{EventBus, Listener, Subscription};

// System events and input
pub use crate::core::event::SystemEvent;
pub use crate::core::input::{ButtonMask, InputEvent, KeyCode, MouseButton, Position};

// State machine and model
pub use crate::core::model::Model;
pub use crate::core::state::{State, StateContext, StateMachine};

// Rendering contract
pub use crate::core::render::{Color, DrawCommand, Frame, GameObject, Rect, Surface};

// Puzzle
pub use crate::game::{
    FileScoreStore, GameEvent, GameOverState, PlayResult, PlayState, PuzzleGrid, ScoreRecord,
    ScoreStore,
};
