//=========================================================================
// Flood Puzzle
//=========================================================================
//
// The game built on the core: a flood-fill puzzle and its screens.
//
// Components:
// - `grid`: PuzzleGrid data and connectivity algorithms
// - `events`: game-bus events
// - `board`: the grid as a game-bus listener and drawable
// - `play`: PlayState (one puzzle session)
// - `game_over`: GameOverState (result screen, score keeping)
// - `scores`: persisted best result
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::config::{ConfigError, GameConfig};
use crate::core::model::Model;

//=== Module Declarations =================================================

pub mod board;
pub mod events;
pub mod game_over;
pub mod grid;
pub mod play;
pub mod scores;

//=== Public API ==========================================================

pub use events::GameEvent;
pub use game_over::GameOverState;
pub use grid::PuzzleGrid;
pub use play::{PlayResult, PlayState};
pub use scores::{FileScoreStore, ScoreError, ScoreRecord, ScoreStore};

/// Builds a model whose first state is a fresh puzzle.
///
/// # Errors
///
/// The first [`ConfigError`] found in `config`.
pub fn start(config: GameConfig, scores: Rc<dyn ScoreStore>) -> Result<Model, ConfigError> {
    config.validate()?;

    let config = Rc::new(config);
    let initial = PlayState::new(Rc::clone(&config), scores, config.fps);
    Ok(Model::new(&config, Box::new(initial)))
}

//=========================================================================
// Integration Tests
//=========================================================================
