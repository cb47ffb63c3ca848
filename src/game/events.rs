//=========================================================================
// Game Events
//=========================================================================
//
// Events on the per-session game bus, owned by the play state.
//
// Flow:
//   PlayState ── SquareClicked ──▶ Board ── GridUpdated ──▶ Tally
//
//=========================================================================

/// Puzzle-level events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player clicked the cell at `index`.
    SquareClicked { index: usize },

    /// A click merged a border cell into the player's region.
    GridUpdated,
}
