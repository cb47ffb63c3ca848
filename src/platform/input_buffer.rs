//=========================================================================
// Input Buffer
//
// Collects converted input between two frame boundaries, split into
// discrete and continuous events.
//
// Responsibilities:
// - Keep discrete inputs (keys, buttons) in arrival order
// - Drop consecutive duplicates (e.g. OS key repeat within one frame)
// - Coalesce continuous inputs (cursor motion) into one event per kind
// - Hand both lists over in one `drain()`
//
// Notes:
// Coalesced motion keeps the latest position and button mask and sums
// the deltas, so no movement is lost between frames.
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;

//=== Internal Modules ====================================================
use crate::core::input::{InputEvent, Position};

//=== InputBuffer Struct ==================================================
//
// Transient event store for one frame of input.
//
// Internally maintains:
// - `discrete`: ordered one-shot inputs (KeyDown, MouseButtonUp, ...)
// - `continuous`: one entry per continuous kind (MouseMotion)
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Continuous Event Handling ---------------------------------------
    //
    // Merges into the pending event of the same kind, if any.
    //
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        let merged = match self.continuous.take(&event) {
            Some(previous) => coalesce(previous, event),
            None => event,
        };
        self.continuous.insert(merged);
    }

    //--- Discrete Event Handling -----------------------------------------
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns (discrete, continuous) and clears the buffer, or None when
    // nothing was collected this frame.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = self.discrete.drain(..).collect();
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=== Coalescing ==========================================================

fn coalesce(previous: InputEvent, latest: InputEvent) -> InputEvent {
    match (previous, latest) {
        (
            InputEvent::MouseMotion { delta: before, .. },
            InputEvent::MouseMotion {
                position,
                delta,
                buttons,
            },
        ) => InputEvent::MouseMotion {
            position,
            delta: Position::new(before.x + delta.x, before.y + delta.y),
            buttons,
        },
        (_, latest) => latest,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
