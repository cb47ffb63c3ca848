//=========================================================================
// Input Vocabulary
//
// Platform-independent description of keyboard and mouse input.
//
// The platform layer produces these; the system bus carries them to the
// active state. Nothing here polls or tracks state over time.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;

//=== Public API ==========================================================

pub use event::{ButtonMask, InputEvent, KeyCode, MouseButton, Position};
