//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. winit) into a
// unified, engine-friendly format carried on the system bus.
//
// Responsibilities:
// - Represent keyboard and mouse inputs in a stable, portable way
// - Carry the payload the game needs (key, button, cursor position,
//   motion delta, held buttons)
// - Provide equality and hashing semantics for frame-level coalescing
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    SystemEvent::Input on the system bus
//         ↓
//    Active State
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== ButtonMask ==========================================================

/// Set of mouse buttons held at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const MIDDLE: Self = Self(1 << 2);
    pub const OTHER: Self = Self(1 << 3);

    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & Self::from(button).0 != 0
    }

    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= Self::from(button).0;
    }

    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !Self::from(button).0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<MouseButton> for ButtonMask {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Other => Self::OTHER,
        }
    }
}

//=== Position ============================================================

/// Screen-space point or offset in pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// Events compare by kind and key/button. Positions, deltas and held
/// buttons are payload, not identity: two `MouseMotion` events are always
/// equal so a frame keeps only one of them.
///
/// ```text
/// KeyDown{A}             == KeyDown{A}              ✓
/// KeyDown{A}             == KeyUp{A}                ✗ (different kind)
/// MouseButtonDown{L, p1} == MouseButtonDown{L, p2}  ✓
/// MouseMotion{...}       == MouseMotion{...}        ✓ (always equal)
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown { key: KeyCode },

    /// Key released.
    KeyUp { key: KeyCode },

    /// Mouse button pressed at `position`.
    MouseButtonDown { button: MouseButton, position: Position },

    /// Mouse button released at `position`.
    MouseButtonUp { button: MouseButton, position: Position },

    /// Cursor moved to `position`, `delta` from its previous position,
    /// with `buttons` held.
    MouseMotion {
        position: Position,
        delta: Position,
        buttons: ButtonMask,
    },
}

impl InputEvent {
    /// True for a key press of `key`.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        matches!(self, Self::KeyDown { key: k } if *k == key)
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a }, KeyDown { key: b }) => a == b,
            (KeyUp { key: a }, KeyUp { key: b }) => a == b,
            (MouseButtonDown { button: a, .. }, MouseButtonDown { button: b, .. }) => a == b,
            (MouseButtonUp { button: a, .. }, MouseButtonUp { button: b, .. }) => a == b,
            (MouseMotion { .. }, MouseMotion { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes discriminant + key/button, consistent with equality.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key } | Self::KeyUp { key } => key.hash(state),
            Self::MouseButtonDown { button, .. } | Self::MouseButtonUp { button, .. } => {
                button.hash(state)
            }
            Self::MouseMotion { .. } => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
