//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) with the core systems.
//
// This module defines the contract between the platform thread and the
// logic thread, so the platform backend can change without touching
// core code.
//
// Components:
// - `interface`: Messages in both directions (the contract)
// - `event_collector`: Core-side collection of platform input
// - `frame_sink`: Core-side forwarding of rendered frames
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod frame_sink;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use frame_sink::FrameSink;
pub(crate) use interface::{CoreEvent, PlatformEvent};
