//=========================================================================
// Frame Sink
//=========================================================================
//
// Renderer-side listener on the system bus: forwards every
// StateUpdated frame to the platform thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::CoreEvent;
use crate::core::event::SystemEvent;
use crate::core::event_bus::Listener;

//=== FrameSink ===========================================================

/// Sends frames to the platform. Never blocks the logic thread: when the
/// platform is behind, the frame is dropped.
pub(crate) struct FrameSink {
    sender: Sender<CoreEvent>,
    disconnected: bool,
}

impl FrameSink {
    pub(crate) fn new(sender: Sender<CoreEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }
}

impl Listener<SystemEvent> for FrameSink {
    fn notify(&mut self, event: &SystemEvent) {
        let SystemEvent::StateUpdated(frame) = event else {
            return;
        };

        match self.sender.try_send(CoreEvent::Frame(frame.clone())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                trace!(target: "core", "Platform busy, frame dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                if !self.disconnected {
                    warn!(target: "core", "Platform channel disconnected, frames discarded");
                    self.disconnected = true;
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Frame;
    use crossbeam_channel::bounded;

    #[test]
    fn forwards_only_frames() {
        let (tx, rx) = bounded(4);
        let mut sink = FrameSink::new(tx);

        sink.notify(&SystemEvent::Tick);
        sink.notify(&SystemEvent::StateUpdated(Frame::new()));

        assert!(matches!(rx.try_recv(), Ok(CoreEvent::Frame(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_channel_drops_frame() {
        let (tx, rx) = bounded(1);
        let mut sink = FrameSink::new(tx);

        sink.notify(&SystemEvent::StateUpdated(Frame::new()));
        sink.notify(&SystemEvent::StateUpdated(Frame::new()));

        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn disconnected_channel_is_tolerated() {
        let (tx, rx) = bounded(1);
        let mut sink = FrameSink::new(tx);
        drop(rx);

        sink.notify(&SystemEvent::StateUpdated(Frame::new()));
        sink.notify(&SystemEvent::StateUpdated(Frame::new()));
        assert!(sink.disconnected);
    }
}
