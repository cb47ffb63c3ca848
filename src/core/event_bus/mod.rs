//=========================================================================
// Event Bus
//=========================================================================
//
// Synchronous publish/subscribe for a single event type.
//
// Architecture:
//   post(E) ──→ pending: VecDeque<E>
//                    ↓ (only when no pass is running)
//   deliver() ─→ for each event: snapshot listeners → notify() in
//                registration order
//
// Posts made from inside notify() are queued and delivered after the
// current pass, so handlers never re-enter the bus.
//
//=========================================================================

//=== Module Declarations =================================================

mod bus;

//=== Public API ==========================================================

pub use bus::{EventBus, Subscription};

//=== Listener Trait ======================================================

/// Receiver of events from one bus.
///
/// Listeners are registered as `Rc<RefCell<L>>` and held weakly by the
/// bus. The returned [`Subscription`] keeps the registration alive and
/// removes it when dropped.
///
/// ```rust
/// # use std::cell::RefCell;
/// # use std::rc::Rc;
/// # use flood_engine::prelude::*;
/// struct Counter(u32);
///
/// impl Listener<u32> for Counter {
///     fn notify(&mut self, event: &u32) {
///         self.0 += *event;
///     }
/// }
///
/// let bus = EventBus::new();
/// let counter = Rc::new(RefCell::new(Counter(0)));
/// let _subscription = bus.register(&counter);
///
/// bus.post(2);
/// bus.post(3);
/// assert_eq!(counter.borrow().0, 5);
/// ```
pub trait Listener<E> {
    fn notify(&mut self, event: &E);
}
