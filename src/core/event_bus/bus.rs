//=========================================================================
// Event Bus Implementation
//=========================================================================
//
// Listener storage, the pending queue and delivery passes.
//
// Shared state lives behind an `Rc` so that listeners can keep a handle
// to their home bus and post to it. Everything is single-threaded:
// `Cell`/`RefCell` only, no locking.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{error, trace};

//=== Internal Dependencies ===============================================

use super::Listener;

//=== Entry ===============================================================

type ListenerRef<E> = Weak<RefCell<dyn Listener<E>>>;

struct Entry<E: 'static> {
    id: u64,
    listener: ListenerRef<E>,
}

// Manual impl: `E` itself need not be Clone.
impl<E: 'static> Clone for Entry<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            listener: self.listener.clone(),
        }
    }
}

//=== Shared State ========================================================

struct Inner<E: 'static> {
    listeners: RefCell<Vec<Entry<E>>>,
    pending: RefCell<VecDeque<E>>,
    delivering: Cell<bool>,
    next_id: Cell<u64>,
}

//=== EventBus ============================================================

/// Single-threaded publish/subscribe bus for events of type `E`.
///
/// Cloning an `EventBus` yields another handle to the same bus.
///
/// # Ordering
///
/// - Listeners are notified in registration order.
/// - Events are delivered in post order.
/// - An event posted while a pass is running is delivered after that
///   pass has reached every listener.
///
/// # Registration
///
/// Registering the same listener twice yields two subscriptions and two
/// deliveries per event. Registrations made or dropped during a pass
/// take effect from the next pass on.
pub struct EventBus<E: 'static> {
    inner: Rc<Inner<E>>,
}

impl<E: 'static> EventBus<E> {
    //--- Construction -----------------------------------------------------

    /// Creates a bus with no listeners and nothing pending.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                listeners: RefCell::new(Vec::new()),
                pending: RefCell::new(VecDeque::new()),
                delivering: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `listener` at the end of the delivery list.
    ///
    /// The bus only holds a weak reference; the listener stays registered
    /// for as long as the returned [`Subscription`] lives.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn register<L>(&self, listener: &Rc<RefCell<L>>) -> Subscription<E>
    where
        L: Listener<E> + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let strong: Rc<RefCell<dyn Listener<E>>> = listener.clone();
        self.inner.listeners.borrow_mut().push(Entry {
            id,
            listener: Rc::downgrade(&strong),
        });

        trace!(target: "core::bus", "Registered listener #{}", id);

        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
        }
    }

    //--- Posting ----------------------------------------------------------

    /// Queues `event` for delivery.
    ///
    /// Outside a pass this delivers immediately, draining the queue
    /// (including anything posted by the listeners themselves). Inside a
    /// pass the event is appended to the queue and returns at once.
    pub fn post(&self, event: E) {
        self.inner.pending.borrow_mut().push_back(event);

        if self.inner.delivering.get() {
            return;
        }

        self.deliver();
    }

    //--- Query API --------------------------------------------------------

    /// Number of live registrations.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Number of events waiting for delivery.
    pub fn pending_len(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// True while a delivery pass is running.
    pub fn is_delivering(&self) -> bool {
        self.inner.delivering.get()
    }

    //--- Internal Helpers -------------------------------------------------

    fn deliver(&self) {
        let _guard = DeliveryGuard::engage(&self.inner);

        loop {
            let next = self.inner.pending.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };

            // Snapshot: registration changes made by listeners apply to
            // the next event, never to the one being delivered.
            let snapshot: Vec<Entry<E>> = self.inner.listeners.borrow().clone();

            for entry in snapshot {
                let Some(listener) = entry.listener.upgrade() else {
                    continue;
                };

                match listener.try_borrow_mut() {
                    Ok(mut listener) => listener.notify(&event),
                    Err(_) => error!(
                        target: "core::bus",
                        "Listener #{} is already borrowed, skipping delivery",
                        entry.id
                    ),
                };
            }
        }
    }
}

impl<E: 'static> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .field("pending", &self.pending_len())
            .field("delivering", &self.is_delivering())
            .finish()
    }
}

//=== DeliveryGuard =======================================================

/// Marks a pass as running and always clears the flag on exit.
///
/// If a listener panics the pending queue is discarded as a whole, so
/// the bus is left empty and reusable rather than half-drained.
struct DeliveryGuard<'a, E: 'static> {
    inner: &'a Inner<E>,
}

impl<'a, E: 'static> DeliveryGuard<'a, E> {
    fn engage(inner: &'a Inner<E>) -> Self {
        inner.delivering.set(true);
        Self { inner }
    }
}

impl<E: 'static> Drop for DeliveryGuard<'_, E> {
    fn drop(&mut self) {
        self.inner.delivering.set(false);

        if std::thread::panicking() {
            if let Ok(mut pending) = self.inner.pending.try_borrow_mut() {
                let discarded = pending.len();
                pending.clear();
                error!(
                    target: "core::bus",
                    "Listener panicked during delivery, discarded {} pending event(s)",
                    discarded
                );
            }
        }
    }
}

//=== Subscription ========================================================

/// Registration handle returned by [`EventBus::register`].
///
/// Dropping it unregisters the listener. It does not keep the bus alive.
pub struct Subscription<E: 'static> {
    bus: Weak<Inner<E>>,
    id: u64,
}

impl<E: 'static> Subscription<E> {
    /// Returns a handle to the home bus, if it still exists.
    pub fn bus(&self) -> Option<EventBus<E>> {
        self.bus.upgrade().map(|inner| EventBus { inner })
    }

    /// Unregisters now. Equivalent to dropping the handle.
    pub fn cancel(self) {}
}

impl<E: 'static> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            if let Ok(mut listeners) = inner.listeners.try_borrow_mut() {
                listeners.retain(|entry| entry.id != self.id);
                trace!(target: "core::bus", "Unregistered listener #{}", self.id);
            }
        }
    }
}

impl<E: 'static> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
