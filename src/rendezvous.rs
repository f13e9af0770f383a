//! The single-slot, order-tolerant handoff cell: [`RendezvousCell`].
//!
//! A rendezvous cell connects one producer and one consumer that
//! initialize independently and in no particular order. The producer
//! deposits a value; the consumer deposits a waiter. Whichever side
//! arrives second performs the delivery synchronously inside its own
//! call. There is no queue: one value and one waiter flow through the
//! cell, and once they have met the cell is spent.

use alloc::boxed::Box;
use core::{fmt, mem};

#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

struct CellLock<T>(impl_::Mutex<T>);

impl<T> CellLock<T> {
    const fn new(value: T) -> Self {
        Self(impl_::Mutex::new(value))
    }

    #[inline]
    fn lock(&self) -> impl_::MutexGuard<'_, T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.lock();

        #[cfg(feature = "std")]
        let guard = self.0.lock().expect("Unable to acquire rendezvous lock");

        guard
    }
}

type Waiter<T> = Box<dyn FnOnce(T) + Send>;

enum State<T> {
    /// Neither side has arrived yet.
    Empty,
    /// The producer arrived first; the value awaits collection.
    Pending(T),
    /// The consumer arrived first; the waiter awaits a value.
    Waiting(Waiter<T>),
    /// The handoff has happened; the cell is spent.
    Delivered,
}

/// A single-slot cell that hands one value from a producer to a
/// consumer, tolerating either arrival order.
///
/// The two sides interact through [`publish`](Self::publish) and
/// [`register`](Self::register) (or the poll form,
/// [`try_take`](Self::try_take)). Both operations are synchronous,
/// non-blocking, and infallible: an absent waiter at publish time and an
/// absent value at registration time are ordinary parked states, not
/// errors. Delivery always happens inside whichever of the two calls
/// occurs second; nothing is ever deferred.
///
/// The cell is `const`-constructible, so it can back a `static` when the
/// two sides share no caller that could pass one by reference.
///
/// # Examples
///
/// Value first:
///
/// ```
/// use implementors::RendezvousCell;
///
/// static CELL: RendezvousCell<&str> = RendezvousCell::new();
///
/// CELL.publish("payload");
/// CELL.register(|value| assert_eq!(value, "payload"));
/// ```
///
/// Waiter first:
///
/// ```
/// use implementors::RendezvousCell;
///
/// let cell = RendezvousCell::new();
/// cell.register(|value: &str| assert_eq!(value, "payload"));
/// cell.publish("payload");
/// assert!(cell.is_delivered());
/// ```
pub struct RendezvousCell<T: 'static + Send> {
    state: CellLock<State<T>>,
}

impl<T: 'static + Send> RendezvousCell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CellLock::new(State::Empty),
        }
    }

    /// Deposits a value, delivering it immediately if a waiter is
    /// already parked.
    ///
    /// If a waiter is present, it is invoked with `value` before this
    /// call returns and the cell becomes spent. Otherwise `value` is
    /// parked for later collection. The producing side is expected to
    /// publish once per cell; if it publishes again while a value is
    /// still parked, the new value replaces the old one (last write
    /// wins), and a publish after delivery is discarded.
    ///
    /// The waiter runs after the cell's internal lock has been released,
    /// so it is free to call back into the cell.
    pub fn publish(&self, value: T) {
        let waiter = {
            let mut state = self.state.lock();
            match mem::replace(&mut *state, State::Delivered) {
                State::Waiting(waiter) => waiter,
                State::Empty | State::Pending(_) => {
                    *state = State::Pending(value);
                    return;
                }
                State::Delivered => return,
            }
        };
        waiter(value);
    }

    /// Parks a waiter, invoking it immediately if a value is already
    /// pending.
    ///
    /// If a value is pending, `waiter` is invoked with it before this
    /// call returns and the cell becomes spent. Otherwise `waiter` is
    /// parked for the future publish. The consuming side is expected to
    /// register once per cell; a second registration before delivery
    /// replaces the parked waiter (which is dropped uninvoked), and a
    /// registration after delivery is discarded.
    ///
    /// The waiter runs after the cell's internal lock has been released,
    /// so it is free to call back into the cell.
    pub fn register<F>(&self, waiter: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        let value = {
            let mut state = self.state.lock();
            match mem::replace(&mut *state, State::Delivered) {
                State::Pending(value) => value,
                State::Empty | State::Waiting(_) => {
                    *state = State::Waiting(Box::new(waiter));
                    return;
                }
                State::Delivered => return,
            }
        };
        waiter(value);
    }

    /// Collects the pending value without parking a waiter.
    ///
    /// Returns the value and marks the cell spent if one was pending;
    /// otherwise leaves the cell untouched and returns `None`. This is
    /// the poll form of [`register`](Self::register) for consumers that
    /// would rather check for the value on their own schedule.
    ///
    /// # Examples
    ///
    /// ```
    /// use implementors::RendezvousCell;
    ///
    /// let cell = RendezvousCell::new();
    /// assert_eq!(cell.try_take(), None);
    ///
    /// cell.publish(7);
    /// assert_eq!(cell.try_take(), Some(7));
    /// assert_eq!(cell.try_take(), None);
    /// ```
    pub fn try_take(&self) -> Option<T> {
        let mut state = self.state.lock();
        match mem::replace(&mut *state, State::Delivered) {
            State::Pending(value) => Some(value),
            other => {
                *state = other;
                None
            }
        }
    }

    /// Returns `true` if a value is parked and not yet collected.
    pub fn has_pending(&self) -> bool {
        matches!(&*self.state.lock(), State::Pending(_))
    }

    /// Returns `true` if the handoff has already happened.
    pub fn is_delivered(&self) -> bool {
        matches!(&*self.state.lock(), State::Delivered)
    }
}

impl<T: 'static + Send> Default for RendezvousCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static + Send> fmt::Debug for RendezvousCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.lock() {
            State::Empty => "Empty",
            State::Pending(_) => "Pending",
            State::Waiting(_) => "Waiting",
            State::Delivered => "Delivered",
        };
        f.debug_struct("RendezvousCell").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, sync::Arc, vec::Vec};
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_cell_send_sync() {
        static_assertions::assert_impl_all!(RendezvousCell<String>: Send, Sync);
        static_assertions::assert_impl_all!(RendezvousCell<Vec<String>>: Send, Sync);
    }

    #[test]
    fn publish_then_register_delivers_once() {
        let cell = RendezvousCell::new();
        cell.publish("payload");
        assert!(cell.has_pending());

        let seen = Arc::new(spin::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cell.register(move |value| sink.lock().push(value));

        assert_eq!(*seen.lock(), ["payload"]);
        assert!(cell.is_delivered());
        assert!(!cell.has_pending());
    }

    #[test]
    fn register_then_publish_delivers_once() {
        let cell = RendezvousCell::new();

        let seen = Arc::new(spin::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        cell.register(move |value| sink.lock().push(value));
        assert!(seen.lock().is_empty());

        cell.publish("payload");
        assert_eq!(*seen.lock(), ["payload"]);
        assert!(cell.is_delivered());
    }

    #[test]
    fn publish_parks_without_invoking() {
        let cell = RendezvousCell::new();
        cell.publish(1);

        assert!(cell.has_pending());
        assert!(!cell.is_delivered());
    }

    #[test]
    fn register_parks_without_invoking() {
        let calls = Arc::new(AtomicUsize::new(0));

        let cell = RendezvousCell::<i32>::new();
        let counter = Arc::clone(&calls);
        cell.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!cell.has_pending());
        assert!(!cell.is_delivered());
    }

    #[test]
    fn second_publish_before_delivery_wins() {
        let cell = RendezvousCell::new();
        cell.publish("first");
        cell.publish("second");

        assert_eq!(cell.try_take(), Some("second"));
    }

    #[test]
    fn publish_after_delivery_is_discarded() {
        let cell = RendezvousCell::new();
        cell.publish("first");
        assert_eq!(cell.try_take(), Some("first"));

        cell.publish("late");
        assert!(!cell.has_pending());
        assert_eq!(cell.try_take(), None);
    }

    #[test]
    fn second_registration_replaces_the_waiter() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        let cell = RendezvousCell::<&str>::new();
        let counter = Arc::clone(&first_calls);
        cell.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second_calls);
        cell.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cell.publish("payload");
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registration_after_delivery_is_discarded() {
        let calls = Arc::new(AtomicUsize::new(0));

        let cell = RendezvousCell::new();
        cell.publish("payload");
        assert_eq!(cell.try_take(), Some("payload"));

        let counter = Arc::clone(&calls);
        cell.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(cell.is_delivered());
    }

    #[test]
    fn waiter_may_reenter_the_cell() {
        let delivered = Arc::new(AtomicUsize::new(0));

        let cell = Arc::new(RendezvousCell::<u32>::new());
        let reentrant = Arc::clone(&cell);
        let counter = Arc::clone(&delivered);
        cell.register(move |value| {
            counter.fetch_add(value as usize, Ordering::SeqCst);
            // Observing the cell from inside the waiter must not deadlock.
            assert!(reentrant.is_delivered());
        });

        cell.publish(5);
        assert_eq!(delivered.load(Ordering::SeqCst), 5);
    }
}
