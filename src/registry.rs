//! The implementor registry: the handoff point between the payload
//! producer and the page renderer.
//!
//! # Quick Start
//!
//! ```rust
//! use implementors::{ImplementorEntry, ImplementorTable, publish, register_handler};
//!
//! // Consumer side, run whenever the renderer becomes ready.
//! register_handler(|table| {
//!     for (library, markup) in table.iter() {
//!         render_implementor_list(library, markup);
//!     }
//! });
//!
//! // Producer side, run whenever the payload script loads.
//! let mut table = ImplementorTable::new();
//! table.insert(ImplementorEntry::new("libA", ["implA1", "implA2"]));
//! publish(table);
//!
//! fn render_implementor_list(library: &str, markup: &[String]) {
//!     // Your renderer here.
//! }
//! ```
//!
//! The two calls above may run in either order; the handler observes the
//! same table either way, exactly once, synchronously inside whichever
//! call happens second.
//!
//! # Process-Wide vs. Injected
//!
//! The free functions [`publish`] and [`register_handler`] operate on a
//! single process-wide [`ImplementorRegistry`], which exists because the
//! producer and consumer are independently loaded scripts with no shared
//! caller that could hand one a reference. When your producer and
//! consumer *do* share a caller, prefer constructing an
//! [`ImplementorRegistry`] yourself (it is `const`-constructible, so a
//! `static` of your own also works) and passing it to both sides; the
//! process-wide instance is a convenience, not a requirement.

use crate::{rendezvous::RendezvousCell, table::ImplementorTable};

/// A single-use registry handing one [`ImplementorTable`] from the
/// payload producer to the page renderer, tolerating either
/// initialization order.
///
/// This is a thin wrapper around [`RendezvousCell`] fixing the carried
/// value to [`ImplementorTable`]. All operations are synchronous,
/// non-blocking, and infallible: an absent handler at publish time and
/// an absent table at registration time are both expected states. The
/// delivery happens inside whichever of [`publish`](Self::publish) and
/// [`on_table`](Self::on_table) is called second.
///
/// [`RendezvousCell`]: crate::rendezvous::RendezvousCell
///
/// # Examples
///
/// ```
/// use implementors::{ImplementorEntry, ImplementorRegistry, ImplementorTable};
///
/// let registry = ImplementorRegistry::new();
///
/// let mut table = ImplementorTable::new();
/// table.insert(ImplementorEntry::new("libA", ["implA1", "implA2"]));
/// registry.publish(table);
///
/// registry.on_table(|table| {
///     assert_eq!(table.get("libA").map(<[_]>::len), Some(2));
/// });
/// assert!(registry.is_delivered());
/// ```
#[derive(Debug, Default)]
pub struct ImplementorRegistry {
    cell: RendezvousCell<ImplementorTable>,
}

impl ImplementorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: RendezvousCell::new(),
        }
    }

    /// Returns the process-wide registry used by [`publish`] and
    /// [`register_handler`].
    pub fn global() -> &'static ImplementorRegistry {
        &REGISTRY
    }

    /// Supplies the payload table, delivering it immediately if a
    /// handler is already registered.
    ///
    /// The producer is expected to call this exactly once per page load.
    /// Calling it again is not an error: a re-publish before delivery
    /// replaces the pending table (last write wins), and a publish after
    /// delivery is discarded.
    pub fn publish(&self, table: ImplementorTable) {
        self.cell.publish(table);
    }

    /// Registers the renderer's handler, invoking it immediately if a
    /// table is already pending.
    ///
    /// The consumer is expected to call this exactly once, when it has
    /// located the page elements it will populate. The handler runs with
    /// the table exactly once, inside this call or inside the later
    /// [`publish`](Self::publish), after the registry's internal lock
    /// has been released.
    pub fn on_table<F>(&self, handler: F)
    where
        F: FnOnce(ImplementorTable) + Send + 'static,
    {
        self.cell.register(handler);
    }

    /// Collects a pending table without registering a handler.
    ///
    /// This is the poll form of [`on_table`](Self::on_table): renderers
    /// that re-check on their own schedule can call it on each pass.
    /// Returns `None` when no table is pending, including after the
    /// table has already been delivered.
    pub fn try_take(&self) -> Option<ImplementorTable> {
        self.cell.try_take()
    }

    /// Returns `true` if a table is parked awaiting a handler.
    pub fn has_pending(&self) -> bool {
        self.cell.has_pending()
    }

    /// Returns `true` if the table has already been handed to a handler
    /// or collected via [`try_take`](Self::try_take).
    pub fn is_delivered(&self) -> bool {
        self.cell.is_delivered()
    }
}

static REGISTRY: ImplementorRegistry = ImplementorRegistry::new();

/// Supplies the payload table to the process-wide registry.
///
/// This is the producer entry point emitted payloads call; see
/// [`ImplementorRegistry::publish`] for the exact semantics.
pub fn publish(table: ImplementorTable) {
    REGISTRY.publish(table);
}

/// Registers the renderer's handler with the process-wide registry.
///
/// See [`ImplementorRegistry::on_table`] for the exact semantics.
pub fn register_handler<F>(handler: F)
where
    F: FnOnce(ImplementorTable) + Send + 'static,
{
    REGISTRY.on_table(handler);
}
