#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An order-tolerant, single-slot registry for trait implementor payloads
//! on documentation pages.
//!
//! ## Overview
//!
//! Generated documentation renders, on every trait page, the list of
//! concrete types implementing that trait. The data for those lists is
//! emitted by the documentation generator as a small payload, loaded
//! independently of the page's rendering logic. Neither side can assume
//! the other has already run: the payload script may execute before the
//! renderer has initialized, or the renderer may come up before the
//! payload has loaded.
//!
//! This crate provides the handoff point between the two. An
//! [`ImplementorRegistry`] is a single-slot rendezvous: the producer
//! calls [`publish`] with an [`ImplementorTable`], the consumer calls
//! [`register_handler`] with a callback, and whichever call happens
//! second performs the delivery synchronously inside that call. Data is
//! never lost to initialization order, and neither call ever blocks or
//! fails.
//!
//! ## Quick Example
//!
//! ```
//! use implementors::{ImplementorEntry, ImplementorRegistry, ImplementorTable};
//!
//! let registry = ImplementorRegistry::new();
//!
//! // The renderer became ready first: its handler is parked.
//! registry.on_table(|table| {
//!     for (library, markup) in table.iter() {
//!         println!("{library}: {} implementors", markup.len());
//!     }
//! });
//!
//! // The payload arrives later and is delivered inside this call.
//! let mut table = ImplementorTable::new();
//! table.insert(ImplementorEntry::new("alloc", ["<code>Box</code>", "<code>Vec</code>"]));
//! registry.publish(table);
//! ```
//!
//! The opposite order works just as well: a table published before any
//! handler exists is parked in the slot, and the first registration (or
//! a call to [`ImplementorRegistry::try_take`]) collects it.
//!
//! ## Core Concepts
//!
//! - An [`ImplementorTable`] maps each library identifier to the ordered
//!   markup descriptions of its implementors. Both the key order and the
//!   description order are the producer's order; nothing in this crate
//!   sorts or dedups them. See the [`table`] module.
//! - The payload itself is a JSON object of string arrays. The
//!   [`payload`] module owns that boundary: parsing, shape validation
//!   into [`PayloadError`], and serialization back out.
//! - The slot mechanism is the generic [`RendezvousCell`], usable for
//!   any one-shot value handoff; [`ImplementorRegistry`] is the
//!   implementor-table instance of it, and the free functions
//!   [`publish`] and [`register_handler`] operate on the process-wide
//!   registry. See the [`registry`] module for choosing between the
//!   process-wide instance and an explicitly injected one.
//!
//! ## no_std Support
//!
//! The crate is `no_std` by default, requiring only `alloc`. The `std`
//! feature switches the cell's internal lock from a spin lock to
//! `std::sync::Mutex`.

extern crate alloc;

pub mod payload;
pub mod prelude;
pub mod registry;
pub mod rendezvous;
pub mod table;

pub use self::{
    payload::PayloadError,
    registry::{ImplementorRegistry, publish, register_handler},
    rendezvous::RendezvousCell,
    table::{ImplementorEntry, ImplementorTable},
};
