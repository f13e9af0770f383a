//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the handful of items most callers need, so a
//! producer or renderer can get going with a single use statement.
//!
//! # Usage
//!
//! ```rust
//! use implementors::prelude::*;
//!
//! register_handler(|table| {
//!     assert_eq!(table.get("libA").map(<[_]>::len), Some(1));
//! });
//!
//! let mut table = ImplementorTable::new();
//! table.insert(ImplementorEntry::new("libA", ["<code>Widget</code>"]));
//! publish(table);
//! ```
//!
//! # What's Included
//!
//! - **[`ImplementorTable`]** and **[`ImplementorEntry`]**: the payload
//!   data model
//! - **[`ImplementorRegistry`]**: the handoff cell, for callers that
//!   construct their own instead of using the process-wide one
//! - **[`publish`]** and **[`register_handler`]**: the two entry points
//!   on the process-wide registry
//! - **[`PayloadError`]**: what payload parsing reports for a malformed
//!   shape

pub use crate::{
    payload::PayloadError,
    registry::{ImplementorRegistry, publish, register_handler},
    table::{ImplementorEntry, ImplementorTable},
};
