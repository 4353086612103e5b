//! Normalized domain model mirrored from the library service.
//!
//! # Responsibility
//! - Define the records held by the catalog and inbox containers.
//! - Keep transport quirks (string counters, `"1"` flags) out of this layer.
//!
//! # Invariants
//! - Records here are already normalized; see `transport` for wire shapes.

pub mod book;
pub mod notification;
