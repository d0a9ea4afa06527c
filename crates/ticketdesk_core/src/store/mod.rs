//! Ticket persistence authority.
//!
//! # Responsibility
//! - Own ticket identity generation and the full-collection blob.
//! - Expose create/read/update/delete/seed over a `KeyValueStore`.
//!
//! # Invariants
//! - Every write serializes the complete collection under one key.
//! - Reads never fail: malformed or unreadable blobs read as empty.

mod id;
pub mod seed;
pub mod ticket_store;

pub use id::generate_ticket_id;
