//! Ticket domain model.
//!
//! # Responsibility
//! - Define the persisted `Ticket` record and its closed value sets.
//! - Define the caller-side draft/patch shapes consumed by the store.
//!
//! # Invariants
//! - Every ticket is identified by a `TicketId` that is never reused.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod ticket;
