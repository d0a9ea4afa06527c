//! View synchronization over the ticket store.
//!
//! # Responsibility
//! - Derive the Home, List and Detail views from store snapshots.
//! - Define which views refresh after which mutation (`refresh`).
//! - Track the active panel and the detail focus (`coordinator`).
//!
//! # Invariants
//! - View derivation never writes to the store.
//! - A detail focus that no longer resolves renders as the placeholder.

pub mod confirm;
pub mod coordinator;
pub mod home;
pub mod list;
pub mod panel;
pub mod refresh;
