//! Core domain logic for the ticket desk.
//! The ticket store is the single source of truth; the view coordinator keeps
//! the Home, List and Detail views consistent with it.

pub mod clock;
pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod store;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DeskConfig};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKv, SqliteKv};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::ticket::{
    ActivityEntry, Priority, Status, Ticket, TicketDraft, TicketId, TicketPatch,
    TicketValidationError,
};
pub use store::seed::{sample_drafts, sample_tickets};
pub use store::ticket_store::{StoreError, StoreResult, TicketStore};
pub use view::confirm::Confirm;
pub use view::coordinator::{CoordinatorError, CoordinatorResult, DetailView, ViewCoordinator};
pub use view::home::HomeSummary;
pub use view::list::{ListQuery, SortMode};
pub use view::panel::Panel;
pub use view::refresh::{refresh_plan, FocusEffect, Mutation, RefreshPlan, RefreshSet};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
