//! Home panel aggregate: per-status counts plus the most recent tickets.

use crate::model::ticket::{Status, Ticket};
use std::cmp::Reverse;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeSummary {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    /// Newest `created_at` first, at most `recent_limit` entries.
    pub recent: Vec<Ticket>,
}

impl HomeSummary {
    pub fn count(&self, status: Status) -> usize {
        match status {
            Status::Open => self.open,
            Status::InProgress => self.in_progress,
            Status::Closed => self.closed,
        }
    }
}

/// Computes the Home aggregate over the full, unfiltered collection.
pub fn summarize(tickets: &[Ticket], recent_limit: usize) -> HomeSummary {
    let count = |status: Status| tickets.iter().filter(|t| t.status == status).count();

    let mut recent = tickets.to_vec();
    recent.sort_by_key(|ticket| Reverse(ticket.created_at));
    recent.truncate(recent_limit);

    HomeSummary {
        open: count(Status::Open),
        in_progress: count(Status::InProgress),
        closed: count(Status::Closed),
        recent,
    }
}
