//! List panel filter and sort engine.
//!
//! # Invariants
//! - Filters compose with AND and operate on a snapshot; the input is not
//!   reordered or modified.
//! - Sorting is stable, so equal keys keep storage order.

use crate::model::ticket::{Priority, Status, Ticket};
use std::cmp::Reverse;

/// List ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Newest `created_at` first.
    #[default]
    CreatedDesc,
    /// Highest priority rank first, newest first within a rank.
    PriorityDesc,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::CreatedDesc => Self::PriorityDesc,
            Self::PriorityDesc => Self::CreatedDesc,
        }
    }
}

/// Filter and sort state of the List panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring matched against the title only.
    pub search: String,
    pub sort: SortMode,
}

impl ListQuery {
    fn matches(&self, ticket: &Ticket, needle: &str) -> bool {
        if self.status.is_some_and(|status| ticket.status != status) {
            return false;
        }
        if self
            .priority
            .is_some_and(|priority| ticket.priority != priority)
        {
            return false;
        }
        needle.is_empty() || ticket.title.to_lowercase().contains(needle)
    }
}

/// Filters and sorts a snapshot into the rows shown by the List panel.
pub fn apply_list_query(tickets: &[Ticket], query: &ListQuery) -> Vec<Ticket> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<Ticket> = tickets
        .iter()
        .filter(|ticket| query.matches(ticket, &needle))
        .cloned()
        .collect();

    match query.sort {
        SortMode::CreatedDesc => rows.sort_by_key(|ticket| Reverse(ticket.created_at)),
        SortMode::PriorityDesc => {
            rows.sort_by_key(|ticket| (Reverse(ticket.priority.rank()), Reverse(ticket.created_at)))
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{apply_list_query, ListQuery, SortMode};
    use crate::model::ticket::{Priority, Status, Ticket, TicketId};

    fn ticket(id: &str, title: &str, priority: Priority, status: Status, created_at: i64) -> Ticket {
        Ticket {
            id: TicketId::new(id),
            title: title.to_string(),
            description: "d".to_string(),
            category: "Other".to_string(),
            priority,
            status,
            requester: String::new(),
            created_at,
            updated_at: created_at,
            activity_log: Vec::new(),
        }
    }

    fn ids(rows: &[Ticket]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    fn fixture() -> Vec<Ticket> {
        vec![
            ticket("a", "Printer jam", Priority::Medium, Status::Open, 10),
            ticket("b", "VPN access", Priority::High, Status::InProgress, 30),
            ticket("c", "printer toner", Priority::Low, Status::Closed, 20),
            ticket("d", "Laptop", Priority::High, Status::Open, 5),
        ]
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let rows = apply_list_query(&fixture(), &ListQuery::default());
        assert_eq!(ids(&rows), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn priority_sort_breaks_ties_by_newest() {
        let query = ListQuery {
            sort: SortMode::PriorityDesc,
            ..ListQuery::default()
        };
        let rows = apply_list_query(&fixture(), &query);
        assert_eq!(ids(&rows), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn search_is_case_insensitive_and_title_only() {
        let query = ListQuery {
            search: "  PRINTER ".to_string(),
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply_list_query(&fixture(), &query)), vec!["c", "a"]);

        let description_only = ListQuery {
            search: "d".to_string(),
            ..ListQuery::default()
        };
        assert!(apply_list_query(&fixture(), &description_only).is_empty());
    }

    #[test]
    fn filters_compose_with_and() {
        let query = ListQuery {
            status: Some(Status::Open),
            priority: Some(Priority::High),
            ..ListQuery::default()
        };
        assert_eq!(ids(&apply_list_query(&fixture(), &query)), vec!["d"]);

        let none = ListQuery {
            status: Some(Status::Closed),
            search: "vpn".to_string(),
            ..ListQuery::default()
        };
        assert!(apply_list_query(&fixture(), &none).is_empty());
    }

    #[test]
    fn equal_creation_times_keep_storage_order() {
        let tickets = vec![
            ticket("x", "one", Priority::Low, Status::Open, 7),
            ticket("y", "two", Priority::Low, Status::Open, 7),
        ];
        assert_eq!(
            ids(&apply_list_query(&tickets, &ListQuery::default())),
            vec!["x", "y"]
        );
    }

    #[test]
    fn sort_mode_toggles_between_both_orders() {
        assert_eq!(SortMode::CreatedDesc.toggled(), SortMode::PriorityDesc);
        assert_eq!(SortMode::PriorityDesc.toggled(), SortMode::CreatedDesc);
    }
}
