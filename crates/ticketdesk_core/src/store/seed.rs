//! Sample tickets written on first run.

use crate::clock::Clock;
use crate::kv::KeyValueStore;
use crate::model::ticket::{Priority, Ticket, TicketDraft};
use crate::store::ticket_store::TicketStore;

/// Drafts for the three bootstrap tickets, in seed order.
pub fn sample_drafts() -> Vec<TicketDraft> {
    vec![
        TicketDraft::new("Printer is not printing", "Error 0x09")
            .with_category("Hardware")
            .with_priority(Priority::Medium)
            .with_requester("João"),
        TicketDraft::new("VPN access", "Connection keeps failing")
            .with_category("Network")
            .with_priority(Priority::High)
            .with_requester("Maria"),
        TicketDraft::new("Upgrade Office", "Requesting the 2021 release")
            .with_category("Software")
            .with_priority(Priority::Low)
            .with_requester("Carlos"),
    ]
}

/// Runs the sample drafts through the store factory.
pub fn sample_tickets<K: KeyValueStore, C: Clock>(store: &mut TicketStore<K, C>) -> Vec<Ticket> {
    sample_drafts()
        .into_iter()
        .map(|draft| store.create(draft))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{sample_drafts, sample_tickets};
    use crate::clock::ManualClock;
    use crate::kv::MemoryKv;
    use crate::model::ticket::Priority;
    use crate::store::ticket_store::TicketStore;

    #[test]
    fn samples_are_valid_and_cover_every_priority() {
        let drafts = sample_drafts();
        assert!(drafts.iter().all(|draft| draft.validate().is_ok()));
        let priorities: Vec<Priority> = drafts.iter().map(|draft| draft.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::Medium, Priority::High, Priority::Low]
        );
    }

    #[test]
    fn sample_tickets_do_not_persist_by_themselves() {
        let mut store = TicketStore::with_clock(MemoryKv::new(), ManualClock::new(10));
        let tickets = sample_tickets(&mut store);
        assert_eq!(tickets.len(), 3);
        assert!(store.all().is_empty());
    }
}
