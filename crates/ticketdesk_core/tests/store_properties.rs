use proptest::prelude::*;
use ticketdesk_core::{
    ActivityEntry, ManualClock, MemoryKv, Priority, Status, Ticket, TicketDraft, TicketId,
    TicketPatch, TicketStore,
};

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![Just(Status::Open), Just(Status::InProgress), Just(Status::Closed)]
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,24}"
}

fn arb_draft() -> impl Strategy<Value = TicketDraft> {
    (
        arb_text(),
        arb_text(),
        arb_text(),
        arb_priority(),
        arb_status(),
        "[a-zA-Z]{0,8}",
    )
        .prop_map(|(title, description, category, priority, status, requester)| {
            TicketDraft::new(format!("t{title}"), format!("d{description}"))
                .with_category(category)
                .with_priority(priority)
                .with_status(status)
                .with_requester(requester)
        })
}

fn arb_activity() -> impl Strategy<Value = Vec<ActivityEntry>> {
    prop::collection::vec(
        (0i64..1_000_000, "[A-Z_]{1,16}", "[a-z]{1,8}").prop_map(|(timestamp, action, actor)| {
            ActivityEntry {
                timestamp,
                action,
                actor,
            }
        }),
        0..4,
    )
}

fn arb_patch() -> impl Strategy<Value = TicketPatch> {
    (
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_text()),
        prop::option::of(arb_priority()),
        prop::option::of(arb_status()),
        prop::option::of("[a-zA-Z]{0,8}"),
        prop::option::of(arb_activity()),
    )
        .prop_map(
            |(title, description, category, priority, status, requester, activity_log)| {
                TicketPatch {
                    title,
                    description,
                    category,
                    priority,
                    status,
                    requester,
                    activity_log,
                }
            },
        )
}

fn arb_ticket() -> impl Strategy<Value = Ticket> {
    (arb_draft(), "[a-z0-9_]{1,20}", 0i64..10_000, 0i64..10_000).prop_map(
        |(draft, id, created_at, age)| Ticket {
            id: TicketId::new(id),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: draft.priority,
            status: draft.status,
            requester: draft.requester,
            created_at,
            updated_at: created_at + age,
            activity_log: Vec::new(),
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn update_sets_named_fields_and_keeps_the_rest(
        draft in arb_draft(),
        patch in arb_patch(),
        elapsed in 0i64..5_000,
    ) {
        let clock = ManualClock::new(1_000);
        let mut store = TicketStore::with_clock(MemoryKv::new(), clock.clone()).with_rng_seed(5);
        let before = store.create(draft);
        store.add(before.clone()).unwrap();

        clock.advance(elapsed);
        prop_assert!(store.update(&before.id, &patch).unwrap());
        let after = store.get(&before.id).unwrap();

        prop_assert_eq!(&after.title, patch.title.as_ref().unwrap_or(&before.title));
        prop_assert_eq!(&after.description, patch.description.as_ref().unwrap_or(&before.description));
        prop_assert_eq!(&after.category, patch.category.as_ref().unwrap_or(&before.category));
        prop_assert_eq!(after.priority, patch.priority.unwrap_or(before.priority));
        prop_assert_eq!(after.status, patch.status.unwrap_or(before.status));
        prop_assert_eq!(&after.requester, patch.requester.as_ref().unwrap_or(&before.requester));
        prop_assert_eq!(&after.activity_log, patch.activity_log.as_ref().unwrap_or(&before.activity_log));
        prop_assert_eq!(&after.id, &before.id);
        prop_assert_eq!(after.created_at, before.created_at);
        prop_assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn written_collection_reads_back_unchanged(tickets in prop::collection::vec(arb_ticket(), 1..8)) {
        let mut store = TicketStore::new(MemoryKv::new());
        prop_assert!(store.seed_if_empty(tickets.clone()).unwrap());
        prop_assert_eq!(store.all(), tickets);
    }

    #[test]
    fn seed_never_touches_a_non_empty_collection(
        existing in prop::collection::vec(arb_ticket(), 1..5),
        samples in prop::collection::vec(arb_ticket(), 0..5),
    ) {
        let mut store = TicketStore::new(MemoryKv::new());
        store.seed_if_empty(existing.clone()).unwrap();
        prop_assert!(!store.seed_if_empty(samples).unwrap());
        prop_assert_eq!(store.all(), existing);
    }
}
