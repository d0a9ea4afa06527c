//! Ticket store over a single serialized blob.
//!
//! # Responsibility
//! - Read, transform and write the whole ticket collection as one JSON array.
//! - Stamp ids and timestamps; nothing else in the crate assigns them.
//!
//! # Invariants
//! - Writes are snapshot transforms: read, compute a new vector, write it back.
//!   Snapshots handed to callers are never aliased by later writes.
//! - Array elements that do not decode as tickets are hidden from reads but
//!   written back untouched; they also keep the collection non-empty.
//! - `updated_at` strictly increases on every successful `update`.
//! - Not-found is reported as `false`/`None`, never as an error.

use crate::clock::{Clock, SystemClock};
use crate::config::{DeskConfig, DEFAULT_ACTOR, DEFAULT_STORAGE_KEY};
use crate::kv::{KeyValueStore, KvError};
use crate::model::ticket::{
    ActivityEntry, Ticket, TicketDraft, TicketId, TicketPatch, ACTION_CREATED,
};
use crate::store::id::generate_ticket_id;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Write-path failure. Read paths never produce this.
#[derive(Debug)]
pub enum StoreError {
    Serialize(serde_json::Error),
    Kv(KvError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize ticket collection: {err}"),
            Self::Kv(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Kv(err) => Some(err),
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Sole authority over ticket persistence and identity.
pub struct TicketStore<K, C = SystemClock> {
    kv: K,
    clock: C,
    rng: StdRng,
    storage_key: String,
    default_actor: String,
}

impl<K: KeyValueStore> TicketStore<K, SystemClock> {
    /// Creates a store on the wall clock with the default storage key.
    pub fn new(kv: K) -> Self {
        Self::with_clock(kv, SystemClock)
    }
}

impl<K: KeyValueStore, C: Clock> TicketStore<K, C> {
    pub fn with_clock(kv: K, clock: C) -> Self {
        Self {
            kv,
            clock,
            rng: StdRng::from_entropy(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_actor: DEFAULT_ACTOR.to_string(),
        }
    }

    /// Creates a store using the storage key and actor from `config`.
    ///
    /// `config` is expected to have passed `DeskConfig::validate`.
    pub fn from_config(kv: K, clock: C, config: &DeskConfig) -> Self {
        let mut store = Self::with_clock(kv, clock);
        store.storage_key = config.storage_key.clone();
        store.default_actor = config.default_actor.clone();
        store
    }

    /// Replaces the entropy-seeded id suffix source with a deterministic one.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_kv(self) -> K {
        self.kv
    }

    /// Every decodable persisted ticket in storage order.
    pub fn all(&self) -> Vec<Ticket> {
        decode_tickets(&self.read_records(), &self.storage_key)
    }

    pub fn get(&self, id: &TicketId) -> Option<Ticket> {
        self.read_records()
            .iter()
            .filter_map(decode_record)
            .find(|ticket| &ticket.id == id)
    }

    /// Builds a new ticket from `draft` without persisting it.
    ///
    /// Title and description are trimmed; blankness is not re-checked here.
    /// Callers gate input with `TicketDraft::validate`.
    pub fn create(&mut self, draft: TicketDraft) -> Ticket {
        let now = self.clock.now_ms();
        let actor = if draft.requester.trim().is_empty() {
            self.default_actor.clone()
        } else {
            draft.requester.clone()
        };

        Ticket {
            id: generate_ticket_id(now, &mut self.rng),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category: draft.category,
            priority: draft.priority,
            status: draft.status,
            requester: draft.requester,
            created_at: now,
            updated_at: now,
            activity_log: vec![ActivityEntry {
                timestamp: now,
                action: ACTION_CREATED.to_string(),
                actor,
            }],
        }
    }

    /// Appends one ticket to the persisted collection.
    pub fn add(&mut self, ticket: Ticket) -> StoreResult<()> {
        let mut records = self.read_records();
        records.push(serde_json::to_value(&ticket)?);
        self.write_records(&records)?;
        info!(
            "event=ticket_add module=store status=ok id={} count={}",
            ticket.id,
            records.len()
        );
        Ok(())
    }

    /// Shallow-merges `patch` onto the ticket with `id` and stamps `updated_at`.
    ///
    /// Returns `Ok(false)` without writing when `id` is not stored.
    pub fn update(&mut self, id: &TicketId, patch: &TicketPatch) -> StoreResult<bool> {
        let mut records = self.read_records();
        let found = records.iter().enumerate().find_map(|(index, record)| {
            decode_record(record)
                .filter(|ticket| &ticket.id == id)
                .map(|ticket| (index, ticket))
        });
        let Some((index, current)) = found else {
            info!("event=ticket_update module=store status=skip reason=not_found id={id}");
            return Ok(false);
        };

        let mut merged = patch.apply_to(&current);
        merged.updated_at = next_stamp(self.clock.now_ms(), current.updated_at);
        records[index] = serde_json::to_value(&merged)?;

        self.write_records(&records)?;
        info!("event=ticket_update module=store status=ok id={id}");
        Ok(true)
    }

    /// Removes `id` from the collection. Unknown ids are a silent no-op.
    pub fn remove(&mut self, id: &TicketId) -> StoreResult<()> {
        let mut records = self.read_records();
        let before = records.len();
        records.retain(|record| record_id(record) != Some(id.as_str()));

        self.write_records(&records)?;
        info!(
            "event=ticket_remove module=store status=ok id={} removed={}",
            id,
            before - records.len()
        );
        Ok(())
    }

    /// Writes `samples` verbatim as the whole collection, only when the
    /// persisted array has no elements at all.
    ///
    /// Elements that do not decode as tickets still count as stored data.
    /// Returns whether the seed was written.
    pub fn seed_if_empty(&mut self, samples: Vec<Ticket>) -> StoreResult<bool> {
        let stored = self.read_records().len();
        if stored > 0 {
            info!("event=store_seed module=store status=skip reason=not_empty stored={stored}");
            return Ok(false);
        }
        if samples.is_empty() {
            info!("event=store_seed module=store status=skip reason=no_samples");
            return Ok(false);
        }

        let records = samples
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.write_records(&records)?;
        info!(
            "event=store_seed module=store status=ok count={}",
            records.len()
        );
        Ok(true)
    }

    /// Raw elements of the persisted array.
    ///
    /// A missing, blank, non-JSON or non-array blob reads as no elements. Array
    /// elements are returned whether or not they decode as tickets, so writes
    /// carry them forward untouched.
    fn read_records(&self) -> Vec<Value> {
        let raw = match self.kv.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error error_code=kv_read_failed key={} error={}",
                    self.storage_key, err
                );
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!(
                    "event=store_read module=store status=error error_code=not_an_array key={}",
                    self.storage_key
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=store_read module=store status=error error_code=malformed_blob key={} error={}",
                    self.storage_key, err
                );
                Vec::new()
            }
        }
    }

    fn write_records(&mut self, records: &[Value]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        if let Err(err) = self.kv.set(&self.storage_key, &raw) {
            warn!(
                "event=store_write module=store status=error key={} error={}",
                self.storage_key, err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

/// `updated_at` for a write at `now` over a record last stamped `previous`.
///
/// Strictly greater than `previous` even when the clock stalls or steps back.
pub(crate) fn next_stamp(now: i64, previous: i64) -> i64 {
    now.max(previous.saturating_add(1))
}

fn decode_record(record: &Value) -> Option<Ticket> {
    Ticket::deserialize(record).ok()
}

fn decode_tickets(records: &[Value], key: &str) -> Vec<Ticket> {
    let tickets: Vec<Ticket> = records.iter().filter_map(decode_record).collect();
    let skipped = records.len() - tickets.len();
    if skipped > 0 {
        warn!(
            "event=store_read module=store status=skip reason=undecodable_records key={key} skipped={skipped}"
        );
    }
    tickets
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::TicketStore;
    use crate::clock::ManualClock;
    use crate::kv::{KeyValueStore, MemoryKv};
    use crate::model::ticket::{Priority, Status, TicketDraft, TicketId, TicketPatch};

    fn store_at(now: i64) -> (TicketStore<MemoryKv, ManualClock>, ManualClock) {
        let clock = ManualClock::new(now);
        let store = TicketStore::with_clock(MemoryKv::new(), clock.clone()).with_rng_seed(1);
        (store, clock)
    }

    #[test]
    fn create_trims_text_and_applies_defaults_without_persisting() {
        let (mut store, _) = store_at(1_000);
        let ticket = store.create(TicketDraft::new("  Printer jam ", " Error 0x09\n"));

        assert_eq!(ticket.title, "Printer jam");
        assert_eq!(ticket.description, "Error 0x09");
        assert_eq!(ticket.category, "Other");
        assert_eq!(ticket.priority, Priority::Medium);
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.created_at, 1_000);
        assert_eq!(ticket.updated_at, 1_000);
        assert_eq!(ticket.activity_log.len(), 1);
        assert_eq!(ticket.activity_log[0].actor, "system");
        assert!(store.all().is_empty());
    }

    #[test]
    fn create_records_requester_as_actor() {
        let (mut store, _) = store_at(1_000);
        let ticket = store.create(TicketDraft::new("t", "d").with_requester("Joana"));
        assert_eq!(ticket.activity_log[0].actor, "Joana");
        assert_eq!(ticket.activity_log[0].action, "CREATED");
    }

    #[test]
    fn update_stamps_strictly_increasing_time_within_one_millisecond() {
        let (mut store, _) = store_at(5_000);
        let ticket = store.create(TicketDraft::new("t", "d"));
        store.add(ticket.clone()).expect("add");

        assert!(store
            .update(&ticket.id, &TicketPatch::status(Status::Closed))
            .expect("first update"));
        assert!(store
            .update(&ticket.id, &TicketPatch::status(Status::Open))
            .expect("second update"));

        let loaded = store.get(&ticket.id).expect("ticket exists");
        assert_eq!(loaded.updated_at, 5_002);
        assert_eq!(loaded.created_at, 5_000);
    }

    #[test]
    fn update_uses_clock_when_it_moved_forward() {
        let (mut store, clock) = store_at(5_000);
        let ticket = store.create(TicketDraft::new("t", "d"));
        store.add(ticket.clone()).expect("add");

        clock.advance(250);
        store
            .update(&ticket.id, &TicketPatch::priority(Priority::Low))
            .expect("update");
        assert_eq!(store.get(&ticket.id).expect("exists").updated_at, 5_250);
    }

    #[test]
    fn update_missing_id_does_not_write() {
        let (mut store, _) = store_at(1);
        let updated = store
            .update(&TicketId::new("tkt_missing_0"), &TicketPatch::default())
            .expect("update");
        assert!(!updated);
        assert_eq!(store.kv().raw("tickets.v1"), None);
    }

    #[test]
    fn blank_blob_reads_as_empty() {
        let store = TicketStore::new(MemoryKv::with_entry("tickets.v1", "   "));
        assert!(store.all().is_empty());
    }

    #[test]
    fn seed_with_no_samples_leaves_storage_untouched() {
        let (mut store, _) = store_at(1);
        assert!(!store.seed_if_empty(Vec::new()).expect("seed"));
        assert_eq!(store.kv().get("tickets.v1").expect("get"), None);
    }
}
