//! Ticket domain model.
//!
//! # Responsibility
//! - Define the canonical support-request record persisted by the store.
//! - Provide the draft (creation input) and patch (shallow merge) shapes.
//! - Validate required text fields before they reach the store.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at >= created_at`.
//! - `activity_log` is append-only; a patch replaces it wholesale.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category assigned when the caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Activity action recorded by the store factory.
pub const ACTION_CREATED: &str = "CREATED";
/// Activity action recorded when a status change goes through the coordinator.
pub const ACTION_STATUS_CHANGED: &str = "STATUS_CHANGED";
/// Activity action recorded when a priority change goes through the coordinator.
pub const ACTION_PRIORITY_CHANGED: &str = "PRIORITY_CHANGED";

/// Opaque, immutable ticket identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wraps an existing identifier, e.g. one read back from persisted data.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short code shown in tables: the timestamp segment of `tkt_<ts>_<rand>`.
    ///
    /// Identifiers that do not follow the generated shape are returned whole.
    pub fn display_code(&self) -> &str {
        let mut parts = self.0.split('_');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(code), Some(_)) if !code.is_empty() => code,
            _ => &self.0,
        }
    }
}

impl Display for TicketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ticket urgency. Ordered by rank, so `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Ranking used by the priority sort: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parses a user-supplied priority, ignoring case and surrounding space.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket lifecycle state. Transitions between any two values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    /// Parses a user-supplied status. Accepts `in progress`, `in-progress`
    /// and `in_progress` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "open" => Some(Self::Open),
            "in progress" => Some(Self::InProgress),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit record on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub action: String,
    pub actor: String,
}

/// Canonical persisted support request.
///
/// Serialized with camelCase keys (`createdAt`, `updatedAt`, `activityLog`)
/// to match the blob layout kept under the storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub requester: String,
    /// Unix epoch milliseconds, set once by the store factory.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by every successful update.
    pub updated_at: i64,
    /// Missing in records written by the minimal variant.
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
}

/// Creation input for `TicketStore::create`.
///
/// `validate` is the caller-side gate for required fields; the store factory
/// trusts its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    pub requester: String,
}

impl TicketDraft {
    /// Creates a draft with default category, priority, status and an empty
    /// requester.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: DEFAULT_CATEGORY.to_string(),
            priority: Priority::default(),
            status: Status::default(),
            requester: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = requester.into();
        self
    }

    /// Rejects drafts whose title or description is blank after trimming.
    pub fn validate(&self) -> Result<(), TicketValidationError> {
        if self.title.trim().is_empty() {
            return Err(TicketValidationError::BlankTitle);
        }
        if self.description.trim().is_empty() {
            return Err(TicketValidationError::BlankDescription);
        }
        Ok(())
    }
}

/// Required-field violations detected before a draft reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketValidationError {
    BlankTitle,
    BlankDescription,
}

impl Display for TicketValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "ticket title must not be blank"),
            Self::BlankDescription => write!(f, "ticket description must not be blank"),
        }
    }
}

impl Error for TicketValidationError {}

/// Shallow-merge update for `TicketStore::update`.
///
/// `Some` fields overwrite the stored value; `None` fields are left untouched.
/// `activity_log` is replaced wholesale when present. `id` and `created_at`
/// are not patchable, and `updated_at` is always stamped by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub requester: Option<String>,
    pub activity_log: Option<Vec<ActivityEntry>>,
}

impl TicketPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a merged copy of `ticket`; the input record is not touched.
    pub fn apply_to(&self, ticket: &Ticket) -> Ticket {
        Ticket {
            id: ticket.id.clone(),
            title: pick(&self.title, &ticket.title),
            description: pick(&self.description, &ticket.description),
            category: pick(&self.category, &ticket.category),
            priority: self.priority.unwrap_or(ticket.priority),
            status: self.status.unwrap_or(ticket.status),
            requester: pick(&self.requester, &ticket.requester),
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            activity_log: pick(&self.activity_log, &ticket.activity_log),
        }
    }
}

fn pick<T: Clone>(patched: &Option<T>, current: &T) -> T {
    patched.as_ref().unwrap_or(current).clone()
}
