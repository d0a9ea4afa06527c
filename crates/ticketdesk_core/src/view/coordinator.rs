//! View coordinator.
//!
//! # Responsibility
//! - Own the active panel and detail focus as explicit state.
//! - Route every mutating user action through the store, then execute the
//!   matching `RefreshPlan`.
//! - Hold the materialized Home, List and Detail views.
//!
//! # Invariants
//! - Panel changes only happen through `switch_panel` or a plan's
//!   `switch_to`; each transition recomputes the target panel's view.
//! - The detail focus is cleared whenever the focused ticket is deleted or
//!   stops resolving in the store.
//! - A declined confirmation performs no store call and no refresh.

use crate::clock::{Clock, SystemClock};
use crate::config::DeskConfig;
use crate::kv::KeyValueStore;
use crate::model::ticket::{
    ActivityEntry, Priority, Status, Ticket, TicketDraft, TicketId, TicketPatch,
    TicketValidationError, ACTION_PRIORITY_CHANGED, ACTION_STATUS_CHANGED,
};
use crate::store::seed::sample_tickets;
use crate::store::ticket_store::{next_stamp, StoreError, TicketStore};
use crate::view::confirm::{Confirm, DELETE_FROM_DETAIL_PROMPT, DELETE_FROM_LIST_PROMPT};
use crate::view::home::{summarize, HomeSummary};
use crate::view::list::{apply_list_query, ListQuery, SortMode};
use crate::view::panel::Panel;
use crate::view::refresh::{refresh_plan, FocusEffect, Mutation, RefreshSet};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

#[derive(Debug)]
pub enum CoordinatorError {
    /// Creation input failed the required-field gate; nothing was stored.
    Validation(TicketValidationError),
    Store(StoreError),
}

impl Display for CoordinatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoordinatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<TicketValidationError> for CoordinatorError {
    fn from(value: TicketValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CoordinatorError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Materialized Detail panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailView {
    /// No ticket selected, or the selected ticket no longer exists.
    #[default]
    Placeholder,
    Ticket(Ticket),
}

impl DetailView {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Self::Placeholder => None,
            Self::Ticket(ticket) => Some(ticket),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Keeps the three view surfaces consistent with the ticket store.
pub struct ViewCoordinator<K, C = SystemClock> {
    store: TicketStore<K, C>,
    recent_limit: usize,
    actor: String,
    seed_samples: bool,
    active: Panel,
    focus: Option<TicketId>,
    query: ListQuery,
    home: HomeSummary,
    list: Vec<Ticket>,
    detail: DetailView,
    last_refresh: RefreshSet,
}

impl<K: KeyValueStore, C: Clock> ViewCoordinator<K, C> {
    /// Wraps `store` with default config values. Views start empty until
    /// `bootstrap` or the first refresh.
    pub fn new(store: TicketStore<K, C>) -> Self {
        Self::with_config(store, &DeskConfig::default())
    }

    pub fn with_config(store: TicketStore<K, C>, config: &DeskConfig) -> Self {
        Self {
            store,
            recent_limit: config.recent_limit,
            actor: config.default_actor.clone(),
            seed_samples: config.seed_samples,
            active: Panel::Home,
            focus: None,
            query: ListQuery::default(),
            home: HomeSummary::default(),
            list: Vec::new(),
            detail: DetailView::Placeholder,
            last_refresh: RefreshSet::NONE,
        }
    }

    /// Seeds sample tickets into an empty store (when enabled) and renders
    /// Home and List.
    pub fn bootstrap(&mut self) -> CoordinatorResult<()> {
        if self.seed_samples {
            let samples = sample_tickets(&mut self.store);
            self.store.seed_if_empty(samples)?;
        }
        self.last_refresh = self.recompute(RefreshSet {
            home: true,
            list: true,
            detail: false,
        });
        Ok(())
    }

    /// Restores the initial state: Home panel, no focus, default list query.
    pub fn reset(&mut self) {
        self.active = Panel::Home;
        self.focus = None;
        self.query = ListQuery::default();
        self.detail = DetailView::Placeholder;
        self.last_refresh = self.recompute(RefreshSet {
            home: true,
            list: true,
            detail: false,
        });
        info!("event=coordinator_reset module=view status=ok");
    }

    pub fn store(&self) -> &TicketStore<K, C> {
        &self.store
    }

    pub fn into_store(self) -> TicketStore<K, C> {
        self.store
    }

    pub fn active_panel(&self) -> Panel {
        self.active
    }

    pub fn detail_focus(&self) -> Option<&TicketId> {
        self.focus.as_ref()
    }

    pub fn home(&self) -> &HomeSummary {
        &self.home
    }

    pub fn list(&self) -> &[Ticket] {
        &self.list
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    pub fn list_query(&self) -> &ListQuery {
        &self.query
    }

    /// Views recomputed by the most recent action.
    pub fn last_refresh(&self) -> RefreshSet {
        self.last_refresh
    }

    /// Makes `panel` active and recomputes its view.
    ///
    /// Requesting the already active panel is not a transition and does
    /// nothing.
    pub fn switch_panel(&mut self, panel: Panel) {
        self.last_refresh = self.transition(panel);
    }

    /// "Back to list" from the Detail panel.
    pub fn back_to_list(&mut self) {
        self.switch_panel(Panel::List);
    }

    /// Validates `draft`, stores the new ticket and shows the List.
    pub fn create_ticket(&mut self, draft: TicketDraft) -> CoordinatorResult<Ticket> {
        draft.validate()?;
        let ticket = self.store.create(draft);
        self.store.add(ticket.clone())?;
        self.run_plan(Mutation::Created, &ticket.id);
        Ok(ticket)
    }

    /// Inline status control on a List row.
    ///
    /// Returns `false` when the ticket no longer exists.
    pub fn change_status_inline(&mut self, id: &TicketId, status: Status) -> CoordinatorResult<bool> {
        let updated = self.update_status(id, status)?;
        self.run_plan(Mutation::StatusChangedInline, id);
        Ok(updated)
    }

    /// Deletes a List row after confirmation. Returns whether it was deleted.
    pub fn delete_from_list(
        &mut self,
        id: &TicketId,
        confirm: &mut impl Confirm,
    ) -> CoordinatorResult<bool> {
        if !confirm.confirm(DELETE_FROM_LIST_PROMPT) {
            debug!("event=ticket_delete module=view status=skip reason=declined id={id}");
            return Ok(false);
        }
        self.store.remove(id)?;
        self.run_plan(Mutation::DeletedFromList, id);
        Ok(true)
    }

    /// Deletes the focused ticket after confirmation and returns to the List.
    ///
    /// Without a focus this is a no-op returning `false`.
    pub fn delete_from_detail(&mut self, confirm: &mut impl Confirm) -> CoordinatorResult<bool> {
        let Some(id) = self.focus.clone() else {
            return Ok(false);
        };
        if !confirm.confirm(DELETE_FROM_DETAIL_PROMPT) {
            debug!("event=ticket_delete module=view status=skip reason=declined id={id}");
            return Ok(false);
        }
        self.store.remove(&id)?;
        self.run_plan(Mutation::DeletedFromDetail, &id);
        Ok(true)
    }

    /// Saves a new status for the focused ticket.
    ///
    /// Without a focus this is a no-op returning `false`.
    pub fn update_detail_status(&mut self, status: Status) -> CoordinatorResult<bool> {
        let Some(id) = self.focus.clone() else {
            return Ok(false);
        };
        let updated = self.update_status(&id, status)?;
        self.run_plan(Mutation::UpdatedFromDetail, &id);
        Ok(updated)
    }

    /// Saves a new priority for the focused ticket.
    ///
    /// Without a focus this is a no-op returning `false`.
    pub fn update_detail_priority(&mut self, priority: Priority) -> CoordinatorResult<bool> {
        let Some(id) = self.focus.clone() else {
            return Ok(false);
        };
        let updated = match self.store.get(&id) {
            Some(current) => {
                let patch = TicketPatch {
                    priority: Some(priority),
                    activity_log: Some(self.logged(&current, ACTION_PRIORITY_CHANGED)),
                    ..TicketPatch::default()
                };
                self.store.update(&id, &patch)?
            }
            None => false,
        };
        self.run_plan(Mutation::UpdatedFromDetail, &id);
        Ok(updated)
    }

    /// Focuses `id` and shows it in the Detail panel.
    pub fn open_ticket(&mut self, id: &TicketId) {
        self.run_plan(Mutation::Opened, id);
    }

    /// Drops the detail focus and renders the placeholder.
    pub fn clear_detail_focus(&mut self) {
        self.focus = None;
        self.last_refresh = self.recompute(RefreshSet::for_panel(Panel::Detail));
        debug!("event=detail_focus_clear module=view status=ok");
    }

    pub fn set_status_filter(&mut self, status: Option<Status>) {
        self.query.status = status;
        self.refresh_list();
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.query.priority = priority;
        self.refresh_list();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.refresh_list();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.query.sort = sort;
        self.refresh_list();
    }

    pub fn toggle_sort(&mut self) {
        self.query.sort = self.query.sort.toggled();
        self.refresh_list();
    }

    fn refresh_list(&mut self) {
        self.last_refresh = self.recompute(RefreshSet::for_panel(Panel::List));
    }

    fn update_status(&mut self, id: &TicketId, status: Status) -> CoordinatorResult<bool> {
        let Some(current) = self.store.get(id) else {
            return Ok(false);
        };
        let patch = TicketPatch {
            status: Some(status),
            activity_log: Some(self.logged(&current, ACTION_STATUS_CHANGED)),
            ..TicketPatch::default()
        };
        Ok(self.store.update(id, &patch)?)
    }

    /// `current`'s log plus one entry stamped the way the store will stamp
    /// `updated_at` for the same write.
    fn logged(&self, current: &Ticket, action: &str) -> Vec<ActivityEntry> {
        let mut log = current.activity_log.clone();
        log.push(ActivityEntry {
            timestamp: next_stamp(self.store.clock().now_ms(), current.updated_at),
            action: action.to_string(),
            actor: self.actor.clone(),
        });
        log
    }

    fn run_plan(&mut self, mutation: Mutation, target: &TicketId) {
        let plan = refresh_plan(mutation);
        let mut refresh = plan.refresh;

        let focus_cleared = match plan.focus {
            FocusEffect::Keep => false,
            FocusEffect::Set => {
                self.focus = Some(target.clone());
                false
            }
            FocusEffect::Clear => self.focus.take().is_some(),
            FocusEffect::ClearIfTarget => {
                if self.focus.as_ref() == Some(target) {
                    self.focus = None;
                    true
                } else {
                    false
                }
            }
        };
        if focus_cleared {
            refresh.detail = true;
        }

        let mut applied = self.recompute(refresh);
        if let Some(panel) = plan.switch_to {
            applied = applied.union(self.transition(panel));
        }
        self.last_refresh = applied;

        info!(
            "event=mutation_refresh module=view status=ok mutation={} home={} list={} detail={} panel={}",
            mutation.as_str(),
            applied.home,
            applied.list,
            applied.detail,
            self.active
        );
    }

    fn transition(&mut self, panel: Panel) -> RefreshSet {
        if panel == self.active {
            return RefreshSet::NONE;
        }
        debug!(
            "event=panel_switch module=view status=ok from={} to={}",
            self.active, panel
        );
        self.active = panel;
        self.recompute(RefreshSet::for_panel(panel))
    }

    fn recompute(&mut self, refresh: RefreshSet) -> RefreshSet {
        if refresh.is_empty() {
            return refresh;
        }

        let snapshot = self.store.all();
        if refresh.home {
            self.home = summarize(&snapshot, self.recent_limit);
        }
        if refresh.list {
            self.list = apply_list_query(&snapshot, &self.query);
        }
        if refresh.detail {
            let focused = self
                .focus
                .as_ref()
                .and_then(|id| snapshot.iter().find(|ticket| &ticket.id == id).cloned());
            if focused.is_none() {
                self.focus = None;
            }
            self.detail = focused.map_or(DetailView::Placeholder, DetailView::Ticket);
        }
        refresh
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailView, ViewCoordinator};
    use crate::clock::ManualClock;
    use crate::kv::MemoryKv;
    use crate::model::ticket::{Status, TicketDraft, TicketId};
    use crate::store::ticket_store::TicketStore;
    use crate::view::panel::Panel;
    use crate::view::refresh::RefreshSet;

    fn coordinator() -> ViewCoordinator<MemoryKv, ManualClock> {
        let store =
            TicketStore::with_clock(MemoryKv::new(), ManualClock::new(1_000)).with_rng_seed(3);
        ViewCoordinator::new(store)
    }

    #[test]
    fn initial_state_is_home_without_focus() {
        let coordinator = coordinator();
        assert_eq!(coordinator.active_panel(), Panel::Home);
        assert!(coordinator.detail_focus().is_none());
        assert!(coordinator.detail().is_placeholder());
        assert_eq!(coordinator.last_refresh(), RefreshSet::NONE);
    }

    #[test]
    fn switching_to_same_panel_is_not_a_transition() {
        let mut coordinator = coordinator();
        coordinator.switch_panel(Panel::Home);
        assert!(coordinator.last_refresh().is_empty());

        coordinator.switch_panel(Panel::Create);
        assert_eq!(coordinator.active_panel(), Panel::Create);
        assert!(coordinator.last_refresh().is_empty());

        coordinator.switch_panel(Panel::Home);
        assert!(coordinator.last_refresh().home);
    }

    #[test]
    fn declined_confirmation_changes_nothing() {
        let mut coordinator = coordinator();
        let ticket = coordinator
            .create_ticket(TicketDraft::new("t", "d"))
            .expect("create");
        let before = coordinator.last_refresh();

        let deleted = coordinator
            .delete_from_list(&ticket.id, &mut |_: &str| false)
            .expect("delete");
        assert!(!deleted);
        assert_eq!(coordinator.store().all().len(), 1);
        assert_eq!(coordinator.last_refresh(), before);
    }

    #[test]
    fn detail_actions_without_focus_are_no_ops() {
        let mut coordinator = coordinator();
        assert!(!coordinator
            .update_detail_status(Status::Closed)
            .expect("status"));
        assert!(!coordinator
            .delete_from_detail(&mut |_: &str| true)
            .expect("delete"));
        assert_eq!(coordinator.active_panel(), Panel::Home);
    }

    #[test]
    fn opening_unknown_ticket_shows_placeholder_and_drops_focus() {
        let mut coordinator = coordinator();
        coordinator.open_ticket(&TicketId::new("tkt_gone_1"));
        assert_eq!(coordinator.active_panel(), Panel::Detail);
        assert_eq!(coordinator.detail(), &DetailView::Placeholder);
        assert!(coordinator.detail_focus().is_none());
    }
}
