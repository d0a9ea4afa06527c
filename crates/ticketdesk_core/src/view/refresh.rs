//! Mutation-to-refresh dispatch table.
//!
//! Every user action that can change what a panel shows maps to exactly one
//! `RefreshPlan`. The coordinator executes plans; it never decides refreshes
//! on its own.

use crate::view::panel::Panel;

/// User action that requires views to be recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// A ticket was created from the Create panel.
    Created,
    /// A row's status was changed by the List panel's inline control.
    StatusChangedInline,
    /// A row was deleted from the List panel.
    DeletedFromList,
    /// The focused ticket was deleted from the Detail panel.
    DeletedFromDetail,
    /// Status or priority of the focused ticket was saved from Detail.
    UpdatedFromDetail,
    /// A row was opened in the Detail panel.
    Opened,
}

impl Mutation {
    pub const ALL: [Mutation; 6] = [
        Mutation::Created,
        Mutation::StatusChangedInline,
        Mutation::DeletedFromList,
        Mutation::DeletedFromDetail,
        Mutation::UpdatedFromDetail,
        Mutation::Opened,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChangedInline => "status_changed_inline",
            Self::DeletedFromList => "deleted_from_list",
            Self::DeletedFromDetail => "deleted_from_detail",
            Self::UpdatedFromDetail => "updated_from_detail",
            Self::Opened => "opened",
        }
    }
}

/// Set of views to recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSet {
    pub home: bool,
    pub list: bool,
    pub detail: bool,
}

impl RefreshSet {
    pub const NONE: RefreshSet = RefreshSet {
        home: false,
        list: false,
        detail: false,
    };

    pub fn union(self, other: RefreshSet) -> RefreshSet {
        RefreshSet {
            home: self.home || other.home,
            list: self.list || other.list,
            detail: self.detail || other.detail,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// Views recomputed when `panel` becomes active.
    pub fn for_panel(panel: Panel) -> RefreshSet {
        match panel {
            Panel::Home => RefreshSet {
                home: true,
                ..Self::NONE
            },
            Panel::List => RefreshSet {
                list: true,
                ..Self::NONE
            },
            Panel::Detail => RefreshSet {
                detail: true,
                ..Self::NONE
            },
            Panel::Create => Self::NONE,
        }
    }
}

/// What a mutation does to the detail focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEffect {
    Keep,
    /// Focus the ticket the action targeted.
    Set,
    /// Clear the focus unconditionally.
    Clear,
    /// Clear the focus only when it points at the targeted ticket.
    ClearIfTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPlan {
    pub refresh: RefreshSet,
    pub focus: FocusEffect,
    /// Panel to switch to after the refreshes run.
    pub switch_to: Option<Panel>,
}

/// Returns the required refreshes for `mutation`.
///
/// An inline status change recomputes the List too, so a row that no longer
/// matches the status filter drops out instead of showing a stale value.
/// A cleared focus always re-renders Detail as the placeholder, which the
/// coordinator adds when the focus actually changes.
pub fn refresh_plan(mutation: Mutation) -> RefreshPlan {
    let (home, list, detail, focus, switch_to) = match mutation {
        Mutation::Created => (false, true, false, FocusEffect::Keep, Some(Panel::List)),
        Mutation::StatusChangedInline => (true, true, false, FocusEffect::Keep, None),
        Mutation::DeletedFromList => (true, true, false, FocusEffect::ClearIfTarget, None),
        Mutation::DeletedFromDetail => (true, true, false, FocusEffect::Clear, Some(Panel::List)),
        Mutation::UpdatedFromDetail => (true, true, true, FocusEffect::Keep, None),
        Mutation::Opened => (false, false, true, FocusEffect::Set, Some(Panel::Detail)),
    };

    RefreshPlan {
        refresh: RefreshSet { home, list, detail },
        focus,
        switch_to,
    }
}
