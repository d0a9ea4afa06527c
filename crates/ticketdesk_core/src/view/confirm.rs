//! Synchronous yes/no gate in front of destructive actions.

/// Prompt shown before deleting a row from the List panel.
pub const DELETE_FROM_LIST_PROMPT: &str = "Delete this ticket permanently?";
/// Prompt shown before deleting the ticket open in the Detail panel.
pub const DELETE_FROM_DETAIL_PROMPT: &str = "Delete this ticket?";

/// Answers a confirmation prompt. `false` blocks the action entirely.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
