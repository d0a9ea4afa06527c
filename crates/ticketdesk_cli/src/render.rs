//! Plain-text rendering of the materialized views.

use std::io::{self, Write};
use ticketdesk_core::{DetailView, HomeSummary, Status, Ticket};

pub fn home(out: &mut impl Write, summary: &HomeSummary) -> io::Result<()> {
    for status in Status::ALL {
        writeln!(out, "{:<12} {}", status.as_str(), summary.count(status))?;
    }
    writeln!(out)?;
    if summary.recent.is_empty() {
        return writeln!(out, "No tickets yet.");
    }
    writeln!(out, "Recent tickets:")?;
    for ticket in &summary.recent {
        row(out, ticket)?;
    }
    Ok(())
}

pub fn list(out: &mut impl Write, tickets: &[Ticket]) -> io::Result<()> {
    if tickets.is_empty() {
        return writeln!(out, "No tickets match the current filters.");
    }
    writeln!(
        out,
        "{:<10} {:<32} {:<10} {:<8} {:<12}",
        "CODE", "TITLE", "CATEGORY", "PRIORITY", "STATUS"
    )?;
    for ticket in tickets {
        row(out, ticket)?;
    }
    Ok(())
}

pub fn detail(out: &mut impl Write, view: &DetailView) -> io::Result<()> {
    let Some(ticket) = view.ticket() else {
        return writeln!(out, "Select a ticket to see its details.");
    };
    writeln!(out, "{} ({})", ticket.title, ticket.id)?;
    writeln!(out, "  status:    {}", ticket.status)?;
    writeln!(out, "  priority:  {}", ticket.priority)?;
    writeln!(out, "  category:  {}", ticket.category)?;
    if !ticket.requester.is_empty() {
        writeln!(out, "  requester: {}", ticket.requester)?;
    }
    writeln!(out, "  created:   {}", ticket.created_at)?;
    writeln!(out, "  updated:   {}", ticket.updated_at)?;
    writeln!(out)?;
    writeln!(out, "{}", ticket.description)?;
    if !ticket.activity_log.is_empty() {
        writeln!(out)?;
        writeln!(out, "Activity:")?;
        for entry in &ticket.activity_log {
            writeln!(out, "  {} {} by {}", entry.timestamp, entry.action, entry.actor)?;
        }
    }
    Ok(())
}

fn row(out: &mut impl Write, ticket: &Ticket) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:<32} {:<10} {:<8} {:<12}",
        ticket.id.display_code(),
        truncate(&ticket.title, 32),
        ticket.category,
        ticket.priority.as_str(),
        ticket.status.as_str()
    )
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut cut = value.chars().take(max_chars.saturating_sub(3)).collect::<String>();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{detail, home, truncate};
    use ticketdesk_core::{DetailView, HomeSummary};

    #[test]
    fn truncate_caps_long_titles() {
        assert_eq!(truncate("short", 32), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("abcdefghij", 2), "...");
    }

    #[test]
    fn empty_home_lists_zero_counts() {
        let mut out = Vec::new();
        home(&mut out, &HomeSummary::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("In Progress"));
        assert!(text.contains("No tickets yet."));
    }

    #[test]
    fn placeholder_detail_prompts_for_selection() {
        let mut out = Vec::new();
        detail(&mut out, &DetailView::Placeholder).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Select a ticket"));
    }
}
