use std::collections::HashMap;

use super::ticket::Ticket;

/// Maximum comment length in a message, truncation marker included.
pub const COMMENT_LIMIT: usize = 100;

const TRUNCATION_MARKER: &str = " _etc._";

/// Semantic category of a ticket event. Status transitions carry the target
/// status and are named after it, so "closed" rather than "moved to closed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketAction {
    Created,
    Changed,
    MovedTo(String),
    Deleted,
}

impl TicketAction {
    /// Short name used in message text and for the emoji lookup.
    pub fn name(&self) -> &str {
        match self {
            TicketAction::Created => "created",
            TicketAction::Changed => "changed",
            TicketAction::MovedTo(status) => status,
            TicketAction::Deleted => "deleted",
        }
    }
}

/// Old and new value of a single changed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub from: String,
    pub to: String,
}

/// Everything a message needs, lifted out of one tracker callback.
/// Built fresh per callback and discarded after the notification attempt.
#[derive(Debug, Clone)]
pub struct TicketEvent {
    pub id: String,
    pub url: String,
    pub action: TicketAction,
    pub author: String,
    pub owner: String,
    pub status: String,
    pub summary: String,
    /// First non-blank comment line, capped at [`COMMENT_LIMIT`] characters.
    /// Empty when the event carries no comment.
    pub comment: String,
    pub attributes: HashMap<String, String>,
    pub changes: HashMap<String, FieldChange>,
}

impl TicketEvent {
    pub fn created(ticket: &Ticket) -> Self {
        Self {
            id: format!("#{}", ticket.id),
            url: ticket.url.clone(),
            action: TicketAction::Created,
            author: ticket.field("reporter").to_string(),
            owner: ticket.field("owner").to_string(),
            status: ticket.field("status").to_string(),
            summary: ticket.field("summary").to_string(),
            comment: String::new(),
            attributes: ticket.fields.clone(),
            changes: HashMap::new(),
        }
    }

    pub fn changed(
        ticket: &Ticket,
        comment: &str,
        author: &str,
        old_values: &HashMap<String, String>,
    ) -> Self {
        // A snapshot without a "status" key counts as a plain change.
        let action = match old_values.get("status") {
            Some(old) if old != ticket.field("status") => {
                TicketAction::MovedTo(ticket.field("status").to_string())
            }
            _ => TicketAction::Changed,
        };

        let changes = old_values
            .iter()
            .map(|(field, old)| {
                (
                    field.clone(),
                    FieldChange {
                        from: old.clone(),
                        to: ticket.field(field).to_string(),
                    },
                )
            })
            .collect();

        Self {
            id: format!("#{}", ticket.id),
            url: ticket.url.clone(),
            action,
            author: author.to_string(),
            owner: ticket.field("owner").to_string(),
            status: ticket.field("status").to_string(),
            summary: ticket.field("summary").to_string(),
            comment: truncate(first_line(comment), COMMENT_LIMIT),
            attributes: ticket.fields.clone(),
            changes,
        }
    }
}

/// First non-blank line of a comment, trimmed.
fn first_line(comment: &str) -> &str {
    comment
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Caps `value` at `limit` characters; the marker fits inside the limit.
/// Counts characters, not bytes, so multibyte text never gets split.
pub fn truncate(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }

    let keep = limit.saturating_sub(TRUNCATION_MARKER.chars().count());
    let mut out: String = value.chars().take(keep).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
