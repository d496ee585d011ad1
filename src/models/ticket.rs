use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a ticket as handed over by the tracker. Field names are
/// tracker-defined; anything the tracker doesn't set simply isn't present.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Ticket {
    pub id: u64,
    /// Absolute URL of the ticket, empty when the tracker has none.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl Ticket {
    /// Field value, or `""` when the field is absent.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// One tracker callback, as serialized on the command line.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketCallback {
    Created {
        ticket: Ticket,
    },
    Changed {
        ticket: Ticket,
        #[serde(default)]
        comment: String,
        #[serde(default)]
        author: String,
        /// Prior values of the fields that changed.
        #[serde(default)]
        old_values: HashMap<String, String>,
    },
    Deleted {
        ticket: Ticket,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created_callback() {
        let raw = r#"{
            "kind": "created",
            "ticket": {
                "id": 123,
                "url": "https://trac.example.com/ticket/123",
                "fields": {"summary": "Fix the build", "reporter": "alice"}
            }
        }"#;

        let callback: TicketCallback = serde_json::from_str(raw).unwrap();
        match callback {
            TicketCallback::Created { ticket } => {
                assert_eq!(ticket.id, 123);
                assert_eq!(ticket.field("summary"), "Fix the build");
                assert_eq!(ticket.field("milestone"), "");
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_parse_changed_callback_defaults() {
        let raw = r#"{"kind": "changed", "ticket": {"id": 7}}"#;

        let callback: TicketCallback = serde_json::from_str(raw).unwrap();
        match callback {
            TicketCallback::Changed {
                ticket,
                comment,
                author,
                old_values,
            } => {
                assert_eq!(ticket.id, 7);
                assert_eq!(ticket.url, "");
                assert!(comment.is_empty());
                assert!(author.is_empty());
                assert!(old_values.is_empty());
            }
            other => panic!("parsed as {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_kind_fails() {
        let raw = r#"{"kind": "renamed", "ticket": {"id": 1}}"#;
        assert!(serde_json::from_str::<TicketCallback>(raw).is_err());
    }
}
