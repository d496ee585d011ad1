use crate::config::settings::SlackConfig;
use crate::models::event::{TicketAction, TicketEvent};

/// Icon shown in front of a message, keyed by action name.
fn emoji_for(action: &str) -> &'static str {
    match action {
        "closed" => "heavy_check_mark",
        "created" => "pushpin",
        "changed" => "pencil2",
        "assigned" => "point_right",
        "needsintegrating" => "arrow_heading_down",
        "needstesting" => "passport_control",
        "reopened" => "arrows_counterclockwise",
        "testing" => "customs",
        _ => "incoming_envelope",
    }
}

/// Drops a trailing ` <...>` annotation, e.g. an email suffix in
/// `Jane <jane@example.com>`.
fn strip_annotation(author: &str) -> &str {
    match author.find(" <") {
        Some(idx) => &author[..idx],
        None => author,
    }
}

/// Slack-style link, or the bare label when the event has no URL.
fn ticket_link(url: &str, label: &str) -> String {
    if url.is_empty() {
        label.to_string()
    } else {
        format!("<{}|{}>", url, label)
    }
}

/// Renders one event as message text. Pure; delivery is the notifier's job.
pub fn build_message(event: &TicketEvent, config: &SlackConfig) -> String {
    let author = strip_annotation(&event.author);

    let mut message = format!(":{}: ", emoji_for(event.action.name()));

    if event.action == TicketAction::Created {
        let label = format!("{} {}", event.id, event.summary);
        message.push_str(&ticket_link(&event.url, label.trim_end()));
        message.push_str(" created by @");
        message.push_str(author);
        push_attributes(&mut message, event, config);
    } else {
        if !event.owner.is_empty() {
            message.push_str(&event.owner);
            message.push_str("\u{2019}s ");
        }
        if !event.status.is_empty() {
            message.push_str(&event.status);
            message.push(' ');
        }
        message.push_str(&ticket_link(&event.url, &event.id));
        message.push(' ');
        message.push_str(event.action.name());
        message.push_str(" by @");
        message.push_str(author);
        if !event.comment.is_empty() {
            message.push_str(": ");
            message.push_str(&event.comment);
        }
        push_changes(&mut message, event, config);
    }

    message
}

/// `  * field: value` bullets for each configured field the ticket carries.
fn push_attributes(message: &mut String, event: &TicketEvent, config: &SlackConfig) {
    for field in &config.fields {
        if let Some(value) = event.attributes.get(field) {
            if !value.is_empty() {
                message.push_str(&format!("\n  * {}: {}", field, value));
            }
        }
    }
}

/// `  * field: old => new` bullets for each configured field that changed.
fn push_changes(message: &mut String, event: &TicketEvent, config: &SlackConfig) {
    for field in &config.fields {
        if let Some(change) = event.changes.get(field) {
            message.push_str(&format!("\n  * {}: {} => {}", field, change.from, change.to));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::FieldChange;
    use std::collections::HashMap;

    fn base_event(action: TicketAction) -> TicketEvent {
        TicketEvent {
            id: "#42".to_string(),
            url: String::new(),
            action,
            author: "Jane <j@x.com>".to_string(),
            owner: String::new(),
            status: "closed".to_string(),
            summary: "Fix the build".to_string(),
            comment: String::new(),
            attributes: HashMap::new(),
            changes: HashMap::new(),
        }
    }

    fn no_fields() -> SlackConfig {
        SlackConfig {
            fields: Vec::new(),
            ..SlackConfig::default()
        }
    }

    #[test]
    fn test_closed_ticket_message() {
        let event = base_event(TicketAction::MovedTo("closed".to_string()));
        let message = build_message(&event, &no_fields());

        assert_eq!(message, ":heavy_check_mark: closed #42 closed by @Jane");
    }

    #[test]
    fn test_created_message_contains_author() {
        let mut event = base_event(TicketAction::Created);
        event.url = "https://trac.example.com/ticket/42".to_string();
        let message = build_message(&event, &no_fields());

        assert_eq!(
            message,
            ":pushpin: <https://trac.example.com/ticket/42|#42 Fix the build> created by @Jane"
        );
        assert!(message.contains("created by @Jane"));
    }

    #[test]
    fn test_created_without_url_uses_bare_label() {
        let event = base_event(TicketAction::Created);
        let message = build_message(&event, &no_fields());

        assert_eq!(message, ":pushpin: #42 Fix the build created by @Jane");
    }

    #[test]
    fn test_owner_clause() {
        let mut event = base_event(TicketAction::Changed);
        event.owner = "dev1".to_string();
        event.status = String::new();
        let message = build_message(&event, &no_fields());

        assert_eq!(message, ":pencil2: dev1\u{2019}s #42 changed by @Jane");
    }

    #[test]
    fn test_comment_clause() {
        let mut event = base_event(TicketAction::Changed);
        event.status = String::new();
        event.comment = "Fixed in r1234.".to_string();
        let message = build_message(&event, &no_fields());

        assert_eq!(message, ":pencil2: #42 changed by @Jane: Fixed in r1234.");
    }

    #[test]
    fn test_change_with_link_wraps_id_only() {
        let mut event = base_event(TicketAction::Changed);
        event.url = "https://trac.example.com/ticket/42".to_string();
        event.status = String::new();
        let message = build_message(&event, &no_fields());

        assert_eq!(
            message,
            ":pencil2: <https://trac.example.com/ticket/42|#42> changed by @Jane"
        );
    }

    #[test]
    fn test_unmapped_action_gets_default_emoji() {
        let event = base_event(TicketAction::MovedTo("triaged".to_string()));
        let message = build_message(&event, &no_fields());

        assert!(message.starts_with(":incoming_envelope: "));
    }

    #[test]
    fn test_deleted_action_name() {
        let mut event = base_event(TicketAction::Deleted);
        event.status = String::new();
        let message = build_message(&event, &no_fields());

        assert_eq!(message, ":incoming_envelope: #42 deleted by @Jane");
    }

    #[test]
    fn test_attribute_bullets_skip_absent_and_empty_fields() {
        let mut event = base_event(TicketAction::Created);
        event.attributes = [
            ("type".to_string(), "defect".to_string()),
            ("component".to_string(), String::new()),
        ]
        .into_iter()
        .collect();

        let message = build_message(&event, &SlackConfig::default());

        assert!(message.contains("\n  * type: defect"));
        assert!(!message.contains("component"));
        assert!(!message.contains("resolution"));
    }

    #[test]
    fn test_change_bullets_follow_configured_order() {
        let mut event = base_event(TicketAction::Changed);
        event.status = String::new();
        event.changes = [
            (
                "resolution".to_string(),
                FieldChange {
                    from: String::new(),
                    to: "fixed".to_string(),
                },
            ),
            (
                "component".to_string(),
                FieldChange {
                    from: "web".to_string(),
                    to: "db".to_string(),
                },
            ),
            (
                "priority".to_string(),
                FieldChange {
                    from: "low".to_string(),
                    to: "high".to_string(),
                },
            ),
        ]
        .into_iter()
        .collect();

        let message = build_message(&event, &SlackConfig::default());

        assert_eq!(
            message,
            ":pencil2: #42 changed by @Jane\n  * component: web => db\n  * resolution:  => fixed"
        );
    }

    #[test]
    fn test_strip_annotation() {
        assert_eq!(strip_annotation("Jane <jane@x.com>"), "Jane");
        assert_eq!(strip_annotation("Jane"), "Jane");
        assert_eq!(strip_annotation("Jane Doe <j@x.com>"), "Jane Doe");
    }

    #[test]
    fn test_message_is_never_empty() {
        let mut event = base_event(TicketAction::Changed);
        event.id = String::new();
        event.author = String::new();
        event.status = String::new();
        let message = build_message(&event, &no_fields());

        assert!(!message.is_empty());
    }
}
