pub mod message;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::api::webhook::WebhookClient;
use crate::config::settings::SlackConfig;
use crate::models::event::TicketEvent;
use crate::models::ticket::Ticket;

/// Callback interface a tracker drives on ticket lifecycle events. Delivery
/// problems stay on this side of the boundary; a failed notification must
/// never block a ticket operation.
#[async_trait]
pub trait TicketChangeListener: Send + Sync {
    async fn ticket_created(&self, ticket: &Ticket);

    async fn ticket_changed(
        &self,
        ticket: &Ticket,
        comment: &str,
        author: &str,
        old_values: &HashMap<String, String>,
    );

    async fn ticket_deleted(&self, ticket: &Ticket);
}

pub struct Notifier {
    config: SlackConfig,
    client: WebhookClient,
}

impl Notifier {
    pub fn new(config: SlackConfig) -> Self {
        let client = WebhookClient::new(config.webhook.clone());
        Self { config, client }
    }

    /// Sends `text` to the configured webhook under the configured channel
    /// and bot name.
    pub async fn deliver(&self, text: &str) -> crate::errors::Result<()> {
        self.client
            .post_message(&self.config.channel, &self.config.username, text)
            .await
    }

    /// Formats and delivers one event. Failures are logged and reported as
    /// `false`, not raised.
    pub async fn notify(&self, event: &TicketEvent) -> bool {
        let text = message::build_message(event, &self.config);
        match self.deliver(&text).await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("notification for {} failed: {}", event.id, err);
                false
            }
        }
    }
}

#[async_trait]
impl TicketChangeListener for Notifier {
    async fn ticket_created(&self, ticket: &Ticket) {
        self.notify(&TicketEvent::created(ticket)).await;
    }

    async fn ticket_changed(
        &self,
        ticket: &Ticket,
        comment: &str,
        author: &str,
        old_values: &HashMap<String, String>,
    ) {
        self.notify(&TicketEvent::changed(ticket, comment, author, old_values))
            .await;
    }

    async fn ticket_deleted(&self, _ticket: &Ticket) {}
}
