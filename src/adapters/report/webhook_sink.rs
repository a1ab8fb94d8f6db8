//! Webhook report sink.
//!
//! Fire-and-forget delivery of finalized tickets to the report webhook.
//! An unconfigured URL turns every send into a logged no-op; the caller
//! has already committed the local finalization either way.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::foundation::ReporterId;
use crate::domain::ticket::Ticket;
use crate::ports::{DispatchError, ReportPayload, ReportSink};

/// Report sink posting to a webhook, when one is configured.
pub struct WebhookReportSink {
    webhook_url: Option<String>,
    client: Client,
}

impl WebhookReportSink {
    /// Creates a sink for the given webhook URL. `None` disables
    /// dispatch entirely.
    pub fn new(webhook_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
            client,
        }
    }

    /// True when a webhook URL is configured.
    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl ReportSink for WebhookReportSink {
    async fn send(&self, ticket: &Ticket, reporter: &ReporterId) -> Result<(), DispatchError> {
        let Some(url) = &self.webhook_url else {
            tracing::warn!("report webhook not configured, skipping dispatch");
            return Ok(());
        };

        let payload = ReportPayload::from_ticket(ticket, reporter);
        tracing::info!(
            ticket_id = payload.ticket_id.as_deref().unwrap_or("-"),
            "dispatching finalized report"
        );

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| DispatchError::network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::http(status.as_u16()));
        }
        Ok(())
    }
}
