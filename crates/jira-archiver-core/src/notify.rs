use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::json;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Posts run summaries to a Slack incoming webhook.
#[derive(Debug)]
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// Returns `None` when no webhook is configured.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>> {
        let Some(webhook_url) = settings.slack_webhook_url.clone().filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Some(Self { client, webhook_url }))
    }

    #[instrument(skip(self, text))]
    pub fn send(&self, text: &str) -> Result<()> {
        debug!("Posting summary to Slack.");
        let response = self.client.post(&self.webhook_url).json(&json!({ "text": text })).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::HttpStatus { status: status.as_u16(), body });
        }
        Ok(())
    }
}
