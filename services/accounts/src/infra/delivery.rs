use std::time::Duration;

use anyhow::{Context as _, anyhow};
use serde::Serialize;
use tracing::info;

use crate::domain::repository::CodeSender;
use crate::domain::types::{Channel, mask_address};
use crate::error::AccountsError;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Writes a log line instead of sending anything. Development only.
#[derive(Debug, Clone, Default)]
pub struct LogCodeSender;

impl CodeSender for LogCodeSender {
    async fn send(&self, channel: Channel, address: &str, _code: &str) -> Result<(), AccountsError> {
        info!(?channel, address = %mask_address(address), "verification code dispatched (log only)");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CodeMessage<'a> {
    channel: Channel,
    address: &'a str,
    code: &'a str,
}

/// POSTs `{channel, address, code}` to an SMS/e-mail gateway.
#[derive(Debug, Clone)]
pub struct WebhookCodeSender {
    client: reqwest::Client,
    url: String,
}

impl WebhookCodeSender {
    pub fn new(url: String) -> Result<Self, AccountsError> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .context("build delivery http client")?;
        Ok(Self { client, url })
    }
}

impl CodeSender for WebhookCodeSender {
    async fn send(&self, channel: Channel, address: &str, code: &str) -> Result<(), AccountsError> {
        let response = self
            .client
            .post(&self.url)
            .json(&CodeMessage {
                channel,
                address,
                code,
            })
            .send()
            .await
            .context("post verification code")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("delivery gateway responded {status}").into());
        }
        Ok(())
    }
}

/// Sender chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum Delivery {
    Log(LogCodeSender),
    Webhook(WebhookCodeSender),
}

impl CodeSender for Delivery {
    async fn send(&self, channel: Channel, address: &str, code: &str) -> Result<(), AccountsError> {
        match self {
            Self::Log(sender) => sender.send(channel, address, code).await,
            Self::Webhook(sender) => sender.send(channel, address, code).await,
        }
    }
}
