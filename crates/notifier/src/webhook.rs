//! Primary delivery: a single JSON POST to the channel's incoming webhook.
//!
//! Only an exact `200 OK` counts as delivered. Redirects are not followed,
//! so a `3xx` is reported as a failed status like any other non-200.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;

use messenger_common::types::Notification;

use crate::channels::ChannelTable;
use crate::error::DeliveryError;

/// Delivers a notification to its channel. Exactly one attempt per call.
#[async_trait]
pub trait ChannelDelivery: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Body accepted by chat incoming webhooks.
#[derive(Debug, Serialize)]
struct WebhookBody<'a> {
    text: &'a str,
}

/// `reqwest`-backed webhook client bound to a channel table.
pub struct WebhookNotifier {
    client: reqwest::Client,
    channels: ChannelTable,
}

impl WebhookNotifier {
    /// Build a notifier whose requests are bounded by `timeout`.
    pub fn new(channels: ChannelTable, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client, channels })
    }

    /// Serialize the webhook body for a notification.
    pub fn encode_body(notification: &Notification) -> Result<Vec<u8>, DeliveryError> {
        let text = notification.text();
        Ok(serde_json::to_vec(&WebhookBody { text: &text })?)
    }
}

#[async_trait]
impl ChannelDelivery for WebhookNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let url = self
            .channels
            .resolve(&notification.channel)
            .ok_or_else(|| DeliveryError::NoDestination(notification.channel.clone()))?;

        let body = Self::encode_body(notification)?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        // Body is discarded.
        let _ = response.bytes().await;

        if status != StatusCode::OK {
            return Err(DeliveryError::Status(status.as_u16()));
        }

        tracing::debug!(channel = %notification.channel, "Webhook accepted message");
        Ok(())
    }
}
