use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Prefix of every fallback subject; the channel name follows it.
pub const FALLBACK_SUBJECT_PREFIX: &str = "[Slack Fallback] ";

/// A chat notification parsed from one inbound record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Logical channel name, e.g. `#general`
    pub channel: String,
    /// Free-text message body
    pub message: String,
    /// Optional decorator prepended to the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Wire shape of a record payload before validation.
#[derive(Debug, Deserialize)]
struct RawNotification {
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    emoji: Option<String>,
}

impl Notification {
    /// Parse and validate a JSON record payload.
    ///
    /// The payload must be a JSON object; arrays and scalars are malformed.
    /// `channel` and `message` must be present and non-empty. An empty
    /// `emoji` is dropped.
    pub fn parse(payload: &str) -> Result<Self, RecordError> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(payload)?;
        let raw: RawNotification = serde_json::from_value(serde_json::Value::Object(object))?;

        let channel = raw
            .channel
            .filter(|c| !c.is_empty())
            .ok_or(RecordError::Validation("channel"))?;
        let message = raw
            .message
            .filter(|m| !m.is_empty())
            .ok_or(RecordError::Validation("message"))?;

        Ok(Self {
            channel,
            message,
            emoji: raw.emoji.filter(|e| !e.is_empty()),
        })
    }

    /// Message text with the emoji prepended when one is set.
    pub fn text(&self) -> String {
        match &self.emoji {
            Some(emoji) => format!("{} {}", emoji, self.message),
            None => self.message.clone(),
        }
    }
}

/// Subject/message pair published when primary delivery fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEnvelope {
    pub subject: String,
    pub message: String,
}

impl FallbackEnvelope {
    pub fn for_notification(notification: &Notification) -> Self {
        Self {
            subject: format!("{}{}", FALLBACK_SUBJECT_PREFIX, notification.channel),
            message: notification.text(),
        }
    }
}

/// One unit of work in an inbound batch.
///
/// `payload` is `None` when the delivering topic handed over a record
/// without a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRecord {
    pub payload: Option<String>,
}

impl InboundRecord {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }
}

/// Topic delivery document: `{"Records":[{"Sns":{"Message":"..."}}]}`.
#[derive(Debug, Deserialize)]
pub struct TopicEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<TopicRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TopicRecord {
    #[serde(rename = "Sns", default)]
    pub sns: Option<TopicMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TopicMessage {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl TopicEvent {
    pub fn into_records(self) -> Vec<InboundRecord> {
        self.records
            .into_iter()
            .map(|record| InboundRecord {
                payload: record.sns.and_then(|sns| sns.message),
            })
            .collect()
    }
}
