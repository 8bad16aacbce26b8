use std::collections::BTreeMap;
use std::time::Duration;

/// Chat channels the relay can deliver to, paired with the environment
/// variable holding each channel's webhook URL.
pub const CHANNEL_WEBHOOK_VARS: [(&str, &str); 6] = [
    ("#general", "CHANNEL_WEBHOOK_GENERAL"),
    ("#site-errors", "CHANNEL_WEBHOOK_ERRORS"),
    ("#uploads", "CHANNEL_WEBHOOK_UPLOAD"),
    ("#transactions", "CHANNEL_WEBHOOK_TRANSACTIONS"),
    ("#contributors", "CHANNEL_WEBHOOK_CONTRIBUTOR_SIGNUP"),
    ("#signups", "CHANNEL_WEBHOOK_SIGNUPS"),
];

/// Environment variable naming the fallback pub/sub destination.
pub const FALLBACK_DESTINATION_VAR: &str = "FALLBACK_DESTINATION_ID";

/// Relay configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Channel name → webhook URL, one entry per `CHANNEL_WEBHOOK_VARS` row
    pub channel_webhooks: BTreeMap<String, String>,

    /// Pub/sub channel receiving fallback envelopes
    pub fallback_destination: String,

    /// Redis connection string (inbound topic and fallback sink)
    pub redis_url: String,

    /// Pub/sub topic the relay consumes notifications from (default: site-alerts)
    pub inbound_topic: String,

    /// Upper bound on a single webhook request (default: 5000 ms)
    pub webhook_timeout: Duration,

    /// Upper bound on a single fallback publish (default: 5000 ms)
    pub fallback_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honoured when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Every required variable is checked before returning; empty values
    /// count as missing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
        };

        let mut channel_webhooks = BTreeMap::new();
        for (channel, var) in CHANNEL_WEBHOOK_VARS {
            channel_webhooks.insert(channel.to_string(), required(var)?);
        }

        let fallback_destination = required(FALLBACK_DESTINATION_VAR)?;

        let millis = |key: &str, default: u64| -> anyhow::Result<Duration> {
            let value = match lookup(key) {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be a valid u64", key))?,
                None => default,
            };
            Ok(Duration::from_millis(value))
        };

        Ok(Self {
            channel_webhooks,
            fallback_destination,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".to_string()),
            inbound_topic: lookup("INBOUND_TOPIC").unwrap_or_else(|| "site-alerts".to_string()),
            webhook_timeout: millis("WEBHOOK_TIMEOUT_MS", 5000)?,
            fallback_timeout: millis("FALLBACK_TIMEOUT_MS", 5000)?,
        })
    }
}
