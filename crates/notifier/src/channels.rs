//! Static channel → webhook URL table.

use std::collections::BTreeMap;

use messenger_common::config::AppConfig;

/// Immutable mapping from channel name to webhook URL, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct ChannelTable {
    webhooks: BTreeMap<String, String>,
}

impl ChannelTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            webhooks: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.channel_webhooks.clone())
    }

    /// Webhook URL for `channel`, or `None` when the channel is not configured.
    pub fn resolve(&self, channel: &str) -> Option<&str> {
        self.webhooks.get(channel).map(String::as_str)
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.webhooks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.webhooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.webhooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_and_unknown() {
        let table = ChannelTable::new([
            ("#general", "https://hooks.example.test/general"),
            ("#signups", "https://hooks.example.test/signups"),
        ]);

        assert_eq!(
            table.resolve("#general"),
            Some("https://hooks.example.test/general")
        );
        assert_eq!(table.resolve("#unknown"), None);
        assert_eq!(table.resolve("general"), None);
        assert_eq!(table.len(), 2);
        assert_eq!(table.channels().collect::<Vec<_>>(), ["#general", "#signups"]);
    }
}
