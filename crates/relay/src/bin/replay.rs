//! Replay a topic delivery document through the relay once.
//!
//! ```bash
//! messenger-replay event.json
//! cat event.json | messenger-replay
//! ```
//!
//! The document has the shape `{"Records":[{"Sns":{"Message":"..."}}]}`.
//! The batch report is printed to stdout as JSON.

use std::io::Read;

use messenger_common::config::AppConfig;
use messenger_common::types::TopicEvent;
use messenger_relay::{build_dispatcher, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("messenger_engine=info,messenger_notifier=debug", false);

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let event: TopicEvent = serde_json::from_str(&raw)?;
    let records = event.into_records();

    let config = AppConfig::from_env()?;
    let dispatcher = build_dispatcher(&config).await?;

    let report = dispatcher.process_batch(&records).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
