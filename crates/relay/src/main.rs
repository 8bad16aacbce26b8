use futures_util::StreamExt;

use messenger_common::config::AppConfig;
use messenger_common::redis_pool::subscribe;
use messenger_common::types::InboundRecord;
use messenger_relay::{build_dispatcher, init_tracing, relay_until};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(
        "messenger_relay=info,messenger_engine=info,messenger_notifier=info",
        true,
    );

    tracing::info!("Messenger relay starting...");

    // Fails fast on any missing webhook or fallback destination
    let config = AppConfig::from_env()?;

    let dispatcher = build_dispatcher(&config).await?;
    let mut pubsub = subscribe(&config.redis_url, &config.inbound_topic).await?;
    let records = Box::pin(pubsub.on_message()).map(|msg| match msg.get_payload::<String>() {
        Ok(payload) => InboundRecord::new(payload),
        Err(e) => {
            tracing::warn!(error = %e, "Inbound payload is not a string");
            InboundRecord { payload: None }
        }
    });

    tracing::info!(topic = %config.inbound_topic, "Waiting for notifications");

    let handled = relay_until(&dispatcher, records, tokio::signal::ctrl_c()).await?;

    tracing::info!(handled, "Messenger relay stopped.");
    Ok(())
}
