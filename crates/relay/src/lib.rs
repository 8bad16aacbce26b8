//! Wiring shared by the relay binaries.

use std::future::Future;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};

use messenger_common::config::AppConfig;
use messenger_common::redis_pool::create_redis_pool;
use messenger_common::types::InboundRecord;
use messenger_engine::Dispatcher;
use messenger_notifier::{ChannelTable, RedisFallbackSink, WebhookNotifier};

/// Build a dispatcher from validated configuration.
pub async fn build_dispatcher(config: &AppConfig) -> anyhow::Result<Dispatcher> {
    let channels = ChannelTable::from_config(config);
    tracing::info!(
        channels = channels.len(),
        timeout_ms = config.webhook_timeout.as_millis() as u64,
        "Channel table loaded"
    );
    let notifier = WebhookNotifier::new(channels, config.webhook_timeout)?;

    let redis = create_redis_pool(&config.redis_url).await?;
    let sink = RedisFallbackSink::new(
        redis,
        config.fallback_destination.clone(),
        config.fallback_timeout,
    );

    Ok(Dispatcher::new(Arc::new(notifier), Arc::new(sink)))
}

/// Initialize tracing with the given default filter.
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Dispatch each inbound record as a one-record batch until `shutdown`
/// resolves. A record already being dispatched is finished first.
///
/// Returns the number of records handled, or an error if the inbound
/// stream ends.
pub async fn relay_until<S, F>(
    dispatcher: &Dispatcher,
    mut records: S,
    shutdown: F,
) -> anyhow::Result<usize>
where
    S: Stream<Item = InboundRecord> + Unpin,
    F: Future,
{
    tokio::pin!(shutdown);
    let mut handled = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                tracing::info!(handled, "Received shutdown signal, stopping gracefully...");
                return Ok(handled);
            }
            record = records.next() => {
                let Some(record) = record else {
                    tracing::error!(handled, "Inbound subscription closed");
                    anyhow::bail!("inbound subscription closed");
                };
                dispatcher.process_batch(std::slice::from_ref(&record)).await;
                handled += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use messenger_common::types::{FallbackEnvelope, Notification};
    use messenger_notifier::{ChannelDelivery, DeliveryError, FallbackError, FallbackSink};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Fires `stop` from inside the first delivery, then succeeds.
    struct StopDuringDelivery {
        stop: Mutex<Option<oneshot::Sender<()>>>,
        delivered: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChannelDelivery for StopDuringDelivery {
        async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
            if let Some(stop) = self.stop.lock().unwrap().take() {
                let _ = stop.send(());
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.delivered.lock().unwrap().push(notification.message.clone());
            Ok(())
        }
    }

    struct NoFallback;

    #[async_trait]
    impl FallbackSink for NoFallback {
        async fn publish(&self, _envelope: &FallbackEnvelope) -> Result<(), FallbackError> {
            Ok(())
        }
    }

    fn records(messages: &[&str]) -> Vec<InboundRecord> {
        messages
            .iter()
            .map(|m| {
                InboundRecord::new(
                    serde_json::json!({ "channel": "#general", "message": m }).to_string(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_shutdown_during_dispatch_finishes_current_record() {
        let (stop_tx, stop_rx) = oneshot::channel();
        let delivery = Arc::new(StopDuringDelivery {
            stop: Mutex::new(Some(stop_tx)),
            delivered: Mutex::new(Vec::new()),
        });
        let dispatcher = Dispatcher::new(delivery.clone(), Arc::new(NoFallback));

        let inbound = futures_util::stream::iter(records(&["first", "second", "third"]));
        let handled = relay_until(&dispatcher, inbound, stop_rx).await.unwrap();

        assert_eq!(handled, 1);
        assert_eq!(*delivery.delivered.lock().unwrap(), vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_closed_stream_is_an_error() {
        let dispatcher = Dispatcher::new(
            Arc::new(StopDuringDelivery {
                stop: Mutex::new(None),
                delivered: Mutex::new(Vec::new()),
            }),
            Arc::new(NoFallback),
        );

        let inbound = futures_util::stream::iter(records(&["only"]));
        let err = relay_until(&dispatcher, inbound, std::future::pending::<()>())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("closed"));
    }
}
