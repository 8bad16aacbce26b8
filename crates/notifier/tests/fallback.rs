//! Fallback sink against a live Redis.
//!
//! ```bash
//! REDIS_URL="redis://localhost:6379" \
//!   cargo test -p messenger-notifier --test fallback -- --ignored --nocapture
//! ```

use std::time::Duration;

use futures_util::StreamExt;

use messenger_common::redis_pool::{create_redis_pool, subscribe};
use messenger_common::types::FallbackEnvelope;
use messenger_notifier::{FallbackSink, RedisFallbackSink};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

#[tokio::test]
#[ignore]
async fn test_envelope_is_published_to_destination() {
    let url = redis_url();
    let destination = "messenger-fallback-test";

    let mut pubsub = subscribe(&url, destination).await.unwrap();
    let redis = create_redis_pool(&url).await.unwrap();
    let sink = RedisFallbackSink::new(redis, destination, Duration::from_secs(2));

    let envelope = FallbackEnvelope {
        subject: "[Slack Fallback] #general".to_string(),
        message: "⚠️ Fallback message".to_string(),
    };
    sink.publish(&envelope).await.unwrap();

    let mut messages = Box::pin(pubsub.on_message());
    let msg = tokio::time::timeout(Duration::from_secs(2), messages.next())
        .await
        .unwrap()
        .unwrap();
    let payload: String = msg.get_payload().unwrap();
    let received: FallbackEnvelope = serde_json::from_str(&payload).unwrap();
    assert_eq!(received, envelope);
}
