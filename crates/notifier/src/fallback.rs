//! Fallback delivery over Redis pub/sub.
//!
//! One statically configured destination channel receives every envelope as
//! a JSON document `{"subject": .., "message": ..}`. A single `PUBLISH` is
//! made per envelope, bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use messenger_common::types::FallbackEnvelope;

use crate::error::FallbackError;

/// Best-effort sink for notifications whose primary delivery failed.
#[async_trait]
pub trait FallbackSink: Send + Sync {
    async fn publish(&self, envelope: &FallbackEnvelope) -> Result<(), FallbackError>;
}

/// Publishes fallback envelopes to a Redis pub/sub channel.
#[derive(Clone)]
pub struct RedisFallbackSink {
    redis: ConnectionManager,
    destination: String,
    timeout: Duration,
}

impl RedisFallbackSink {
    pub fn new(redis: ConnectionManager, destination: impl Into<String>, timeout: Duration) -> Self {
        Self {
            redis,
            destination: destination.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FallbackSink for RedisFallbackSink {
    async fn publish(&self, envelope: &FallbackEnvelope) -> Result<(), FallbackError> {
        let payload = serde_json::to_string(envelope)?;
        let mut redis = self.redis.clone();

        let receivers: i64 =
            publish_within(self.timeout, redis.publish(&self.destination, payload)).await?;

        tracing::debug!(
            destination = %self.destination,
            receivers,
            "Fallback envelope published"
        );
        Ok(())
    }
}

/// Await a publish, failing with `FallbackError::Timeout` once `timeout` elapses.
async fn publish_within<T, F>(timeout: Duration, publish: F) -> Result<T, FallbackError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    tokio::time::timeout(timeout, publish)
        .await
        .map_err(|_| FallbackError::Timeout(timeout.as_millis()))?
        .map_err(FallbackError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stalled_publish_times_out() {
        let started = tokio::time::Instant::now();
        let result = publish_within(
            Duration::from_millis(50),
            std::future::pending::<redis::RedisResult<i64>>(),
        )
        .await;

        assert!(matches!(result, Err(FallbackError::Timeout(50))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_prompt_publish_returns_receivers() {
        let receivers = publish_within(Duration::from_millis(50), async {
            Ok::<i64, redis::RedisError>(3)
        })
        .await
        .unwrap();
        assert_eq!(receivers, 3);
    }

    #[tokio::test]
    async fn test_redis_error_is_not_a_timeout() {
        let err = publish_within(Duration::from_millis(50), async {
            Err::<i64, _>(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection reset",
            )))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FallbackError::Redis(_)));
    }
}
