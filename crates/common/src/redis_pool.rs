//! Redis connections: a managed connection for publishing and a dedicated
//! pub/sub connection for the inbound topic.

use redis::Client;
use redis::aio::{ConnectionManager, PubSub};

/// Open a reconnecting connection used for `PUBLISH`.
pub async fn create_redis_pool(redis_url: &str) -> anyhow::Result<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    tracing::info!("Connected to Redis");
    Ok(manager)
}

/// Open a pub/sub connection already subscribed to `topic`.
pub async fn subscribe(redis_url: &str, topic: &str) -> anyhow::Result<PubSub> {
    let client = Client::open(redis_url)?;
    let mut pubsub = client.get_async_pubsub().await?;
    pubsub.subscribe(topic).await?;

    tracing::info!(topic, "Subscribed to inbound topic");
    Ok(pubsub)
}
