//! Delivery backends for the relay.
//!
//! - [`webhook`]: primary delivery, one POST to the channel's webhook
//! - [`fallback`]: best-effort publish of a [`FallbackEnvelope`] when the
//!   primary attempt fails
//!
//! [`FallbackEnvelope`]: messenger_common::types::FallbackEnvelope

pub mod channels;
pub mod error;
pub mod fallback;
pub mod webhook;

pub use channels::ChannelTable;
pub use error::{DeliveryError, FallbackError};
pub use fallback::{FallbackSink, RedisFallbackSink};
pub use webhook::{ChannelDelivery, WebhookNotifier};
