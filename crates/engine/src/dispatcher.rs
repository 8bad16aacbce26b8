//! Batch dispatcher.
//!
//! Each record in a batch is handled on its own, strictly in order:
//! 1. Parse the payload into a `Notification` (malformed → skip)
//! 2. Validate `channel` and `message` (missing → skip, no fallback)
//! 3. Primary delivery via `ChannelDelivery`
//! 4. On any primary failure, one publish to the `FallbackSink`
//!
//! No error escapes a record; the batch always completes.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use messenger_common::error::RecordError;
use messenger_common::types::{FallbackEnvelope, InboundRecord, Notification};
use messenger_notifier::{ChannelDelivery, FallbackSink};

use crate::report::{BatchReport, RecordOutcome, SkipReason};

/// Routes notifications to their webhook and falls back on failure.
pub struct Dispatcher {
    delivery: Arc<dyn ChannelDelivery>,
    fallback: Arc<dyn FallbackSink>,
}

impl Dispatcher {
    pub fn new(delivery: Arc<dyn ChannelDelivery>, fallback: Arc<dyn FallbackSink>) -> Self {
        Self { delivery, fallback }
    }

    /// Process every record of a batch and report the outcome of each.
    pub async fn process_batch(&self, records: &[InboundRecord]) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();

        tracing::debug!(batch_id = %batch_id, records = records.len(), "Processing batch");

        let mut outcomes = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let outcome = self.process_record(record).await;
            log_outcome(batch_id, index, &outcome);
            outcomes.push(outcome);
        }

        let report = BatchReport {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        // Single-record batches already got their per-record line.
        if report.len() > 1 {
            tracing::info!(
                batch_id = %batch_id,
                records = report.len(),
                delivered = report.delivered(),
                fell_back = report.fell_back(),
                fallback_failed = report.fallback_failed(),
                skipped = report.skipped(),
                "Batch processed"
            );
        } else {
            tracing::debug!(batch_id = %batch_id, records = report.len(), "Batch processed");
        }

        report
    }

    /// Process a single record.
    pub async fn process_record(&self, record: &InboundRecord) -> RecordOutcome {
        let Some(payload) = record.payload.as_deref() else {
            return RecordOutcome::Skipped {
                reason: SkipReason::Malformed("record has no message body".to_string()),
            };
        };

        let notification = match Notification::parse(payload) {
            Ok(n) => n,
            Err(RecordError::Parse(e)) => {
                return RecordOutcome::Skipped {
                    reason: SkipReason::Malformed(e.to_string()),
                };
            }
            Err(RecordError::Validation(_)) => {
                return RecordOutcome::Skipped {
                    reason: SkipReason::MissingFields,
                };
            }
        };

        self.deliver(notification).await
    }

    /// Primary delivery with a single fallback publish on failure.
    async fn deliver(&self, notification: Notification) -> RecordOutcome {
        let result = self.delivery.deliver(&notification).await;
        let reason = match result {
            Ok(()) => {
                return RecordOutcome::Delivered {
                    channel: notification.channel,
                };
            }
            Err(e) => e.to_string(),
        };

        let envelope = FallbackEnvelope::for_notification(&notification);
        tracing::debug!(
            channel = %notification.channel,
            subject = %envelope.subject,
            "Sending fallback envelope"
        );

        match self.fallback.publish(&envelope).await {
            Ok(()) => RecordOutcome::FellBack {
                channel: notification.channel,
                reason,
            },
            Err(e) => RecordOutcome::FallbackFailed {
                channel: notification.channel,
                reason,
                error: e.to_string(),
            },
        }
    }
}

fn log_outcome(batch_id: Uuid, record: usize, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Delivered { channel } => {
            tracing::info!(batch_id = %batch_id, record, channel = %channel, "Message sent");
        }
        RecordOutcome::FellBack { channel, reason } => {
            tracing::warn!(
                batch_id = %batch_id,
                record,
                channel = %channel,
                reason = %reason,
                "Primary delivery failed, fell back"
            );
        }
        RecordOutcome::FallbackFailed {
            channel,
            reason,
            error,
        } => {
            tracing::error!(
                batch_id = %batch_id,
                record,
                channel = %channel,
                reason = %reason,
                error = %error,
                "Primary delivery and fallback both failed"
            );
        }
        RecordOutcome::Skipped { reason } => match reason {
            SkipReason::Malformed(detail) => {
                tracing::error!(
                    batch_id = %batch_id,
                    record,
                    error = %detail,
                    "Malformed record skipped"
                );
            }
            SkipReason::MissingFields => {
                tracing::error!(
                    batch_id = %batch_id,
                    record,
                    "Record missing channel or message, skipped"
                );
            }
        },
    }
}
