//! Per-record outcomes and the batch report collected by the dispatcher.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Why a record was skipped without any delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Payload absent or not a decodable JSON notification
    Malformed(String),
    /// `channel` or `message` missing or empty
    MissingFields,
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    Delivered {
        channel: String,
    },
    FellBack {
        channel: String,
        reason: String,
    },
    FallbackFailed {
        channel: String,
        reason: String,
        error: String,
    },
    Skipped {
        reason: SkipReason,
    },
}

impl RecordOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RecordOutcome::Delivered { .. })
    }
}

/// Outcome of one batch, one entry per input record in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchReport {
    pub fn delivered(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Delivered { .. }))
    }

    pub fn fell_back(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::FellBack { .. }))
    }

    pub fn fallback_failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::FallbackFailed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
