pub mod dispatcher;
pub mod report;

pub use dispatcher::Dispatcher;
pub use report::{BatchReport, RecordOutcome, SkipReason};
