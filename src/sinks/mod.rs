//! Persistence sinks for capture records.
//!
//! A sink converts a capture record into one backend-specific write and
//! returns a durable reference URL. Sinks are independent: the orchestrator
//! fans the same record out to every active sink.

pub mod notion;
pub mod vault;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CaptureRecord;

// Re-export the concrete sinks
pub use notion::NotionSink;
pub use vault::VaultSink;

/// Errors from a single sink write attempt.
///
/// One attempt per capture; any of these is terminal for the sink write.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Transport-level failure talking to the backend
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Create response carried no extractable entity identifier
    #[error("create response carried no entity id: {body}")]
    MissingIdentifier { body: String },
}

/// A pluggable persistence backend.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stable identifier, used as the key in the capture result mapping
    fn id(&self) -> &str;

    /// Persist the record, returning a browsable reference URL
    async fn write(&self, record: &CaptureRecord) -> Result<String, SinkError>;
}
