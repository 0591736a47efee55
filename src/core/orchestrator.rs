//! Capture orchestration: one analysis, fan-out to every configured sink.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::core::Analyzer;
use crate::domain::{CaptureInput, CaptureRecord};
use crate::sinks::{Sink, SinkError};

/// Fatal capture failures surfaced to the transport.
///
/// Analysis failures never appear here; the analyzer absorbs them.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Speech-to-text failed; no sink was attempted
    #[error("transcription failed: {0}")]
    Transcription(anyhow::Error),

    /// A sink write failed. Writes that already landed in other backends
    /// are not rolled back.
    #[error("sink '{sink_id}' write failed: {source}")]
    SinkWrite {
        sink_id: String,
        #[source]
        source: SinkError,
    },
}

/// Coordinates the analyzer and the configured sinks
pub struct Orchestrator {
    analyzer: Analyzer,
    sinks: Vec<Box<dyn Sink>>,
}

impl Orchestrator {
    /// Create an orchestrator over the active sink set.
    ///
    /// An empty sink set is allowed; captures are then analyzed and dropped.
    pub fn new(analyzer: Analyzer, sinks: Vec<Box<dyn Sink>>) -> Self {
        if sinks.is_empty() {
            warn!("No sinks configured; captures will succeed without being persisted");
        }
        Self { analyzer, sinks }
    }

    /// Number of active sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Persist one capture to every configured sink.
    ///
    /// The analyzer runs exactly once and every sink receives the same
    /// record, so all persisted copies carry the same topic and summary.
    /// The write policy is all-or-nothing: the first sink failure fails the
    /// whole capture. There is no compensating delete, so a write that
    /// already landed in another backend stays there.
    #[instrument(skip(self, input), fields(source = ?input.source))]
    pub async fn capture(
        &self,
        input: CaptureInput,
    ) -> Result<BTreeMap<String, String>, CaptureError> {
        let analysis = self.analyzer.analyze(&input.content).await;
        let record = CaptureRecord::new(input, analysis);

        let mut references = BTreeMap::new();
        for sink in &self.sinks {
            match sink.write(&record).await {
                Ok(url) => {
                    info!(sink = sink.id(), %url, "Sink write succeeded");
                    references.insert(sink.id().to_string(), url);
                }
                Err(e) => {
                    error!(sink = sink.id(), error = %e, "Sink write failed, capture aborted");
                    return Err(CaptureError::SinkWrite {
                        sink_id: sink.id().to_string(),
                        source: e,
                    });
                }
            }
        }

        Ok(references)
    }
}
