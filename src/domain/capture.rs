//! Capture data types.
//!
//! A capture flows create -> analyze -> write-to-sinks -> discard; nothing
//! here is stored long-lived in process memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a capture originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    /// Plain text message
    Text,

    /// Transcribed voice message
    Voice,
}

impl CaptureSource {
    /// Label used in the vault front matter `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
        }
    }
}

/// One inbound message, as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureInput {
    /// Message text (already transcribed for voice captures)
    pub content: String,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// Text or voice origin
    pub source: CaptureSource,
}

impl CaptureInput {
    /// Create a new capture input
    pub fn new(
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        source: CaptureSource,
    ) -> Self {
        Self {
            content: content.into(),
            timestamp,
            source,
        }
    }
}

/// Topic and summary enrichment produced by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Short (1-3 word) noun phrase
    pub topic: String,

    /// 1-2 sentence summary
    pub summary: String,
}

impl Default for AnalysisResult {
    /// Fallback used whenever analysis fails; the capture is saved anyway.
    fn default() -> Self {
        Self {
            topic: "Unknown".to_string(),
            summary: "No summary available".to_string(),
        }
    }
}

/// The enriched record every sink receives.
///
/// Built once per capture, after the single analysis call; all sinks observe
/// the same analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRecord {
    pub input: CaptureInput,
    pub analysis: AnalysisResult,
}

impl CaptureRecord {
    /// Combine an input with its analysis
    pub fn new(input: CaptureInput, analysis: AnalysisResult) -> Self {
        Self { input, analysis }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_analysis_fallback() {
        let analysis = AnalysisResult::default();
        assert_eq!(analysis.topic, "Unknown");
        assert_eq!(analysis.summary, "No summary available");
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(CaptureSource::Text.as_str(), "text");
        assert_eq!(CaptureSource::Voice.as_str(), "voice");
    }

    #[test]
    fn test_input_serialization() {
        let input = CaptureInput::new(
            "remember the milk",
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            CaptureSource::Voice,
        );

        let json = serde_json::to_string(&input).unwrap();
        let parsed: CaptureInput = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, input);
        assert!(json.contains("\"voice\""));
    }
}
