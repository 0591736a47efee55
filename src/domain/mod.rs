//! Domain types for the capture pipeline.
//!
//! - CaptureInput: one inbound message (text or transcribed voice)
//! - AnalysisResult: topic/summary enrichment
//! - CaptureRecord: the composite handed to every sink

pub mod capture;

// Re-export commonly used types
pub use capture::{AnalysisResult, CaptureInput, CaptureRecord, CaptureSource};
