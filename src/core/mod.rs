//! Orchestration core: the analyzer and the multi-sink capture flow.

pub mod analyzer;
pub mod orchestrator;

pub use analyzer::Analyzer;
pub use orchestrator::{CaptureError, Orchestrator};
