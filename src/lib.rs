//! secondbrain - Telegram capture bot with multi-sink fan-out
//!
//! A personal capture pipeline: an inbound Telegram message (text or voice)
//! is transcribed if needed, analyzed exactly once into a topic and summary,
//! and written to every configured knowledge store under an all-or-nothing
//! policy. The caller gets back a mapping of sink id to reference URL.
//!
//! # Architecture
//!
//! - `adapters`: External service clients (Telegram, OpenAI) and the
//!   capability traits the core depends on
//! - `core`: Orchestration logic (Analyzer, Orchestrator)
//! - `domain`: Data structures (CaptureInput, AnalysisResult, CaptureRecord)
//! - `sinks`: Persistence backends (Notion database, GitHub Markdown vault)
//! - `transport`: Telegram polling loop and user-facing copy
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Start the bot
//! secondbrain run
//!
//! # One-off capture from the terminal
//! echo "remember this" | secondbrain capture
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod sinks;
pub mod transport;

// Re-export main types at crate root for convenience
pub use crate::core::{Analyzer, CaptureError, Orchestrator};
pub use config::Config;
pub use domain::{AnalysisResult, CaptureInput, CaptureRecord, CaptureSource};
pub use sinks::{Sink, SinkError};
