//! Clients for external services.
//!
//! The language-analysis and speech-to-text capabilities are traits so the
//! core can be exercised against fakes; `OpenAiClient` implements both over
//! HTTP. `TelegramClient` carries the bot transport.

pub mod openai;
pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

// Re-export the concrete clients
pub use openai::OpenAiClient;
pub use telegram::TelegramClient;

/// Opaque language-analysis capability.
///
/// Takes a fixed instruction plus the message content and returns the raw
/// model reply; parsing and fallback policy live in the analyzer.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Request a JSON-object completion for the given content
    async fn complete_json(&self, instruction: &str, content: &str) -> Result<String>;
}

/// Opaque speech-to-text capability: audio bytes in, plain text out.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio file, with a language hint
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, language: &str) -> Result<String>;
}
