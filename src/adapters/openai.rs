//! OpenAI API client.
//!
//! One client covers both outbound capabilities: chat completions for
//! content analysis and Whisper for voice transcription.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::{LanguageModel, SpeechToText};

const OPENAI_API: &str = "https://api.openai.com/v1";
const CHAT_MODEL: &str = "gpt-3.5-turbo";
const TRANSCRIBE_MODEL: &str = "whisper-1";

/// OpenAI HTTP client
pub struct OpenAiClient {
    api_key: String,
    client: reqwest::Client,
}

/// Chat completion response (only the parts we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Transcription response
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete_json(&self, instruction: &str, content: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", OPENAI_API))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": CHAT_MODEL,
                "messages": [
                    { "role": "system", "content": instruction },
                    { "role": "user", "content": content },
                ],
                "response_format": { "type": "json_object" },
            }))
            .send()
            .await
            .context("Failed to call chat completions")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI error ({}): {}", status, body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Chat completion returned no choices")
    }
}

#[async_trait]
impl SpeechToText for OpenAiClient {
    async fn transcribe(&self, audio: Vec<u8>, file_name: &str, language: &str) -> Result<String> {
        let file_part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/ogg")?;

        let form = Form::new()
            .text("model", TRANSCRIBE_MODEL)
            .text("language", language.to_string())
            .part("file", file_part);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", OPENAI_API))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to call transcription endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transcription error ({}): {}", status, body);
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        Ok(parsed.text.trim().to_string())
    }
}
