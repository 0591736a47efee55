//! Telegram Bot API client.
//!
//! Covers the handful of methods the transport loop needs: long polling,
//! sending replies, and fetching voice message files.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Telegram Bot API client
pub struct TelegramClient {
    /// Bot token
    bot_token: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Response envelope from the Telegram API
#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One polled update
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound message
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Unix timestamp of the message
    pub date: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<Voice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Voice attachment metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,
    #[serde(default)]
    pub duration: i64,
}

/// Result of getFile
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL
    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }

    /// Build file download URL
    fn file_url(&self, file_path: &str) -> String {
        format!(
            "https://api.telegram.org/file/bot{}/{}",
            self.bot_token, file_path
        )
    }

    /// Call an API method and unwrap the response envelope
    async fn call<T: DeserializeOwned>(&self, method: &str, payload: &Value) -> Result<T> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to call Telegram {}", method))?;

        let result: TelegramResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram {} response", method))?;

        if !result.ok {
            anyhow::bail!(
                "Telegram API error: {}",
                result.description.unwrap_or_default()
            );
        }

        result
            .result
            .with_context(|| format!("Telegram {} returned no result", method))
    }

    /// Long-poll for updates past the given offset
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &serde_json::json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    /// Send a text message
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        let message: Message = self
            .call(
                "sendMessage",
                &serde_json::json!({
                    "chat_id": chat_id,
                    "text": text,
                }),
            )
            .await?;

        Ok(message.message_id)
    }

    /// Resolve a file id to a download path
    pub async fn get_file(&self, file_id: &str) -> Result<FileInfo> {
        self.call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await
    }

    /// Download a file by its API path
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.file_url(file_path))
            .send()
            .await
            .context("Failed to download Telegram file")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Telegram file download failed ({})", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read Telegram file body")?;

        Ok(bytes.to_vec())
    }

    /// Remove any configured webhook so polling can receive updates
    pub async fn delete_webhook(&self) -> Result<bool> {
        self.call(
            "deleteWebhook",
            &serde_json::json!({ "drop_pending_updates": false }),
        )
        .await
    }
}
