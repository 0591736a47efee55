//! Telegram transport loop.
//!
//! Long-polls the Bot API, turns inbound messages into capture inputs, and
//! renders the orchestrator's result back to the chat. All user-facing copy
//! lives here; the core only ever returns a URL mapping or an error.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use tracing::{error, info, warn};

use crate::adapters::telegram::Message;
use crate::adapters::{SpeechToText, TelegramClient};
use crate::core::{CaptureError, Orchestrator};
use crate::domain::{CaptureInput, CaptureSource};

const HELP_TEXT: &str = "Send me a text or voice message and I will file it \
into your knowledge stores with a topic and summary.\n\n\
Commands:\n\
/start - show this message\n\
/help - show this message";

const SAVE_FAILED_TEXT: &str = "\u{274c} Could not save your note. Please try again.";
const TRANSCRIPTION_FAILED_TEXT: &str =
    "\u{274c} Could not transcribe your voice message. Please try again.";

/// Long-poll timeout for getUpdates
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause before retrying after a failed poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fallback file name when Telegram returns a pathless file
const DEFAULT_VOICE_NAME: &str = "voice.ogg";

/// The polling bot: transport glue between Telegram and the orchestrator
pub struct Bot {
    telegram: TelegramClient,
    transcriber: Box<dyn SpeechToText>,
    orchestrator: Orchestrator,
    /// When set, messages from other chats are dropped
    allowed_chat_id: Option<i64>,
}

impl Bot {
    /// Assemble the bot from its collaborators
    pub fn new(
        telegram: TelegramClient,
        transcriber: Box<dyn SpeechToText>,
        orchestrator: Orchestrator,
        allowed_chat_id: Option<i64>,
    ) -> Self {
        Self {
            telegram,
            transcriber,
            orchestrator,
            allowed_chat_id,
        }
    }

    /// Run the polling loop until the process is stopped
    pub async fn run(&self) -> Result<()> {
        info!(
            sinks = self.orchestrator.sink_count(),
            "Starting bot in polling mode"
        );

        let mut offset = 0i64;
        loop {
            let updates = match self.telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => updates,
                Err(e) => {
                    warn!(error = %e, "getUpdates failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                if let Some(message) = update.message {
                    self.handle_message(message).await;
                }
            }
        }
    }

    /// Process one message and deliver the reply, if any
    async fn handle_message(&self, message: Message) {
        if let Some(allowed) = self.allowed_chat_id {
            if message.chat.id != allowed {
                warn!(chat_id = message.chat.id, "Ignoring message from unknown chat");
                return;
            }
        }

        let chat_id = message.chat.id;
        let Some(reply) = self.process_message(message).await else {
            return;
        };

        if let Err(e) = self.telegram.send_message(chat_id, &reply).await {
            error!(error = %e, chat_id, "Failed to deliver reply");
        }
    }

    /// Produce the reply text for one inbound message.
    ///
    /// Returns None for message kinds the bot does not handle.
    async fn process_message(&self, message: Message) -> Option<String> {
        let timestamp = message_timestamp(&message);

        if let Some(text) = message.text.as_deref() {
            if is_command(text) {
                return Some(HELP_TEXT.to_string());
            }
            let input = CaptureInput::new(text, timestamp, CaptureSource::Text);
            return Some(self.render_capture(input).await);
        }

        if let Some(voice) = &message.voice {
            let transcript = match self.fetch_transcript(&voice.file_id).await {
                Ok(transcript) => transcript,
                Err(e) => {
                    let e = CaptureError::Transcription(e);
                    error!(error = %e, "Voice capture failed");
                    return Some(TRANSCRIPTION_FAILED_TEXT.to_string());
                }
            };
            let input = CaptureInput::new(transcript, timestamp, CaptureSource::Voice);
            return Some(self.render_capture(input).await);
        }

        // Stickers, photos, etc. are ignored
        None
    }

    /// Run the capture and render its outcome as user-facing text
    async fn render_capture(&self, input: CaptureInput) -> String {
        match self.orchestrator.capture(input).await {
            Ok(references) => render_success(&references),
            Err(e) => {
                error!(error = %e, "Capture failed");
                SAVE_FAILED_TEXT.to_string()
            }
        }
    }

    /// Download a voice file and transcribe it
    async fn fetch_transcript(&self, file_id: &str) -> Result<String> {
        let info = self.telegram.get_file(file_id).await?;
        let file_path = info
            .file_path
            .context("Telegram getFile returned no file path")?;

        let audio = self.telegram.download_file(&file_path).await?;

        let file_name = file_path
            .rsplit('/')
            .next()
            .unwrap_or(DEFAULT_VOICE_NAME)
            .to_string();

        self.transcriber.transcribe(audio, &file_name, "en").await
    }
}

/// Message timestamp, falling back to now for out-of-range values
fn message_timestamp(message: &Message) -> DateTime<Utc> {
    Utc.timestamp_opt(message.date, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn is_command(text: &str) -> bool {
    text.starts_with("/start") || text.starts_with("/help")
}

/// Render the sink URL mapping as a success reply
fn render_success(references: &BTreeMap<String, String>) -> String {
    if references.is_empty() {
        return "\u{2705} Captured (no sinks configured)".to_string();
    }

    let mut reply = String::from("\u{2705} Saved\n");
    for (sink, url) in references {
        reply.push_str(sink);
        reply.push_str(": ");
        reply.push_str(url);
        reply.push('\n');
    }
    reply.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_detection() {
        assert!(is_command("/start"));
        assert!(is_command("/help"));
        assert!(is_command("/help@secondbrain_bot"));
        assert!(!is_command("start my day with a walk"));
        assert!(!is_command("note about /etc/hosts"));
    }

    #[test]
    fn test_render_success_lists_sinks() {
        let mut references = BTreeMap::new();
        references.insert("notion".to_string(), "https://notion.so/abc".to_string());
        references.insert("vault".to_string(), "https://github.com/a/b".to_string());

        let reply = render_success(&references);
        assert!(reply.starts_with("\u{2705} Saved\n"));
        assert!(reply.contains("notion: https://notion.so/abc"));
        assert!(reply.contains("vault: https://github.com/a/b"));
        assert!(!reply.ends_with('\n'));
    }

    #[test]
    fn test_render_success_without_sinks() {
        let reply = render_success(&BTreeMap::new());
        assert!(reply.contains("no sinks configured"));
    }

    #[test]
    fn test_message_timestamp_conversion() {
        let message: Message = serde_json::from_str(
            r#"{"message_id": 1, "date": 1709649000, "chat": {"id": 5}, "text": "hi"}"#,
        )
        .unwrap();

        let timestamp = message_timestamp(&message);
        assert_eq!(timestamp.timestamp(), 1709649000);
    }
}
