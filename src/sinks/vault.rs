//! GitHub-backed Markdown vault sink.
//!
//! Commits each capture as a front-matter-tagged document under
//! `vault/captures/` via the repository contents API. The vault is an
//! Obsidian-compatible tree, so the document is plain Markdown with a
//! `date`/`type`/`topic`/`summary` header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use tracing::debug;

use crate::config::VaultConfig;
use crate::domain::CaptureRecord;

use super::{Sink, SinkError};

const GITHUB_API: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("secondbrain/", env!("CARGO_PKG_VERSION"));

/// Directory inside the repository that receives captures
const CAPTURE_DIR: &str = "vault/captures";

/// Sink that commits captures into a versioned Markdown vault
pub struct VaultSink {
    token: String,
    /// "owner/repo"
    repo: String,
    branch: String,
    client: reqwest::Client,
}

impl VaultSink {
    /// Create a sink for the configured repository
    pub fn new(config: &VaultConfig) -> Self {
        Self {
            token: config.token.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Fallback reference URL when the response carries none
    fn blob_url(&self, path: &str) -> String {
        format!("https://github.com/{}/blob/{}/{}", self.repo, self.branch, path)
    }
}

/// Lowercase a topic and replace spaces with hyphens for use in a filename
fn slug(topic: &str) -> String {
    topic.to_lowercase().replace(' ', "-")
}

/// Repository path for a record: `vault/captures/<date>-<topic-slug>.md`
fn capture_path(record: &CaptureRecord) -> String {
    format!(
        "{}/{}-{}.md",
        CAPTURE_DIR,
        record.input.timestamp.format("%Y-%m-%d-%H%M%S"),
        slug(&record.analysis.topic)
    )
}

/// Render the record as a front-matter-tagged Markdown document
fn render_document(record: &CaptureRecord) -> String {
    format!(
        "---\ndate: {}\ntype: {}\ntopic: {}\nsummary: {}\n---\n\n{}\n",
        record.input.timestamp.to_rfc3339(),
        record.input.source.as_str(),
        record.analysis.topic,
        record.analysis.summary,
        record.input.content
    )
}

#[async_trait::async_trait]
impl Sink for VaultSink {
    fn id(&self) -> &str {
        "vault"
    }

    async fn write(&self, record: &CaptureRecord) -> Result<String, SinkError> {
        let path = capture_path(record);
        let document = render_document(record);

        // The contents API requires base64-encoded file bodies
        let body = serde_json::json!({
            "message": format!("Capture: {}", record.analysis.topic),
            "content": BASE64.encode(document.as_bytes()),
            "branch": self.branch,
        });

        let response = self
            .client
            .put(format!("{}/repos/{}/contents/{}", GITHUB_API, self.repo, path))
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status { status, body });
        }

        let value: Value = response.json().await?;
        debug!(%path, "Vault document committed");

        let url = value
            .get("content")
            .and_then(|c| c.get("html_url"))
            .and_then(Value::as_str)
            .map(|u| u.to_string())
            .unwrap_or_else(|| self.blob_url(&path));

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::{AnalysisResult, CaptureInput, CaptureSource};

    fn record(topic: &str) -> CaptureRecord {
        CaptureRecord::new(
            CaptureInput::new(
                "Focus blocks work better in the morning",
                Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
                CaptureSource::Voice,
            ),
            AnalysisResult {
                topic: topic.to_string(),
                summary: "Morning focus blocks are more effective.".to_string(),
            },
        )
    }

    #[test]
    fn test_capture_path_derivation() {
        assert_eq!(
            capture_path(&record("Deep Work")),
            "vault/captures/2024-03-05-143000-deep-work.md"
        );
    }

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        assert_eq!(slug("Deep Work"), "deep-work");
        assert_eq!(slug("Rust"), "rust");
        assert_eq!(slug("Three Word Topic"), "three-word-topic");
    }

    #[test]
    fn test_document_front_matter() {
        let document = render_document(&record("Deep Work"));

        assert!(document.starts_with("---\n"));
        assert!(document.contains("date: 2024-03-05T14:30:00+00:00\n"));
        assert!(document.contains("type: voice\n"));
        assert!(document.contains("topic: Deep Work\n"));
        assert!(document.contains("summary: Morning focus blocks are more effective.\n"));
        assert!(document.ends_with("---\n\nFocus blocks work better in the morning\n"));
    }

    #[test]
    fn test_blob_url_fallback() {
        let sink = VaultSink::new(&VaultConfig {
            token: "secret".to_string(),
            repo: "alice/brain".to_string(),
            branch: "main".to_string(),
        });

        assert_eq!(
            sink.blob_url("vault/captures/2024-03-05-143000-deep-work.md"),
            "https://github.com/alice/brain/blob/main/vault/captures/2024-03-05-143000-deep-work.md"
        );
    }
}
