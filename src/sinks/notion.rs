//! Notion database sink.
//!
//! Creates one page per capture with four properties: the raw content as the
//! page title, the capture date, and rich-text topic/summary columns.

use serde_json::Value;
use tracing::debug;

use crate::config::NotionConfig;
use crate::domain::CaptureRecord;

use super::{Sink, SinkError};

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Sink that writes captures into a Notion database
pub struct NotionSink {
    token: String,
    database_id: String,
    client: reqwest::Client,
}

/// Create-page response, normalized at the boundary.
///
/// The rest of the sink never touches the raw response shape; everything it
/// needs is extracted here.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CreatedPage {
    id: String,
    url: Option<String>,
}

impl CreatedPage {
    /// Extract the created page from a create-page response.
    ///
    /// Tolerates both a bare `{"id": ..., "url": ...}` mapping and a full
    /// page object with its extra fields. A response without an `id` is a
    /// malformed-response error, not a crash.
    fn parse(value: &Value) -> Result<Self, SinkError> {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| SinkError::MissingIdentifier {
                body: value.to_string(),
            })?;

        let url = value
            .get("url")
            .and_then(Value::as_str)
            .map(|u| u.to_string());

        Ok(Self {
            id: id.to_string(),
            url,
        })
    }

    /// Browsable URL for the page.
    ///
    /// Uses the URL returned by the API when present, otherwise derives it
    /// from the page id (Notion URLs are the id without separators).
    fn reference_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("https://www.notion.so/{}", self.id.replace('-', "")),
        }
    }
}

impl NotionSink {
    /// Create a sink for the configured database
    pub fn new(config: &NotionConfig) -> Self {
        Self {
            token: config.token.clone(),
            database_id: config.database_id.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the create-page request body for a record
    fn page_body(&self, record: &CaptureRecord) -> Value {
        serde_json::json!({
            "parent": { "database_id": self.database_id },
            "properties": {
                "Message": {
                    "title": [{ "text": { "content": record.input.content } }]
                },
                "Date": {
                    "date": { "start": record.input.timestamp.to_rfc3339() }
                },
                "Topic": {
                    "rich_text": [{ "text": { "content": record.analysis.topic } }]
                },
                "Summary": {
                    "rich_text": [{ "text": { "content": record.analysis.summary } }]
                },
            }
        })
    }
}

#[async_trait::async_trait]
impl Sink for NotionSink {
    fn id(&self) -> &str {
        "notion"
    }

    async fn write(&self, record: &CaptureRecord) -> Result<String, SinkError> {
        let response = self
            .client
            .post(format!("{}/pages", NOTION_API))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&self.page_body(record))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Status { status, body });
        }

        let value: Value = response.json().await?;
        let page = CreatedPage::parse(&value)?;
        debug!(page_id = %page.id, "Notion page created");

        Ok(page.reference_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::{AnalysisResult, CaptureInput, CaptureSource};

    fn sample_record() -> CaptureRecord {
        CaptureRecord::new(
            CaptureInput::new(
                "Focus blocks work better in the morning",
                Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
                CaptureSource::Text,
            ),
            AnalysisResult {
                topic: "Deep Work".to_string(),
                summary: "Morning focus blocks are more effective.".to_string(),
            },
        )
    }

    #[test]
    fn test_parse_bare_mapping() {
        let value = serde_json::json!({
            "id": "abc-123",
            "url": "https://x/abc-123"
        });

        let page = CreatedPage::parse(&value).unwrap();
        assert_eq!(page.id, "abc-123");
        assert_eq!(page.reference_url(), "https://x/abc-123");
    }

    #[test]
    fn test_parse_full_page_object() {
        // Real create responses carry many more fields than the id
        let value = serde_json::json!({
            "object": "page",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "created_time": "2024-03-05T14:30:00.000Z",
            "properties": { "Message": {} },
            "url": "https://www.notion.so/598337872cf94fdf8782e53db20768a5"
        });

        let page = CreatedPage::parse(&value).unwrap();
        assert_eq!(page.id, "59833787-2cf9-4fdf-8782-e53db20768a5");
        assert_eq!(
            page.reference_url(),
            "https://www.notion.so/598337872cf94fdf8782e53db20768a5"
        );
    }

    #[test]
    fn test_parse_derives_url_from_id() {
        let value = serde_json::json!({ "id": "59833787-2cf9-4fdf-8782-e53db20768a5" });

        let page = CreatedPage::parse(&value).unwrap();
        assert_eq!(
            page.reference_url(),
            "https://www.notion.so/598337872cf94fdf8782e53db20768a5"
        );
    }

    #[test]
    fn test_parse_missing_id_is_error() {
        let value = serde_json::json!({ "object": "error", "message": "boom" });

        let result = CreatedPage::parse(&value);
        assert!(matches!(result, Err(SinkError::MissingIdentifier { .. })));
    }

    #[test]
    fn test_page_body_carries_four_properties() {
        let config = NotionConfig {
            token: "secret".to_string(),
            database_id: "db-1".to_string(),
        };
        let sink = NotionSink::new(&config);
        let body = sink.page_body(&sample_record());

        assert_eq!(body["parent"]["database_id"], "db-1");
        assert_eq!(
            body["properties"]["Message"]["title"][0]["text"]["content"],
            "Focus blocks work better in the morning"
        );
        assert_eq!(
            body["properties"]["Date"]["date"]["start"],
            "2024-03-05T14:30:00+00:00"
        );
        assert_eq!(
            body["properties"]["Topic"]["rich_text"][0]["text"]["content"],
            "Deep Work"
        );
        assert_eq!(
            body["properties"]["Summary"]["rich_text"][0]["text"]["content"],
            "Morning focus blocks are more effective."
        );
    }
}
