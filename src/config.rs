//! Process configuration.
//!
//! All settings come from environment variables, read once at startup into
//! an explicit struct that is passed by reference into the orchestrator and
//! sink constructors. Sink credentials are optional as a pair: a fully
//! configured pair activates the sink, a half-configured pair is a startup
//! error rather than a silently inactive sink.

use anyhow::{Context, Result};

/// Resolved configuration for one process
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub telegram_token: String,
    /// When set, messages from any other chat are ignored
    pub telegram_chat_id: Option<i64>,
    /// OpenAI key, used for both analysis and transcription
    pub openai_api_key: String,
    /// Notion sink credentials (sink active when present)
    pub notion: Option<NotionConfig>,
    /// Vault sink credentials (sink active when present)
    pub vault: Option<VaultConfig>,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
}

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub token: String,
    /// "owner/repo"
    pub repo: String,
    pub branch: String,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (tests inject a map)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_token = require(&get, "TG_TOKEN")?;
        let openai_api_key = require(&get, "OPENAI_API_KEY")?;

        let telegram_chat_id = match non_empty(get("TG_CHAT_ID")) {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .with_context(|| format!("TG_CHAT_ID is not a valid chat id: {}", raw))?,
            ),
            None => None,
        };

        let notion = sink_pair(&get, "NOTION_TOKEN", "NOTION_DB_ID")?.map(
            |(token, database_id)| NotionConfig { token, database_id },
        );

        let vault = sink_pair(&get, "GITHUB_TOKEN", "GITHUB_REPO")?.map(|(token, repo)| {
            VaultConfig {
                token,
                repo,
                branch: non_empty(get("GITHUB_BRANCH")).unwrap_or_else(|| "main".to_string()),
            }
        });

        Ok(Self {
            telegram_token,
            telegram_chat_id,
            openai_api_key,
            notion,
            vault,
        })
    }

    /// Ids of the sinks this configuration activates
    pub fn active_sinks(&self) -> Vec<&'static str> {
        let mut active = Vec::new();
        if self.notion.is_some() {
            active.push("notion");
        }
        if self.vault.is_some() {
            active.push("vault");
        }
        active
    }
}

/// A required variable must be present and non-empty
fn require(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    non_empty(get(key))
        .with_context(|| format!("{} environment variable is not set", key))
}

/// Both variables present activates the sink; exactly one is a mistake
fn sink_pair(
    get: &impl Fn(&str) -> Option<String>,
    first: &str,
    second: &str,
) -> Result<Option<(String, String)>> {
    match (non_empty(get(first)), non_empty(get(second))) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => anyhow::bail!("{} is set but {} is missing", first, second),
        (None, Some(_)) => anyhow::bail!("{} is set but {} is missing", second, first),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_minimal_config_has_no_sinks() {
        let config = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
        ]))
        .unwrap();

        assert!(config.notion.is_none());
        assert!(config.vault.is_none());
        assert!(config.active_sinks().is_empty());
        assert!(config.telegram_chat_id.is_none());
    }

    #[test]
    fn test_missing_required_variable() {
        let result = Config::from_lookup(lookup(&[("TG_TOKEN", "tg")]));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_empty_counts_as_unset() {
        let result = Config::from_lookup(lookup(&[
            ("TG_TOKEN", ""),
            ("OPENAI_API_KEY", "sk"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_both_sinks_active() {
        let config = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
            ("NOTION_TOKEN", "nt"),
            ("NOTION_DB_ID", "db"),
            ("GITHUB_TOKEN", "gh"),
            ("GITHUB_REPO", "alice/brain"),
        ]))
        .unwrap();

        assert_eq!(config.active_sinks(), vec!["notion", "vault"]);
        assert_eq!(config.vault.as_ref().unwrap().branch, "main");
    }

    #[test]
    fn test_vault_branch_override() {
        let config = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
            ("GITHUB_TOKEN", "gh"),
            ("GITHUB_REPO", "alice/brain"),
            ("GITHUB_BRANCH", "notes"),
        ]))
        .unwrap();

        assert_eq!(config.vault.unwrap().branch, "notes");
    }

    #[test]
    fn test_half_configured_sink_is_an_error() {
        let result = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
            ("NOTION_TOKEN", "nt"),
        ]));

        let message = result.unwrap_err().to_string();
        assert!(message.contains("NOTION_DB_ID"));
    }

    #[test]
    fn test_chat_id_parsing() {
        let config = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
            ("TG_CHAT_ID", "-10012345"),
        ]))
        .unwrap();
        assert_eq!(config.telegram_chat_id, Some(-10012345));

        let bad = Config::from_lookup(lookup(&[
            ("TG_TOKEN", "tg"),
            ("OPENAI_API_KEY", "sk"),
            ("TG_CHAT_ID", "not-a-number"),
        ]));
        assert!(bad.is_err());
    }
}
