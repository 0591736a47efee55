//! Content analysis with a non-propagating fallback.
//!
//! Analysis failure is explicitly non-fatal: a capture must still be saved
//! when enrichment fails, so every failure on this path degrades to the
//! default topic/summary instead of surfacing to the orchestrator.

use tracing::{debug, warn};

use crate::adapters::LanguageModel;
use crate::domain::AnalysisResult;

/// Instruction sent with every analysis call
const ANALYSIS_INSTRUCTION: &str = "\
You are an expert at analyzing and categorizing text content for a personal \
knowledge management system.

For each message, provide:
1. A concise topic (1-3 words) that captures the main subject or theme
2. A brief summary (1-2 sentences) that highlights the key points or insights

Guidelines:
- Topics should be specific and meaningful (e.g., \"Python Debugging\" instead of just \"Programming\")
- Summaries should capture the essence and any actionable insights
- If the content is a question, include the question in the summary
- If the content is a task or todo, make it clear in the summary
- If the content is a reference or link, note what it's about

Format your response as JSON with two fields:
- topic: the concise topic
- summary: the brief summary";

/// Analyzes message content into a topic and summary
pub struct Analyzer {
    model: Box<dyn LanguageModel>,
}

impl Analyzer {
    /// Create an analyzer backed by the given language model
    pub fn new(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Analyze content. Never fails; a failed or unparsable analysis yields
    /// the default result.
    pub async fn analyze(&self, content: &str) -> AnalysisResult {
        let raw = match self.model.complete_json(ANALYSIS_INSTRUCTION, content).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Analysis call failed, using fallback");
                return AnalysisResult::default();
            }
        };

        match parse_analysis(&raw) {
            Ok(analysis) => {
                debug!(topic = %analysis.topic, "Content analyzed");
                analysis
            }
            Err(e) => {
                warn!(error = %e, raw = %raw, "Unparsable analysis reply, using fallback");
                AnalysisResult::default()
            }
        }
    }
}

/// Parse the raw model reply into the fixed analysis shape.
///
/// Both `topic` and `summary` are required; extra fields are ignored.
fn parse_analysis(raw: &str) -> Result<AnalysisResult, serde_json::Error> {
    serde_json::from_str(raw)
}
