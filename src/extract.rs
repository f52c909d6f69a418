use serde::Deserialize;

use crate::data_models::{Diagnostics, SummaryResponse};

/// Chat-completion envelope. Every field is optional so a thin or odd
/// response still decodes; missing pieces read as empty text.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Trimmed content of the first choice, or `""` when there is none.
pub fn extract_text(completion: &ChatCompletion) -> String {
    completion
        .choices
        .first()
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.as_deref())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn default_summary(query: &str) -> String {
    format!(
        "{}, your current presence isn't enough. Let's elevate your PR and make sure you're seen as #1.",
        query.trim()
    )
}

/// Packages the extracted text. Diagnostics are only attached when asked for.
pub fn assemble_response(
    text: String,
    query: &str,
    result_count: usize,
    diagnostics: Diagnostics,
    debug: bool,
) -> SummaryResponse {
    let summary = if text.is_empty() {
        default_summary(query)
    } else {
        text
    };
    SummaryResponse {
        summary,
        raw_count: result_count,
        diagnostics: debug.then_some(diagnostics),
    }
}
