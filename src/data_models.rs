use serde::{Deserialize, Serialize};

/// Upper bound on search results handed to the prompt, whatever the source reports.
pub const MAX_RESULTS: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub rank: u32,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub display_link: String,
}

impl SearchResult {
    pub fn new(
        rank: u32,
        title: String,
        link: String,
        snippet: String,
        display_link: String,
    ) -> SearchResult {
        SearchResult {
            rank,
            title,
            link,
            snippet,
            display_link,
        }
    }

    /// Entry scraped from the HTML fallback; it carries no snippet or display link.
    pub fn from_anchor(rank: u32, title: String, link: String) -> SearchResult {
        SearchResult::new(rank, title, link, "".to_string(), "".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryRequest {
    pub query: String,
    pub debug: bool,
    /// Search scope supplied by the caller; the configured scope wins.
    pub cx: Option<String>,
    /// Search credential supplied by the caller; the configured key wins.
    pub cse_key: Option<String>,
}

impl SummaryRequest {
    pub fn new(query: impl Into<String>) -> SummaryRequest {
        SummaryRequest {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> SummaryRequest {
        self.debug = debug;
        self
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ModelAttempt {
    pub model: String,
    /// HTTP status of the completion call, `0` when the transport failed.
    pub status: u16,
}

impl ModelAttempt {
    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Which search source produced the results fed to the prompt.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverPath {
    Primary,
    Fallback,
    #[default]
    None,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub cse_attempted: bool,
    pub cse_ok: bool,
    pub ddg_used: bool,
    pub resolver_path: ResolverPath,
    pub model: String,
    pub model_used: Option<String>,
    pub openrouter_ok: bool,
    pub openrouter_status: Option<u16>,
    pub attempts: Vec<ModelAttempt>,
}

impl Diagnostics {
    pub fn new(primary_model: impl Into<String>) -> Diagnostics {
        Diagnostics {
            model: primary_model.into(),
            ..Default::default()
        }
    }

    pub fn record_attempts(&mut self, attempts: &[ModelAttempt]) {
        self.openrouter_status = attempts.last().map(|a| a.status);
        self.openrouter_ok = attempts.last().is_some_and(ModelAttempt::succeeded);
        self.attempts = attempts.to_vec();
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: String,
    pub raw_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub instagram: String,
    pub package: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeadReceipt {
    pub success: bool,
    pub message: String,
    pub record_id: String,
}

impl LeadReceipt {
    pub fn new(record_id: String) -> LeadReceipt {
        LeadReceipt {
            success: true,
            message: "Lead submitted successfully".to_string(),
            record_id,
        }
    }
}
