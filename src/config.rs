use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_CSE_CX: &str = "901473b4d9b1445ec";
pub const DEFAULT_LEAD_TABLE: &str = "Lead Submissions";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8888";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

pub const PRIMARY_MODEL: &str = "openrouter/auto";
// Tried in this order after the primary.
pub const FALLBACK_MODELS: [&str; 6] = [
    "meta-llama/llama-3.1-8b-instruct",
    "mistralai/mistral-7b-instruct",
    "qwen/qwen-2-7b-instruct",
    "google/gemma-2-9b",
    "deepseek/deepseek-r1-distill-llama-70b",
    "openai/gpt-3.5-turbo",
];

/// Upstream service locations.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub cse: String,
    pub ddg_html: String,
    pub openrouter: String,
    pub airtable: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cse: "https://www.googleapis.com/customsearch/v1".to_string(),
            ddg_html: "https://duckduckgo.com/html/".to_string(),
            openrouter: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            airtable: "https://api.airtable.com/v0".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub table_name: String,
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: None,
            table_name: DEFAULT_LEAD_TABLE.to_string(),
        }
    }
}

/// Process configuration. Built once at startup and handed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub google_cse_cx: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub airtable: AirtableConfig,
    /// Primary model first, then the fallbacks.
    pub models: Vec<String>,
    pub http_timeout: Duration,
    pub endpoints: Endpoints,
    pub bind_addr: String,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_cse_cx: None,
            openrouter_api_key: None,
            airtable: AirtableConfig::default(),
            models: default_models(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            endpoints: Endpoints::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_env_or_default =
            |key: &str, default: &str| get_env(key).unwrap_or_else(|| default.to_string());

        let defaults = Endpoints::default();
        let http_timeout = match get_env("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid HTTP_TIMEOUT_SECS: {raw}"))?,
            ),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Config {
            google_api_key: get_env("GOOGLE_API_KEY")
                .or_else(|| get_env("GOOGLE_CSE_KEY")),
            google_cse_cx: get_env("GOOGLE_CSE_CX"),
            openrouter_api_key: get_env("OPENROUTER_API_KEY"),
            airtable: AirtableConfig {
                api_key: get_env("AIRTABLE_API_KEY"),
                base_id: get_env("AIRTABLE_BASE_ID"),
                table_name: get_env_or_default("AIRTABLE_TABLE_NAME", DEFAULT_LEAD_TABLE),
            },
            models: default_models(),
            http_timeout,
            endpoints: Endpoints {
                cse: get_env_or_default("CSE_API_URL", &defaults.cse),
                ddg_html: get_env_or_default("DDG_HTML_URL", &defaults.ddg_html),
                openrouter: get_env_or_default("OPENROUTER_API_URL", &defaults.openrouter),
                airtable: get_env_or_default("AIRTABLE_API_URL", &defaults.airtable),
            },
            bind_addr: get_env_or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            static_dir: get_env_or_default("STATIC_DIR", DEFAULT_STATIC_DIR),
        })
    }

    pub fn primary_model(&self) -> &str {
        self.models
            .first()
            .map(String::as_str)
            .unwrap_or(PRIMARY_MODEL)
    }

    /// Shared outbound client. Every upstream call is bounded by `http_timeout`.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn default_models() -> Vec<String> {
    std::iter::once(PRIMARY_MODEL)
        .chain(FALLBACK_MODELS)
        .map(str::to_string)
        .collect()
}
