use reqwest::Client;
use std::sync::Arc;

use crate::config::{Config, DEFAULT_CSE_CX};
use crate::data_models::{Diagnostics, SummaryRequest, SummaryResponse};
use crate::error::SummaryError;
use crate::extract::{assemble_response, extract_text};
use crate::llm::ModelChain;
use crate::prompt::build_prompt;
use crate::search::Resolver;

/// Search -> prompt -> model chain -> extraction, run once per request.
/// Holds no state between runs beyond the configuration and the HTTP client.
pub struct SummaryPipeline {
    config: Arc<Config>,
    client: Client,
}

impl SummaryPipeline {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    pub async fn summarize(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, SummaryError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SummaryError::MissingName);
        }

        let mut diagnostics = Diagnostics::new(self.config.primary_model());
        let gate = |diagnostics: Diagnostics| request.debug.then_some(diagnostics);

        let Some(openrouter_key) = self.config.openrouter_api_key.as_deref() else {
            tracing::error!("completion API key is not configured");
            return Err(SummaryError::MissingApiKey {
                diagnostics: gate(diagnostics),
            });
        };

        let search_key = self
            .config
            .google_api_key
            .as_deref()
            .or(non_empty(request.cse_key.as_deref()));
        let cx = self
            .config
            .google_cse_cx
            .as_deref()
            .or(non_empty(request.cx.as_deref()))
            .unwrap_or(DEFAULT_CSE_CX);

        let resolution = Resolver::new(&self.client, &self.config.endpoints)
            .resolve(query, search_key, cx)
            .await;
        diagnostics.cse_attempted = resolution.cse_attempted;
        diagnostics.cse_ok = resolution.cse_ok;
        diagnostics.ddg_used = resolution.ddg_used;
        diagnostics.resolver_path = resolution.path;

        let prompt = build_prompt(&resolution.results);

        let endpoint = &self.config.endpoints.openrouter;
        let outcome = ModelChain::new(&self.client, endpoint, openrouter_key)
            .run(&prompt, &self.config.models)
            .await;
        diagnostics.record_attempts(&outcome.trail);

        let Some((model, completion)) = outcome.winner else {
            tracing::error!(
                attempts = outcome.trail.len(),
                "every model candidate failed"
            );
            return Err(SummaryError::AllModelsFailed {
                diagnostics: gate(diagnostics),
            });
        };
        let completion = completion.map_err(|e| {
            tracing::error!("response from {model} is unusable: {e:#}");
            SummaryError::Internal
        })?;
        diagnostics.model_used = Some(model);

        Ok(assemble_response(
            extract_text(&completion),
            query,
            resolution.results.len(),
            diagnostics,
            request.debug,
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
