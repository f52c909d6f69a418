use anyhow::Context;
use reqwest::Client;
use serde::Serialize;

use crate::data_models::ModelAttempt;
use crate::extract::ChatCompletion;
use crate::fallback::{Outcome, Step, first_success};

pub const SYSTEM_INSTRUCTION: &str =
    "Be concise, premium, and authoritative. Never include code fences or JSON in responses. Max 2 lines total.";

const SITE_URL: &str = "https://Prestigepositioning.com/";
const SITE_TITLE: &str = "Prestigepositioning Search Summary";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.65,
            max_tokens: 260,
        }
    }
}

/// Winning model and its response body, which may still fail to decode.
pub type Completed = (String, anyhow::Result<ChatCompletion>);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

/// Calls the completion API with each candidate model in turn until one answers
/// with a success status. The response content is not inspected before accepting.
pub struct ModelChain<'a> {
    client: &'a Client,
    api_url: &'a str,
    api_key: &'a str,
    options: CompletionOptions,
}

impl<'a> ModelChain<'a> {
    pub fn new(client: &'a Client, api_url: &'a str, api_key: &'a str) -> Self {
        Self {
            client,
            api_url,
            api_key,
            options: CompletionOptions::default(),
        }
    }

    /// `winner` holds the successful model and its response body; `trail`
    /// holds one [`ModelAttempt`] per call made.
    pub async fn run(&self, prompt: &str, models: &[String]) -> Outcome<Completed, ModelAttempt> {
        let messages = [Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)];
        let messages = &messages;
        first_success(models.iter().cloned(), move |model| {
            self.attempt(messages, model)
        })
        .await
    }

    async fn attempt(&self, messages: &[Message], model: String) -> Step<Completed, ModelAttempt> {
        let body = ChatRequest {
            model: &model,
            messages,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let sent = self
            .client
            .post(self.api_url)
            .bearer_auth(self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::REFERER, SITE_URL)
            .header("HTTP-Referer", SITE_URL)
            .header("X-Title", SITE_TITLE)
            .json(&body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%model, "completion request failed: {}", e.without_url());
                return Step::Reject(ModelAttempt { model, status: 0 });
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%model, status = status.as_u16(), "model candidate rejected");
            return Step::Reject(ModelAttempt {
                model,
                status: status.as_u16(),
            });
        }

        tracing::info!(%model, "model candidate succeeded");
        let completion = response
            .json::<ChatCompletion>()
            .await
            .context("undecodable completion body");
        let attempt = ModelAttempt {
            model: model.clone(),
            status: status.as_u16(),
        };
        Step::Accept((model, completion), attempt)
    }
}
