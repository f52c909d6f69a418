use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::data_models::{LeadReceipt, LeadSubmission};
use crate::error::LeadError;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LeadFields {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Instagram")]
    pub instagram: String,
    #[serde(rename = "Package Interest")]
    pub package: String,
    #[serde(rename = "Submission Date")]
    pub submission_date: String,
    #[serde(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct LeadRecord {
    pub fields: LeadFields,
}

impl LeadRecord {
    pub fn new(lead: &LeadSubmission, date: NaiveDate) -> LeadRecord {
        LeadRecord {
            fields: LeadFields {
                name: lead.name.clone(),
                email: lead.email.clone(),
                instagram: lead.instagram.clone(),
                package: lead.package.clone(),
                submission_date: date.format("%Y-%m-%d").to_string(),
                status: "New".to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    #[serde(default)]
    id: String,
}

/// Forwards lead form submissions to the record store.
pub struct LeadService {
    config: Arc<Config>,
    client: Client,
}

impl LeadService {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        Self { config, client }
    }

    pub async fn submit(&self, lead: &LeadSubmission) -> Result<LeadReceipt, LeadError> {
        if lead.name.trim().is_empty() || lead.email.trim().is_empty() {
            return Err(LeadError::MissingFields);
        }

        let airtable = &self.config.airtable;
        let api_key = airtable.api_key.as_deref();
        let base_id = airtable.base_id.as_deref();
        let (Some(api_key), Some(base_id)) = (api_key, base_id) else {
            tracing::error!("Missing Airtable environment variables");
            return Err(LeadError::NotConfigured);
        };

        let url = self.table_url(base_id).map_err(|e| {
            tracing::error!("invalid record store url: {:#}", e);
            LeadError::Internal
        })?;
        let record = LeadRecord::new(lead, Utc::now().date_naive());

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&record)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("error submitting lead: {}", e.without_url());
                LeadError::Internal
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("record store rejected lead ({status}): {detail}");
            return Err(LeadError::Upstream);
        }

        let created: CreatedRecord = response.json().await.map_err(|e| {
            tracing::error!("undecodable record store response: {}", e.without_url());
            LeadError::Internal
        })?;
        tracing::info!("lead stored as record {}", created.id);
        Ok(LeadReceipt::new(created.id))
    }

    /// `<api>/<base id>/<table name>`, with the table name percent-encoded.
    fn table_url(&self, base_id: &str) -> Result<Url> {
        let base = &self.config.endpoints.airtable;
        let mut url = Url::parse(base)
            .with_context(|| format!("bad AIRTABLE_API_URL: {base}"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("AIRTABLE_API_URL cannot be a base"))?
            .pop_if_empty()
            .push(base_id)
            .push(&self.config.airtable.table_name);
        Ok(url)
    }
}
