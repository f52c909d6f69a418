use serde::Deserialize;

use crate::data_models::{LeadSubmission, SummaryRequest};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cx: Option<String>,
    #[serde(default)]
    pub cse_key: Option<String>,
    #[serde(default)]
    pub debug: Option<bool>,
}

impl From<SummarizeBody> for SummaryRequest {
    fn from(body: SummarizeBody) -> Self {
        SummaryRequest {
            query: body.name.unwrap_or_default(),
            debug: body.debug.unwrap_or(false),
            cx: body.cx,
            cse_key: body.cse_key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeadBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
}

impl From<LeadBody> for LeadSubmission {
    fn from(body: LeadBody) -> Self {
        LeadSubmission {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            instagram: body.instagram.unwrap_or_default(),
            package: body.package.unwrap_or_default(),
        }
    }
}
