use axum::{Router, routing::post};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::leads::LeadService;
use crate::pipeline::SummaryPipeline;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SummaryPipeline>,
    pub leads: Arc<LeadService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, client: reqwest::Client) -> Self {
        Self {
            pipeline: Arc::new(SummaryPipeline::new(config.clone(), client.clone())),
            leads: Arc::new(LeadService::new(config, client)),
        }
    }
}

pub fn create_router(state: AppState, static_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes; the function paths are the ones the site already posts to
        .route(
            "/.netlify/functions/summarizeSearch",
            post(handlers::summarize_handler),
        )
        .route("/api/summarize", post(handlers::summarize_handler))
        .route(
            "/.netlify/functions/submitLead",
            post(handlers::submit_lead_handler),
        )
        .route("/api/leads", post(handlers::submit_lead_handler))
        .with_state(state)
        // Static file serving for the site
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
