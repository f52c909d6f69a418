pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod leads;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod search;
