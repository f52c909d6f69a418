use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use prestige::api::{AppState, create_router};
use prestige::config::{AirtableConfig, Config, Endpoints, PRIMARY_MODEL};

mod test_helpers {
    use super::*;

    pub const SUMMARIZE: &str = "/.netlify/functions/summarizeSearch";
    pub const SUBMIT_LEAD: &str = "/.netlify/functions/submitLead";

    pub const JANE: &str = r#"{"name":"Jane Doe"}"#;
    pub const JANE_DEBUG: &str = r#"{"name":"Jane Doe","debug":true}"#;

    pub fn config_for(server: &ServerGuard) -> Config {
        let url = server.url();
        Config {
            openrouter_api_key: Some("or-test".to_string()),
            airtable: AirtableConfig {
                api_key: Some("at-test".to_string()),
                base_id: Some("appBASE".to_string()),
                ..AirtableConfig::default()
            },
            endpoints: Endpoints {
                cse: format!("{url}/customsearch/v1"),
                ddg_html: format!("{url}/html/"),
                openrouter: format!("{url}/api/v1/chat/completions"),
                airtable: format!("{url}/v0"),
            },
            ..Config::default()
        }
    }

    pub fn app(config: Config) -> Router {
        create_router(
            AppState::new(Arc::new(config), reqwest::Client::new()),
            "static",
        )
    }

    pub async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(app: Router, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_missing_name_is_bad_request() {
    let server = Server::new_async().await;
    let config = config_for(&server);

    let debug_only = r#"{"debug":true}"#;
    let (status, body) = post(app(config.clone()), SUMMARIZE, debug_only).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing name" }));

    let (status, body) = post(app(config), SUMMARIZE, r#"{"name":""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing name");
}

#[tokio::test]
async fn test_empty_body_is_missing_name() {
    let server = Server::new_async().await;
    let (status, body) = post(app(config_for(&server)), SUMMARIZE, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing name");
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let server = Server::new_async().await;
    let router = app(config_for(&server));
    let (status, body) = post(router, SUMMARIZE, r#"{"name":"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal error" }));
}

#[tokio::test]
async fn test_missing_completion_key() {
    let server = Server::new_async().await;
    let mut config = config_for(&server);
    config.openrouter_api_key = None;

    let (status, body) = post(app(config.clone()), SUMMARIZE, JANE).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Missing OpenRouter API key" }));

    let (status, body) = post(app(config), SUMMARIZE, JANE_DEBUG).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["diagnostics"]["attempts"], json!([]));
    assert_eq!(body["diagnostics"]["model"], PRIMARY_MODEL);
}

#[tokio::test]
async fn test_all_models_failing_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);
    let candidates = config.models.len();

    let _ddg = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(503)
        .expect(candidates)
        .create_async()
        .await;

    let (status, body) = post(app(config), SUMMARIZE, JANE_DEBUG).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "OpenRouter request failed (all models)");
    let attempts = body["diagnostics"]["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), candidates);
    assert_eq!(
        attempts[0],
        json!({ "model": PRIMARY_MODEL, "status": 503 })
    );
    assert_eq!(body["diagnostics"]["openrouterOk"], false);
}

#[tokio::test]
async fn test_successful_summary_response_shape() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);

    let page =
        r#"<a class="result__a" href="https://a.example.com">A</a><a class="result__a" href="https://b.example.com">B</a>"#;
    let completion = r#"{"choices":[{"message":{"content":"Summary: x\nConclusion: y"}}]}"#;
    let _ddg = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page)
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(200)
        .with_body(completion)
        .create_async()
        .await;

    let (status, body) = post(app(config.clone()), "/api/summarize", JANE).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "summary": "Summary: x\nConclusion: y", "rawCount": 2 })
    );

    let (status, body) = post(app(config), SUMMARIZE, JANE_DEBUG).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnostics"]["ddgUsed"], true);
    assert_eq!(body["diagnostics"]["cseAttempted"], false);
    assert_eq!(body["diagnostics"]["resolverPath"], "fallback");
    assert_eq!(body["diagnostics"]["modelUsed"], PRIMARY_MODEL);
    assert_eq!(body["diagnostics"]["openrouterStatus"], 200);
}

#[tokio::test]
async fn test_undecodable_completion_is_internal_error() {
    let mut server = Server::new_async().await;
    let config = config_for(&server);

    let _ddg = server
        .mock("GET", "/html/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/api/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>oops</html>")
        .expect(1)
        .create_async()
        .await;

    let (status, body) = post(app(config), SUMMARIZE, JANE).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal error" }));
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let server = Server::new_async().await;
    let config = config_for(&server);
    let status = get(app(config), SUMMARIZE).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_get_on_lead_route_is_not_allowed() {
    let server = Server::new_async().await;
    let config = config_for(&server);
    assert_eq!(
        get(app(config.clone()), SUBMIT_LEAD).await,
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        get(app(config), "/api/leads").await,
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[tokio::test]
async fn test_lead_requires_name_and_email() {
    let mut server = Server::new_async().await;
    let airtable = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let router = app(config_for(&server));
    let (status, body) = post(router, SUBMIT_LEAD, r#"{"name":"Jane"}"#).await;
    airtable.assert_async().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Name and email are required" }));
}

#[tokio::test]
async fn test_empty_lead_body_is_internal_error() {
    let mut server = Server::new_async().await;
    let airtable = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (status, body) = post(app(config_for(&server)), SUBMIT_LEAD, "").await;
    airtable.assert_async().await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_lead_without_record_store_config() {
    let server = Server::new_async().await;
    let mut config = config_for(&server);
    config.airtable.base_id = None;

    let (status, body) = post(
        app(config),
        SUBMIT_LEAD,
        r#"{"name":"Jane","email":"jane@example.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server configuration error");
}

#[tokio::test]
async fn test_lead_is_forwarded() {
    let mut server = Server::new_async().await;
    let table_path = Matcher::Regex("^/v0/appBASE/Lead(%20| )Submissions$".into());
    let airtable = server
        .mock("POST", table_path)
        .match_header("authorization", "Bearer at-test")
        .match_body(Matcher::PartialJson(json!({
            "fields": {
                "Name": "Jane Doe",
                "Email": "jane@example.com",
                "Instagram": "",
                "Package Interest": "Platinum",
                "Status": "New"
            }
        })))
        .with_status(200)
        .with_body(r#"{"id":"recABC123","fields":{}}"#)
        .expect(1)
        .create_async()
        .await;

    let (status, body) = post(
        app(config_for(&server)),
        "/api/leads",
        r#"{"name":"Jane Doe","email":"jane@example.com","package":"Platinum"}"#,
    )
    .await;

    airtable.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Lead submitted successfully",
            "recordId": "recABC123"
        })
    );
}

#[tokio::test]
async fn test_lead_store_rejection() {
    let mut server = Server::new_async().await;
    let _airtable = server
        .mock("POST", Matcher::Any)
        .with_status(422)
        .with_body(r#"{"error":{"type":"INVALID_VALUE_FOR_COLUMN"}}"#)
        .create_async()
        .await;

    let (status, body) = post(
        app(config_for(&server)),
        SUBMIT_LEAD,
        r#"{"name":"Jane Doe","email":"jane@example.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save to database" }));
}
