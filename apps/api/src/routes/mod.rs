pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::application::handlers as application;
use crate::credentials::handlers as credentials;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        // Application API
        .route(
            "/api/v1/applications/options",
            get(application::handle_options),
        )
        .route(
            "/api/v1/applications/generate",
            post(application::handle_generate),
        )
        // Credentials API
        .route(
            "/api/v1/credentials",
            post(credentials::handle_store_credential),
        )
        .route(
            "/api/v1/credentials/:session_id",
            delete(credentials::handle_delete_credential),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::credentials::CredentialStore;
    use crate::gateway::mock::MockBackend;
    use crate::gateway::Gateway;

    const GOOD_REPLY: &str = r#"{
        "subject": "**Rust** at Acme",
        "emailBody": "Dear team, ...",
        "coverLetter": "Dear Sir or Madam, ...",
        "salaryNote": "1.2M HUF gross",
        "skillAlignment": [
            {"label": "Text LLMs", "score": 90},
            {"label": "Prompt engineering", "score": 85},
            {"label": "Visual AI", "score": 20},
            {"label": "Automation", "score": 60},
            {"label": "Data analysis", "score": 75}
        ]
    }"#;

    fn app(backend: Arc<MockBackend>, config: Config) -> Router {
        build_router(AppState {
            gateway: Gateway::new(backend),
            credentials: CredentialStore::new(Duration::hours(24)),
            config,
        })
    }

    fn application() -> Value {
        json!({
            "cvText": "Eight years of Rust.",
            "jobDescription": "Rust engineer for our payments platform.",
            "company": "Acme",
            "position": "Rust Engineer",
            "salary": "1.2M HUF",
            "style": "data_driven",
            "tone": "informal"
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let response = app(backend, Config::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_with_inline_key() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let response = app(backend.clone(), Config::default())
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application(), "apiKey": "user-key" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"]["subject"], "**Rust** at Acme");
        assert_eq!(body["copy"]["subject"]["plain"], "Rust at Acme");
        assert_eq!(
            body["copy"]["coverLetter"]["plain"],
            "Dear Sir or Madam, ...\n\n1.2M HUF gross"
        );
        assert_eq!(backend.calls(), 1);
        let (request, credential) = backend.last_call().unwrap();
        assert_eq!(credential, "user-key");
        assert!(request.instruction.contains("Rust engineer for our payments platform."));
    }

    #[tokio::test]
    async fn test_generate_without_any_key_is_unauthorized() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let response = app(backend.clone(), Config::default())
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "MISSING_CREDENTIAL");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_server_key() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let config = Config {
            gemini_api_key: Some("server-key".to_string()),
            ..Config::default()
        };
        let response = app(backend.clone(), config)
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application(), "apiKey": "  " }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.last_call().unwrap().1, "server-key");
    }

    #[tokio::test]
    async fn test_invalid_form_is_rejected_before_dispatch() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let mut form = application();
        form["cvText"] = json!("");
        let response = app(backend.clone(), Config::default())
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": form, "apiKey": "user-key" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_skill_is_validation_error() {
        for bad in [json!(300), json!(-1), json!(3.5)] {
            let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
            let mut form = application();
            form["aiSkills"] = json!({
                "llm": bad, "prompting": 3, "visualAi": 1, "automation": 2, "analysis": 3
            });
            let response = app(backend.clone(), Config::default())
                .oneshot(post_json(
                    "/api/v1/applications/generate",
                    json!({ "application": form, "apiKey": "user-key" }),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "skill value {bad}");
            assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
            assert_eq!(backend.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_required_keys_are_validation_errors() {
        for (key, needle) in [
            ("jobDescription", "job description"),
            ("company", "company"),
            ("position", "position"),
        ] {
            let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
            let mut form = application();
            form.as_object_mut().unwrap().remove(key);
            let response = app(backend.clone(), Config::default())
                .oneshot(post_json(
                    "/api/v1/applications/generate",
                    json!({ "application": form, "apiKey": "user-key" }),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "missing {key}");
            let body = body_json(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert!(body["error"]["message"].as_str().unwrap().contains(needle));
            assert_eq!(backend.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_is_validation_error() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/applications/generate")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(backend, Config::default()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let config = Config {
            cv_file_max_bytes: 3,
            ..Config::default()
        };
        let mut form = application();
        form["cvText"] = json!("x".repeat(config.max_body_bytes() + 1));
        let response = app(backend.clone(), config)
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": form, "apiKey": "user-key" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_backend_reply_is_bad_gateway() {
        let backend = Arc::new(MockBackend::replying("{not valid json"));
        let response = app(backend, Config::default())
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application(), "apiKey": "user-key" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"]["code"], "MALFORMED_RESPONSE");
    }

    #[tokio::test]
    async fn test_stored_session_credential_is_used() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let router = app(backend.clone(), Config::default());

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/credentials",
                json!({ "apiKey": "stored-key" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let session_id = body_json(response).await["sessionId"]
            .as_str()
            .unwrap()
            .to_string();

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application(), "sessionId": session_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.last_call().unwrap().1, "stored-key");

        let response = router
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/credentials/{session_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = router
            .oneshot(post_json(
                "/api/v1/applications/generate",
                json!({ "application": application(), "sessionId": session_id }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_credential_cannot_be_stored() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let response = app(backend, Config::default())
            .oneshot(post_json("/api/v1/credentials", json!({ "apiKey": " " })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_options_lists_presets_and_limits() {
        let backend = Arc::new(MockBackend::replying(GOOD_REPLY));
        let response = app(backend, Config::default())
            .oneshot(
                Request::get("/api/v1/applications/options")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["styles"].as_array().unwrap().len(), 7);
        assert_eq!(body["tones"].as_array().unwrap().len(), 3);
        assert_eq!(body["skills"].as_array().unwrap().len(), 5);
        assert_eq!(body["defaultStyle"], "professional");
        assert_eq!(body["defaultTone"], "formal");
        assert_eq!(body["limits"]["jobDescriptionMaxChars"], 1500);
    }
}
