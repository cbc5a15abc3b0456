pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::analysis::handlers;
use crate::config::CorsOrigins;
use crate::rate_limit::enforce_rate_limit;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_request_bytes());

    // Model-backed routes share the process-wide rate limiter.
    let model_routes = Router::new()
        .route("/extract", post(handlers::handle_extract))
        .route("/analyze", post(handlers::handle_analyze))
        .route("/analyze/batch", post(handlers::handle_analyze_batch))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_rate_limit,
        ));

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/models", get(health::models_handler))
        .route(
            "/analyze/heuristic",
            post(handlers::handle_analyze_heuristic),
        )
        .merge(model_routes)
        .layer(body_limit)
        .with_state(state)
}

/// Wildcard origins get a fully open policy without credentials; an explicit
/// list allows credentials and mirrors the requested methods and headers.
pub fn build_cors_layer(origins: &CorsOrigins) -> CorsLayer {
    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{origin}'");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::service::tests::{StubProvider, GOOD_ANALYSIS};
    use crate::config::test_config;
    use crate::extraction::docx::tests::build_docx;
    use crate::extraction::pdf::tests::build_pdf;
    use crate::llm_client::LlmError;
    use crate::rate_limit::RateLimiter;

    const BOUNDARY: &str = "cv-analyzer-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_request(uri: &str, parts: Vec<Part<'_>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn state_with(llm: StubProvider, min_interval: Duration) -> AppState {
        AppState {
            llm: Arc::new(llm),
            config: test_config(),
            rate_limiter: Arc::new(RateLimiter::new(min_interval)),
        }
    }

    fn app(llm: StubProvider) -> Router {
        build_router(state_with(llm, Duration::ZERO))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let (status, body) = send(app(StubProvider::always("{}")), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "stub-model");
    }

    #[tokio::test]
    async fn test_root() {
        let (status, body) = send(app(StubProvider::always("{}")), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API root");
    }

    #[tokio::test]
    async fn test_models_lists_at_most_fifty() {
        let (status, body) = send(app(StubProvider::always("{}")), get("/models")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 60);
        assert_eq!(body["models"].as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_analyze_returns_model_analysis() {
        let request = multipart_request(
            "/analyze",
            vec![
                Part::File("cv_file", "jane.txt", b"Support engineer with SQL".to_vec()),
                Part::Text("job_description", "Need SQL"),
            ],
        );
        let (status, body) = send(app(StubProvider::always(GOOD_ANALYSIS)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fit_score"], 81);
        assert_eq!(body["expected_salary_note"], "₪18K–₪22K");
    }

    #[tokio::test]
    async fn test_analyze_requires_job_description() {
        let request = multipart_request(
            "/analyze",
            vec![Part::File("cv_file", "jane.txt", b"text".to_vec())],
        );
        let (status, body) = send(app(StubProvider::always(GOOD_ANALYSIS)), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_rejects_binary_upload() {
        let request = multipart_request(
            "/analyze",
            vec![
                Part::File("cv_file", "photo.png", vec![0x89, b'P', b'N', b'G', 0, 0, 0xff]),
                Part::Text("job_description", "Need SQL"),
            ],
        );
        let (status, body) = send(app(StubProvider::always(GOOD_ANALYSIS)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_413() {
        let mut config = test_config();
        config.max_file_size_mb = 1;
        let state = AppState {
            config,
            ..state_with(StubProvider::always(GOOD_ANALYSIS), Duration::ZERO)
        };
        let request = multipart_request(
            "/analyze",
            vec![
                Part::File("cv_file", "big.txt", vec![b'a'; 1024 * 1024 + 10]),
                Part::Text("job_description", "Need SQL"),
            ],
        );
        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_invalid_model_output_is_500_with_excerpt() {
        let request = multipart_request(
            "/analyze",
            vec![
                Part::File("cv_file", "jane.txt", b"text".to_vec()),
                Part::Text("job_description", "Need SQL"),
            ],
        );
        let llm = StubProvider::always(r#"{"fit_score": "high"}"#);
        let (status, body) = send(app(llm), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INVALID_MODEL_OUTPUT");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains(r#"{"fit_score": "high"}"#));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_502() {
        let request = multipart_request(
            "/extract",
            vec![Part::File("cv_file", "jane.txt", b"text".to_vec())],
        );
        let llm = StubProvider::new(vec![Err(LlmError::Api {
            status: 500,
            message: "boom".into(),
        })]);
        let (status, body) = send(app(llm), request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_extract_returns_fields_from_docx() {
        let docx = build_docx("<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>");
        let request = multipart_request("/extract", vec![Part::File("cv_file", "jane.docx", docx)]);
        let llm = StubProvider::always(r#"{"name": "Jane Doe", "skills": ["SQL"], "education": []}"#);
        let (status, body) = send(app(llm), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Doe");
        assert_eq!(body["email"], Value::Null);
        assert_eq!(body["skills"][0], "SQL");
    }

    #[tokio::test]
    async fn test_second_request_inside_interval_is_429() {
        let app = build_router(state_with(
            StubProvider::always(r#"{"name": null}"#),
            Duration::from_secs(60),
        ));
        let extract = || {
            multipart_request(
                "/extract",
                vec![Part::File("cv_file", "jane.txt", b"text".to_vec())],
            )
        };

        let (status, _) = send(app.clone(), extract()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(app.clone(), extract()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");

        // Non-model routes are not limited.
        let (status, _) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_batch_embeds_failed_items() {
        let request = multipart_request(
            "/analyze/batch",
            vec![
                Part::File("files", "a.txt", b"SQL on Linux".to_vec()),
                Part::File("files", "broken.pdf", b"garbage bytes".to_vec()),
                Part::File("files", "c.txt", b"Support".to_vec()),
                Part::Text("job_description", "SQL, Linux, support"),
            ],
        );
        let (status, body) = send(app(StubProvider::always(GOOD_ANALYSIS)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_description"], "SQL, Linux, support");

        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["result"]["fit_score"], 81);
        assert_eq!(results[1]["filename"], "broken.pdf");
        assert_eq!(results[1]["result"]["fit_score"], 0);
        assert!(results[1]["result"]["fit_reason"]
            .as_str()
            .unwrap()
            .contains("Error"));
        assert_eq!(results[2]["result"]["fit_score"], 81);
    }

    #[tokio::test]
    async fn test_batch_without_files_is_rejected() {
        let request = multipart_request(
            "/analyze/batch",
            vec![Part::Text("job_description", "SQL")],
        );
        let (status, _) = send(app(StubProvider::always(GOOD_ANALYSIS)), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_batch_over_file_limit_is_rejected() {
        let mut parts: Vec<Part<'_>> = (0..=crate::config::MAX_BATCH_FILES)
            .map(|_| Part::File("files", "cv.txt", b"SQL".to_vec()))
            .collect();
        parts.push(Part::Text("job_description", "SQL"));
        let llm = Arc::new(StubProvider::always(GOOD_ANALYSIS));
        let state = AppState {
            llm: llm.clone(),
            ..state_with(StubProvider::new(Vec::new()), Duration::ZERO)
        };
        let (status, body) =
            send(build_router(state), multipart_request("/analyze/batch", parts)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_heuristic_scores_pdf_without_model() {
        let pdf = build_pdf(&["DEVOPS"]);
        let request = multipart_request(
            "/analyze/heuristic",
            vec![
                Part::File("cv_file", "cv.pdf", pdf),
                Part::Text("job_description", "Florist wanted"),
            ],
        );
        let llm = Arc::new(StubProvider::new(Vec::new()));
        let state = AppState {
            llm: llm.clone(),
            ..state_with(StubProvider::new(Vec::new()), Duration::ZERO)
        };
        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["fit_score"].as_u64().unwrap() <= 6);
        assert!(llm.prompts.lock().unwrap().is_empty());
        assert_eq!(
            body["salary_range"],
            "₪17K–₪23K gross (rough guide; adjust by seniority/company)."
        );
    }

    #[tokio::test]
    async fn test_heuristic_reports_gaps_from_docx() {
        let docx = build_docx("<w:p><w:r><w:t>Barista, latte art</w:t></w:r></w:p>");
        let request = multipart_request(
            "/analyze/heuristic",
            vec![
                Part::File("cv_file", "cv.docx", docx),
                Part::Text("job_description", "SQL, API and Linux"),
            ],
        );
        let (status, body) = send(app(StubProvider::new(Vec::new())), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fit_score"], 0);
        assert_eq!(body["gaps"].as_array().unwrap().len(), 4);
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_cors_layers_build() {
        let _ = build_cors_layer(&CorsOrigins::Any);
        let _ = build_cors_layer(&CorsOrigins::List(vec![
            "https://app.example".to_string(),
            "not a valid\norigin".to_string(),
        ]));
    }
}
