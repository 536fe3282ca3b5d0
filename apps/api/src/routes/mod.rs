pub mod analyze;
pub mod health;
pub mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(analyze::handle_analyze))
        .route("/api/analyze", post(analyze::handle_analyze))
        .route("/api/models", get(models::handle_list_models))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, DEFAULT_API_BASE, DEFAULT_MODEL};
    use crate::models::analysis::AnalysisMode;
    use crate::pipeline::tests::{CountingExtractor, Reply, StubModel, JOB_80, VALID_JSON};
    use crate::pipeline::Pipeline;

    const BOUNDARY: &str = "resume-api-test-boundary";

    fn test_config(mode: AnalysisMode) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_api_base: DEFAULT_API_BASE.to_string(),
            analysis_mode: mode,
            port: 0,
            request_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
            rust_log: "debug".to_string(),
        }
    }

    fn app(mode: AnalysisMode, model: StubModel) -> Router {
        let llm = Arc::new(model);
        let pipeline = Pipeline::new(mode, Arc::new(CountingExtractor::real()), llm.clone());
        build_router(AppState {
            pipeline: Arc::new(pipeline),
            llm,
            config: Arc::new(test_config(mode)),
        })
    }

    fn multipart_body(resume: Option<(&str, &str)>, job_field: &str, job: &str) -> String {
        let mut body = String::new();
        if let Some((filename, content)) = resume {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{job_field}\"\r\n\r\n{job}\r\n--{BOUNDARY}--\r\n"
        ));
        body
    }

    fn analyze_request(uri: &str, body: String) -> Request<Body> {
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

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const RESUME_TXT: &str = "Jane Doe\nSenior Rust Engineer\nTokio, PostgreSQL, Kubernetes";

    #[tokio::test]
    async fn test_health_reports_identity_and_mode() {
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-analyzer-api");
        assert_eq!(body["mode"], "strict_json");
    }

    #[tokio::test]
    async fn test_strict_analyze_returns_data_object() {
        let body = multipart_body(Some(("resume.txt", RESUME_TXT)), "job_description", JOB_80);
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(analyze_request("/api/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["data"],
            serde_json::from_str::<Value>(VALID_JSON).unwrap()
        );
    }

    #[tokio::test]
    async fn test_narrative_analyze_returns_text_and_preview() {
        let body = multipart_body(Some(("resume.txt", RESUME_TXT)), "job_requirements", JOB_80);
        let response = app(AnalysisMode::Narrative, StubModel::text("**SCORE: 81/100**"))
            .oneshot(analyze_request("/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["analysis"], "**SCORE: 81/100**");
        assert_eq!(body["resumePreview"], RESUME_TXT);
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_missing_resume_is_400() {
        let body = multipart_body(None, "job_description", JOB_80);
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(analyze_request("/api/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "MISSING_INPUT");
        assert_eq!(body["error"], "No resume file provided");
    }

    #[tokio::test]
    async fn test_unsupported_format_is_400() {
        let body = multipart_body(Some(("resume.xyz", RESUME_TXT)), "job_description", JOB_80);
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(analyze_request("/api/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["kind"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_invalid_model_output_is_502_with_raw_response() {
        let body = multipart_body(Some(("resume.txt", RESUME_TXT)), "job_description", JOB_80);
        let response = app(
            AnalysisMode::StrictJson,
            StubModel::text("I think the match is 72%"),
        )
        .oneshot(analyze_request("/api/analyze", body))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "MODEL_INVALID");
        assert_eq!(body["rawResponse"], "I think the match is 72%");
    }

    #[tokio::test]
    async fn test_blocked_model_is_422() {
        let body = multipart_body(Some(("resume.txt", RESUME_TXT)), "job_description", JOB_80);
        let response = app(
            AnalysisMode::Narrative,
            StubModel::new(Reply::Blocked("finish reason: SAFETY".to_string())),
        )
        .oneshot(analyze_request("/analyze", body))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["kind"], "MODEL_BLOCKED");
    }

    #[tokio::test]
    async fn test_non_multipart_request_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"job_description":"x"}"#))
            .unwrap();
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "MISSING_INPUT");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid upload"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_model_times_out_with_json_error() {
        let body = multipart_body(Some(("resume.txt", RESUME_TXT)), "job_description", JOB_80);
        let response = app(AnalysisMode::StrictJson, StubModel::new(Reply::Stalled))
            .oneshot(analyze_request("/api/analyze", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "UPSTREAM_FAILURE");
        assert_eq!(body["error"], "Analysis timed out after 5 seconds");
    }

    #[tokio::test]
    async fn test_models_route_lists_catalog() {
        let response = app(AnalysisMode::StrictJson, StubModel::text(VALID_JSON))
            .oneshot(Request::get("/api/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["models"], serde_json::json!([]));
    }
}
