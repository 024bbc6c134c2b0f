// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router
//! directly without starting the full binary.

use crate::models::analysis::{
    AiSummary, AnalysisResult, AnalyzeRequest, Detail, DetailKind, StructuredDataReport,
};
use crate::models::page::PageData;
use crate::models::robots::{RobotsAnalysis, RobotsStatus, RobotsTextResponse};
use crate::models::version::VersionResponse;
use crate::services::analysis::perform_complete_analysis;
use crate::services::gemini::GeminiClient;
use crate::services::page::fetch_page_data;
use crate::services::robots::{self, RobotsFetch};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SCANNER_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SCANNER_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client for all outbound fetches.
    pub http: reqwest::Client,
    /// `None` when no API key is configured; analysis then uses fallback text.
    pub gemini: Option<Arc<GeminiClient>>,
}

// ---------------------------------------------------------------------------
// Request/response glue
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UrlQuery {
    /// URL of the page to analyze
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TargetQuery {
    /// URL of the site whose robots.txt should be fetched
    pub target: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, body = VersionResponse))
)]
pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "readiness-scanner".to_string(),
        version: VERSION.to_string(),
    })
}

/// Analyze a site's robots.txt for AI crawler permissions.
///
/// Upstream trouble (no robots.txt) stays a 200 with a descriptive status;
/// only missing input and total fetch failure become HTTP errors.
#[utoipa::path(
    get,
    path = "/api/analyze-robots",
    params(UrlQuery),
    responses(
        (status = 200, body = RobotsAnalysis),
        (status = 400, body = ErrorResponse),
        (status = 500, body = RobotsAnalysis)
    )
)]
pub async fn analyze_robots_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(raw_url) = query.url.filter(|u| !u.is_empty()) else {
        return bad_request("Missing URL");
    };

    let robots_url = match Url::parse(&raw_url).and_then(|u| robots::robots_url(&u)) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(url = %raw_url, error = %e, "cannot resolve robots.txt location");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RobotsAnalysis::unavailable()),
            )
                .into_response();
        }
    };

    match robots::fetch_robots_txt(&state.http, robots_url).await {
        Ok(RobotsFetch::Found(text)) => Json(robots::analyze_robots_text(&text)).into_response(),
        Ok(RobotsFetch::Missing) => Json(RobotsAnalysis::not_found()).into_response(),
        Err(e) => {
            tracing::warn!(url = %raw_url, error = %e, "robots.txt fetch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RobotsAnalysis::unavailable()),
            )
                .into_response()
        }
    }
}

/// Fetch a site's raw robots.txt through the server.
#[utoipa::path(
    get,
    path = "/api/fetch-robots",
    params(TargetQuery),
    responses(
        (status = 200, body = RobotsTextResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
pub async fn fetch_robots_handler(
    State(state): State<AppState>,
    Query(query): Query<TargetQuery>,
) -> Response {
    let Some(target) = query.target.filter(|t| !t.is_empty()) else {
        return bad_request("Missing target URL");
    };

    let fetch_failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to fetch robots.txt".to_string(),
            }),
        )
            .into_response()
    };

    let robots_url = match Url::parse(&target).and_then(|u| robots::robots_url(&u)) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "cannot resolve robots.txt location");
            return fetch_failed();
        }
    };

    match robots::fetch_robots_txt(&state.http, robots_url).await {
        Ok(RobotsFetch::Found(robots_text)) => {
            Json(RobotsTextResponse { robots_text }).into_response()
        }
        Ok(RobotsFetch::Missing) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "robots.txt not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "robots.txt fetch failed");
            fetch_failed()
        }
    }
}

/// Fetch a page and extract the metadata the analysis is based on.
#[utoipa::path(
    get,
    path = "/api/analyze-page",
    params(UrlQuery),
    responses(
        (status = 200, body = PageData),
        (status = 400, body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    )
)]
pub async fn analyze_page_handler(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Response {
    let Some(raw_url) = query.url.filter(|u| !u.is_empty()) else {
        return bad_request("Missing URL");
    };

    let parse_or_fetch_failed = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to fetch or parse URL".to_string(),
            }),
        )
            .into_response()
    };

    let Ok(target) = Url::parse(&raw_url) else {
        return parse_or_fetch_failed();
    };

    match fetch_page_data(&state.http, &target).await {
        Ok(page_data) => Json(page_data).into_response(),
        Err(e) => {
            tracing::warn!(url = %raw_url, error = %e, "page fetch failed");
            parse_or_fetch_failed()
        }
    }
}

/// Run the complete readiness analysis for one URL.
///
/// Always answers 200 with a renderable result; an invalid URL yields the
/// degraded envelope with `error: true`.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses((status = 200, body = AnalysisResult))
)]
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Json<AnalysisResult> {
    Json(perform_complete_analysis(&state.http, state.gemini.as_deref(), &payload.url).await)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        version_handler,
        analyze_robots_handler,
        fetch_robots_handler,
        analyze_page_handler,
        analyze_handler
    ),
    components(schemas(
        VersionResponse,
        ErrorResponse,
        RobotsAnalysis,
        RobotsStatus,
        RobotsTextResponse,
        Detail,
        DetailKind,
        PageData,
        AnalyzeRequest,
        AnalysisResult,
        StructuredDataReport,
        AiSummary
    ))
)]
pub struct ApiDoc;

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/api/analyze-robots", get(analyze_robots_handler))
        .route("/api/fetch-robots", get(fetch_robots_handler))
        .route("/api/analyze-page", get(analyze_page_handler))
        .route("/api/analyze", post(analyze_handler))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        create_router(AppState {
            http: reqwest::Client::new(),
            gemini: None,
        })
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_version_endpoint_response() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["agent"], "readiness-scanner");
        assert_eq!(json["version"], VERSION);
    }

    #[tokio::test]
    async fn test_analyze_robots_requires_url() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/analyze-robots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing URL");
    }

    #[tokio::test]
    async fn test_analyze_robots_empty_url_counts_as_missing() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/analyze-robots?url=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_robots_unparseable_url_is_server_error() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/analyze-robots?url=not-a-url")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["summary"], "Unable to analyze robots.txt file.");
        assert_eq!(json["rawContent"], "");
    }

    #[tokio::test]
    async fn test_fetch_robots_requires_target() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/fetch-robots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing target URL");
    }

    #[tokio::test]
    async fn test_analyze_page_requires_url() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/analyze-page")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze_with_empty_url_returns_degraded_envelope() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"url": ""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Invalid URL provided");
        assert_eq!(json["score"], 0);
        assert_eq!(json["robotsAnalysis"]["status"], "error");
    }

    #[tokio::test]
    async fn test_invalid_route_returns_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/invalid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
