//! HTTP surface
//!
//! - `GET|POST /api/recommend_last_click`: recommendations for one user
//! - `GET /health`: liveness
//! - `GET /ready`: readiness with counts of the live artifact set
//! - `POST /api/admin/artifacts/reload`: atomic artifact reload, requires
//!   `Authorization: Bearer <admin token>`

use crate::artifacts::ArtifactStats;
use crate::error::RecommendError;
use crate::recommendation::Recommender;
use crate::types::UserId;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Application state shared across all handlers
pub struct AppState {
    pub recommender: Arc<Recommender>,
    /// Bearer token accepted by admin routes; `None` disables them
    pub admin_token: Option<String>,
}

/// Query string of the recommendation endpoint.
///
/// Kept as raw strings so that malformed values surface as our own
/// `invalid_*` errors instead of a generic extractor failure.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendQuery {
    pub user_id: Option<String>,
    pub top_n: Option<String>,
}

/// Validated recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendRequest {
    pub user_id: UserId,
    pub top_n: Option<usize>,
}

impl RecommendRequest {
    /// Merge query parameters and an optional JSON body. Query values win.
    ///
    /// A body that is not valid JSON is ignored, as if none was sent.
    pub fn parse(query: &RecommendQuery, body: &[u8]) -> Result<Self, RecommendError> {
        let body: Option<Value> = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };
        let body_field = |name: &str| {
            body.as_ref()
                .and_then(|b| b.get(name))
                .filter(|v| !v.is_null())
        };

        // A present but blank query value counts as absent
        let query_user_id = non_blank(query.user_id.as_deref());
        let query_top_n = non_blank(query.top_n.as_deref());

        let user_id = match (query_user_id, body_field("user_id")) {
            (Some(raw), _) => raw.parse::<UserId>()?,
            (None, Some(value)) => user_id_from_json(value)?,
            (None, None) => return Err(RecommendError::MissingUserId),
        };

        let top_n = match (query_top_n, body_field("top_n")) {
            (Some(raw), _) => Some(parse_top_n(raw)?),
            (None, Some(value)) => Some(top_n_from_json(value)?),
            (None, None) => None,
        };

        Ok(Self { user_id, top_n })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn user_id_from_json(value: &Value) -> Result<UserId, RecommendError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(UserId)
            .ok_or_else(|| RecommendError::InvalidUserId(n.to_string())),
        Value::String(s) => s.parse(),
        other => Err(RecommendError::InvalidUserId(other.to_string())),
    }
}

fn parse_top_n(raw: &str) -> Result<usize, RecommendError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| RecommendError::InvalidTopN(format!("'{}' is not a positive integer", raw)))
}

fn top_n_from_json(value: &Value) -> Result<usize, RecommendError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| RecommendError::InvalidTopN(format!("'{}' is not a positive integer", n))),
        Value::String(s) => parse_top_n(s),
        other => Err(RecommendError::InvalidTopN(format!(
            "'{}' is not a positive integer",
            other
        ))),
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Readiness and reload response
#[derive(Debug, Serialize)]
pub struct ArtifactStatusResponse {
    status: String,
    artifacts: ArtifactStats,
}

/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "recommender-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready - Counts of the artifact set currently serving requests
///
/// The service only starts listening once the initial set is loaded, so a
/// responding instance is always ready.
async fn ready(state: web::Data<AppState>) -> impl Responder {
    let artifacts = state.recommender.store().snapshot().await;

    HttpResponse::Ok().json(ArtifactStatusResponse {
        status: "ready".to_string(),
        artifacts: artifacts.stats(),
    })
}

/// GET|POST /api/recommend_last_click - Recommend articles for a user
///
/// Parameters (query string, or JSON body for POST):
/// - user_id: non-negative integer (required)
/// - top_n: number of results (optional, defaults to the configured value)
pub async fn recommend_last_click(
    state: web::Data<AppState>,
    query: web::Query<RecommendQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, RecommendError> {
    let request = RecommendRequest::parse(&query, &body).map_err(|e| {
        warn!(error = %e, "Rejected recommendation request");
        e
    })?;

    let response = state
        .recommender
        .recommend(request.user_id, request.top_n)
        .await
        .map_err(|e| {
            error!(user_id = %request.user_id, error = %e, "Recommendation failed");
            e
        })?;

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/admin/artifacts/reload - Reload all artifacts and swap them in
///
/// On failure the previous artifact set keeps serving and 503 is returned.
pub async fn reload_artifacts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, RecommendError> {
    authorize_admin(&req, state.admin_token.as_deref()).map_err(|e| {
        warn!(path = %req.path(), error = %e, "Unauthorized admin access attempt");
        e
    })?;

    info!("Artifact reload requested");

    let stats = state.recommender.store().reload().await.map_err(|e| {
        error!(error = %e, "Artifact reload failed, keeping previous set");
        RecommendError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(ArtifactStatusResponse {
        status: "reloaded".to_string(),
        artifacts: stats,
    }))
}

/// Check the `Authorization: Bearer` header against the configured admin token
pub fn authorize_admin(req: &HttpRequest, expected: Option<&str>) -> Result<(), RecommendError> {
    let expected = expected.ok_or(RecommendError::AdminDisabled)?;

    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| RecommendError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or_else(|| RecommendError::Unauthorized("Expected a Bearer token".to_string()))?;

    if token != expected {
        return Err(RecommendError::Unauthorized("Invalid admin token".to_string()));
    }

    Ok(())
}

/// Configure application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/ready", web::get().to(ready))
        .service(
            web::scope("/api")
                .route("/recommend_last_click", web::get().to(recommend_last_click))
                .route("/recommend_last_click", web::post().to(recommend_last_click))
                .route(
                    "/admin/artifacts/reload",
                    web::post().to(reload_artifacts),
                ),
        );
}
