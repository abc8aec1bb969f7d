use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::clients::{
    entities::{ArtistPage, ParsedPageRecord, SearchResults, TrackRecord},
    errors::Error,
};
use crate::service::{CanvasService, DEFAULT_SEARCH_LIMIT, parse_search_types};

pub type AppState = Arc<CanvasService>;

/// Maps service errors onto HTTP statuses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthenticated => StatusCode::SERVICE_UNAVAILABLE,
            Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::ConfigurationError(_) | Error::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
struct CanvasQuery {
    link: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<u32>,
}

#[derive(Deserialize)]
struct ParseCanvasBody {
    html: Option<String>,
    link: Option<String>,
}

async fn get_canvas(
    State(service): State<AppState>,
    query: Result<Query<CanvasQuery>, QueryRejection>,
) -> Result<Json<TrackRecord>, ApiError> {
    let Query(query) = query?;
    let link = query
        .link
        .ok_or_else(|| Error::InvalidInput("missing link parameter".into()))?;
    Ok(Json(service.resolve_and_fetch_track(&link).await?))
}

async fn get_artist(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArtistPage>, ApiError> {
    Ok(Json(service.fetch_artist(&id).await?))
}

async fn get_search(
    State(service): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Query(query) = query?;
    let q = query
        .q
        .ok_or_else(|| Error::InvalidInput("missing query parameter".into()))?;
    let types = parse_search_types(query.kind.as_deref().unwrap_or_default())?;
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Ok(Json(service.search(&q, &types, limit).await?))
}

async fn post_parse_canvas(
    State(service): State<AppState>,
    body: Result<Json<ParseCanvasBody>, JsonRejection>,
) -> Result<Json<ParsedPageRecord>, ApiError> {
    let Json(body) = body?;
    let html = body.html.unwrap_or_default();
    Ok(Json(
        service.parse_scraped_page(&html, body.link.as_deref())?,
    ))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn build_router(service: AppState) -> Router {
    Router::new()
        .route("/api/canvas", get(get_canvas))
        .route("/api/artist/{id}", get(get_artist))
        .route("/api/search", get(get_search))
        .route("/api/parse-canvas", post(post_parse_canvas))
        .route("/health", get(health))
        .with_state(service)
}

pub async fn serve(service: CanvasService, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(Arc::new(service))).await
}
