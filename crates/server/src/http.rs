//! JSON HTTP API over a [`SearchService`].
//!
//! | Method | Path      | Body                     | Response              |
//! |--------|-----------|--------------------------|-----------------------|
//! | POST   | `/index`  | `[Document]`             | `{"added": n}`        |
//! | POST   | `/search` | `{"q": "...", "top_k"?}` | `{"results": [...]}`  |
//! | POST   | `/clear`  |                          | `{"cleared": true}`   |
//! | GET    | `/health` |                          | index and provider    |
//!
//! Errors are returned as `{"detail": "..."}`, including request bodies
//! that fail to parse (400).

use crate::service::{Document, SearchService};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use semsearch_core::{AppError, AppResult};
use semsearch_index::SearchHit;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub q: String,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub documents: usize,
    pub dimension: Option<usize>,
    pub provider: String,
    pub model: String,
}

/// Error wrapper that renders an [`AppError`] as a JSON response.
#[derive(Debug)]
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::InvalidArgument(format!(
            "malformed request body: {}",
            rejection.body_text()
        )))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Embedding(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Rejected request: {}", self.0);
        }

        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Build the API router.
pub fn router(service: SearchService) -> Router {
    Router::new()
        .route("/index", post(index_documents))
        .route("/search", post(search))
        .route("/clear", post(clear))
        .route("/health", get(health))
        .with_state(service)
}

async fn index_documents(
    State(service): State<SearchService>,
    payload: Result<Json<Vec<Document>>, JsonRejection>,
) -> Result<Json<IndexResponse>, ApiError> {
    let Json(docs) = payload?;
    let added = service.index_documents(docs).await?;
    Ok(Json(IndexResponse { added }))
}

async fn search(
    State(service): State<SearchService>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    let results = service.search(&request.q, request.top_k).await?;
    Ok(Json(SearchResponse { results }))
}

async fn clear(State(service): State<SearchService>) -> Json<ClearResponse> {
    service.clear();
    Json(ClearResponse { cleared: true })
}

async fn health(State(service): State<SearchService>) -> Json<HealthResponse> {
    let stats = service.stats();
    let provider = service.provider();
    Json(HealthResponse {
        status: "ok".to_string(),
        documents: stats.documents,
        dimension: stats.dimension,
        provider: provider.provider_name().to_string(),
        model: provider.model_name().to_string(),
    })
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, service: SearchService) -> AppResult<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        AppError::Server(format!(
            "Failed to bind {}: {}. Address may be in use or require elevated permissions.",
            addr, e
        ))
    })?;

    serve_with_listener(listener, service, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    service: SearchService,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| AppError::Server(format!("Failed to read listener address: {}", e)))?;

    info!(
        "semsearch listening on http://{} (provider={}, model={})",
        local,
        service.provider().provider_name(),
        service.provider().model_name()
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(format!("HTTP server error: {}", e)))?;

    info!("semsearch stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
