use crate::config::Config;
use crate::error::FeedError;
use crate::feed::{listings_payload, FeedSource, HttpFeed};
use crate::models::{ErrorEnvelope, QueryResponse};
use crate::query::{query, DEFAULT_PAGE_SIZE};
use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const UPSTREAM_ERROR: &str = "Falha ao obter dados da API";
const QUERY_TASK_ERROR: &str = "Falha ao processar a consulta";

pub struct AppState {
    pub feed: Arc<dyn FeedSource>,
}

pub fn router(feed: Arc<dyn FeedSource>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/convert-xml", get(convert_xml))
        .route("/imoveis", get(search_listings))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { feed }))
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    let feed = HttpFeed::new(config.feed_url.clone(), config.fetch_timeout)?;
    info!(
        source = feed.source_name(),
        url = feed.url(),
        timeout_secs = config.fetch_timeout.as_secs(),
        "Feed configured"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🏠 Listening on http://{}", config.bind_addr);

    axum::serve(listener, router(Arc::new(feed)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn home() -> &'static str {
    "Gateway de imóveis em execução: use /imoveis para consultar ou /convert-xml para o feed completo"
}

/// The whole upstream feed as a JSON tree
async fn convert_xml(State(state): State<Arc<AppState>>) -> Response {
    match state.feed.fetch_tree().await {
        Ok(tree) => Json(tree).into_response(),
        Err(e) => {
            warn!("Feed fetch failed: {}", e);
            (upstream_status(&e), Json(json!({ "error": UPSTREAM_ERROR }))).into_response()
        }
    }
}

/// Filtered, sorted, paginated listings
async fn search_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let tree = match state.feed.fetch_tree().await {
        Ok(tree) => tree,
        Err(e) => {
            warn!("Feed fetch failed: {}", e);
            let envelope = ErrorEnvelope::new(UPSTREAM_ERROR, DEFAULT_PAGE_SIZE);
            return (upstream_status(&e), Json(envelope)).into_response();
        }
    };

    let param_count = params.len();
    // Filtering and sorting are CPU-bound; keep them off the async workers
    let task = tokio::task::spawn_blocking(move || query(listings_payload(&tree), &params));
    let response = match task.await {
        Ok(response) => response,
        Err(e) => {
            warn!("Query task failed: {}", e);
            QueryResponse::Error(ErrorEnvelope::new(QUERY_TASK_ERROR, DEFAULT_PAGE_SIZE))
        }
    };
    let status = if response.is_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    info!(params = param_count, status = status.as_u16(), "Listing query served");

    (status, Json(response)).into_response()
}

/// Mirrors the upstream status when there is one, 502 otherwise
fn upstream_status(e: &FeedError) -> StatusCode {
    e.upstream_status()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}
