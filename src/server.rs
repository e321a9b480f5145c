//! Dashboard HTTP server.
//!
//! Serves the contribution history file through read-only JSON endpoints
//! and the dashboard page plus its static assets.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/data` | The whole document |
//! | `GET`  | `/api/stats` | Precomputed stats plus language/type/status breakdowns |
//! | `GET`  | `/api/contributions` | Filtered, paginated contributions |
//! | `GET`  | `/api/health` | Whether the data file exists |
//! | `GET`  | `/` | Dashboard markup |
//! | `GET`  | anything else | Static file under the static root, or 404 |
//!
//! # Query parameters for `/api/contributions`
//!
//! `status`, `type`, `language` (exact, case-insensitive), `repo`
//! (substring, case-insensitive), `offset` and `limit` (default 0 and 100).
//!
//! # CORS
//!
//! All origins are permitted so the dashboard can be opened from anywhere.

use axum::{extract::Query, extract::State, routing::get, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use contrib_dashboard_core::models::{utc_timestamp, ContributionDocument};
use contrib_dashboard_core::query::{filter_contributions, ContributionQuery};
use contrib_dashboard_core::stats::{compute_stats, StatsResponse};

use crate::config::DashboardConfig;
use crate::response::JsonResponse;
use crate::store;

/// Build the router. The configuration is the only state handlers share.
pub fn build_router(config: Arc<DashboardConfig>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&config.static_root);

    Router::new()
        .route("/api/data", get(handle_data))
        .route("/api/stats", get(handle_stats))
        .route("/api/contributions", get(handle_contributions))
        .route("/api/health", get(handle_health))
        .route_service("/", ServeFile::new(config.index_path()))
        .fallback_service(static_files)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(config)
}

/// Bind to `0.0.0.0:<port>` and serve until Ctrl+C.
pub async fn run_server(config: DashboardConfig) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;

    print_banner(&config);
    check_static_root(&config);
    tracing::info!(
        port = config.port,
        data_file = %config.data_file.display(),
        static_root = %config.static_root.display(),
        "dashboard server listening"
    );

    axum::serve(listener, build_router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("Server stopped.");
    Ok(())
}

/// Warn when the dashboard page is missing so `/` returning 404 is not a
/// silent surprise. The static root is resolved from the working directory.
pub fn check_static_root(config: &DashboardConfig) -> bool {
    let index = config.index_path();
    let present = index.is_file();
    if !present {
        tracing::warn!(
            index = %index.display(),
            static_root = %config.static_root.display(),
            "dashboard index file not found; / will return 404"
        );
    }
    present
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down server...");
}

fn print_banner(config: &DashboardConfig) {
    println!();
    println!("Contribution Dashboard Server");
    println!("=============================");
    println!();
    println!("  Dashboard: http://localhost:{}", config.port);
    println!();
    println!("  API endpoints:");
    println!("    GET /api/data          - All contribution data");
    println!("    GET /api/stats         - Statistics summary");
    println!("    GET /api/contributions - Filtered contributions");
    println!("    GET /api/health        - Health check");
    println!();
    println!("  Query parameters for /api/contributions:");
    println!("    ?status=MERGED|OPEN|CLOSED");
    println!("    ?type=documentation|bug|feature|...");
    println!("    ?language=TypeScript|Python|Go|...");
    println!("    ?repo=partial-match");
    println!("    ?offset=0&limit=100");
    println!();
    println!("  Data source: {}", config.data_file.display());
    println!();
    println!("  Press Ctrl+C to stop the server");
    println!();
}

// ============ GET /api/data ============

async fn handle_data(
    State(config): State<Arc<DashboardConfig>>,
) -> JsonResponse<ContributionDocument> {
    JsonResponse(store::load(&config.data_file).await)
}

// ============ GET /api/stats ============

async fn handle_stats(State(config): State<Arc<DashboardConfig>>) -> JsonResponse<StatsResponse> {
    let document = store::load(&config.data_file).await;
    JsonResponse(compute_stats(&document))
}

// ============ GET /api/contributions ============

/// JSON response body for `GET /api/contributions`.
#[derive(Serialize)]
struct ContributionsResponse {
    /// Entries exactly as they appear in the file.
    contributions: Vec<Value>,
    /// Size of the full filtered set, before pagination.
    total: usize,
    offset: usize,
    limit: usize,
}

/// Query pairs are taken as a list so repeated keys resolve to the first
/// occurrence instead of rejecting the request.
async fn handle_contributions(
    State(config): State<Arc<DashboardConfig>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> JsonResponse<ContributionsResponse> {
    let query = ContributionQuery::from_pairs(pairs);
    let document = store::load(&config.data_file).await;
    let page = filter_contributions(&document, &query);

    JsonResponse(ContributionsResponse {
        contributions: page.contributions.iter().map(|r| r.value().clone()).collect(),
        total: page.total,
        offset: query.pagination.offset,
        limit: query.pagination.limit,
    })
}

// ============ GET /api/health ============

/// JSON response body for `GET /api/health`.
#[derive(Serialize)]
struct HealthResponse {
    /// `"healthy"` when the data file exists, `"degraded"` otherwise.
    status: &'static str,
    timestamp: String,
    data_file: String,
    data_exists: bool,
}

async fn handle_health(State(config): State<Arc<DashboardConfig>>) -> JsonResponse<HealthResponse> {
    let data_exists = store::exists(&config.data_file).await;
    JsonResponse(HealthResponse {
        status: if data_exists { "healthy" } else { "degraded" },
        timestamp: utc_timestamp(),
        data_file: config.data_file.display().to_string(),
        data_exists,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            static_root: root.to_path_buf(),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn test_static_root_with_index() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path());
        std::fs::write(config.index_path(), "<html></html>").unwrap();
        assert!(check_static_root(&config));
    }

    #[test]
    fn test_static_root_without_index() {
        let tmp = TempDir::new().unwrap();
        let config = config_for(tmp.path());
        assert!(!check_static_root(&config));

        let config = config_for(&tmp.path().join("missing"));
        assert!(!check_static_root(&config));
    }
}
