//! Noctisium API Server
//!
//! Weekly KPI ranking: scores each ISO week against KPI targets, moves the
//! user along a tiered RR ladder and keeps a reproducible rank history.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod summary;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresDailyMetricsRepository, PostgresKpiRepository, PostgresRankChangeRepository,
    PostgresUserRankRepository, PostgresWeeklyKpiRepository, SystemClock,
};
use app::{KpiService, MetricsImportService, RankingService};
use config::Config;

type AppRankingService = RankingService<
    PostgresKpiRepository,
    PostgresWeeklyKpiRepository,
    PostgresUserRankRepository,
    PostgresRankChangeRepository,
    SystemClock,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ranking_service: Arc<AppRankingService>,
    pub kpi_service: Arc<KpiService<PostgresKpiRepository, PostgresWeeklyKpiRepository>>,
    pub import_service:
        Arc<MetricsImportService<PostgresDailyMetricsRepository, PostgresWeeklyKpiRepository>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Periodically assess the most recently completed week if it was missed
fn spawn_auto_assessment(service: Arc<AppRankingService>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match service.assess_if_needed().await {
                Ok(Some(assessment)) => tracing::info!(
                    week_key = %assessment.week_key,
                    delta = assessment.rr_change,
                    rr = assessment.rr_after,
                    "Automatic weekly assessment applied"
                ),
                Ok(None) => tracing::debug!("No weekly assessment needed"),
                Err(e) => tracing::error!(error = %e, "Failed to assess weekly performance"),
            }
        }
    });
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,noctisium_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Noctisium API...");

    // Load configuration
    let config = Config::from_env();
    tracing::info!(
        user_id = %config.user_id,
        breakeven = config.scoring.breakeven_percent,
        "Configuration loaded"
    );

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let kpi_repo = Arc::new(PostgresKpiRepository::new(db.clone(), config.user_id));
    let weekly_repo = Arc::new(PostgresWeeklyKpiRepository::new(db.clone(), config.user_id));
    let user_rank_repo = Arc::new(PostgresUserRankRepository::new(db.clone(), config.user_id));
    let rank_change_repo = Arc::new(PostgresRankChangeRepository::new(db.clone(), config.user_id));
    let daily_repo = Arc::new(PostgresDailyMetricsRepository::new(db.clone(), config.user_id));

    // Create application services
    let ranking_service = Arc::new(RankingService::new(
        kpi_repo.clone(),
        weekly_repo.clone(),
        user_rank_repo,
        rank_change_repo,
        Arc::new(SystemClock),
        config.scoring.clone(),
    ));

    let kpi_service = Arc::new(KpiService::new(kpi_repo, weekly_repo.clone()));

    let import_service = Arc::new(MetricsImportService::new(
        daily_repo,
        weekly_repo,
        config.import_default_year,
    ));

    match config.auto_assess_interval {
        Some(every) => {
            tracing::info!(interval_secs = every.as_secs(), "Automatic assessment enabled");
            spawn_auto_assessment(ranking_service.clone(), every);
        }
        None => tracing::info!("Automatic assessment disabled"),
    }

    // Create app state
    let state = AppState {
        ranking_service,
        kpi_service,
        import_service,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        // Rank
        .route("/rank", get(handlers::get_rank))
        .route("/rank/tiers", get(handlers::get_rank_tiers))
        .route("/rank/assess", post(handlers::assess_week))
        .route("/rank/needs-assessment", get(handlers::needs_assessment))
        .route("/rank/history", get(handlers::get_rank_history))
        .route(
            "/rank/history/regenerate",
            post(handlers::regenerate_rank_history),
        )
        // KPI definitions
        .route("/kpis", get(handlers::list_kpis))
        .route("/kpis/:id", put(handlers::put_kpi))
        // Weekly records
        .route(
            "/weeks/:week_key",
            get(handlers::get_week).put(handlers::put_week),
        )
        .route(
            "/weeks/:week_key/completion",
            get(handlers::get_week_completion),
        )
        // Daily log import
        .route("/metrics/import", post(handlers::import_daily_log))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Server error");
}
