//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports.

pub mod kpi_service;
pub mod metrics_import_service;
pub mod rank_config;
pub mod rank_history;
pub mod ranking_service;
pub mod scoring;

pub use kpi_service::KpiService;
pub use metrics_import_service::{ImportSummary, MetricsImportService};
pub use rank_config::ScoringConfig;
pub use rank_history::HistoryRegeneration;
pub use ranking_service::RankingService;
// Re-export scoring functions for public API
#[allow(unused_imports)]
pub use scoring::{calculate_rr_change, calculate_week_completion, score_week};
