//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.
//! Rank endpoints support content negotiation: Accept: application/json for
//! JSON, otherwise LLM-readable text/plain.

pub mod kpis;
pub mod metrics;
pub mod rank;
pub mod weeks;

pub use kpis::{list_kpis, put_kpi};
pub use metrics::import_daily_log;
pub use rank::{
    assess_week, get_rank, get_rank_history, get_rank_tiers, needs_assessment,
    regenerate_rank_history,
};
pub use weeks::{get_week, get_week_completion, put_week};

use axum::{
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::entities::WeekKey;
use crate::error::AppError;

/// Check if the client wants JSON response
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// JSON when asked for, rendered text otherwise
fn negotiate<T: Serialize>(headers: &HeaderMap, value: &T, text: String) -> Response {
    if wants_json(headers) {
        Json(value).into_response()
    } else {
        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response()
    }
}

fn parse_week_key(raw: &str) -> Result<WeekKey, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}
