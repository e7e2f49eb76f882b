//! Daily metrics handlers
//!
//! Endpoint for importing the daily log CSV export.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;

use super::negotiate;
use crate::error::AppError;
use crate::summary::render_import_summary;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImportQuery {
    /// Year for dates written without one
    pub year: Option<i32>,
}

/// POST /metrics/import
///
/// Body is the raw CSV text. Updates daily rows and weekly roll-ups; does
/// not assess any week.
pub async fn import_daily_log(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("Empty CSV body".to_string()));
    }

    let summary = state
        .import_service
        .import_daily_log(&body, query.year)
        .await?;
    let text = render_import_summary(&summary);
    Ok(negotiate(&headers, &summary, text))
}
