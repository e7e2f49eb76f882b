//! Weekly record handlers
//!
//! Endpoints for reading and writing a week's KPI values.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    Json,
};
use serde::Deserialize;

use super::{negotiate, parse_week_key};
use crate::domain::entities::WeeklyKpiRecord;
use crate::error::AppError;
use crate::summary::render_week_progress;
use crate::AppState;

/// Request body for PUT /weeks/:week_key
#[derive(Debug, Deserialize)]
pub struct WeekValuesRequest {
    pub values: BTreeMap<String, f64>,
}

/// GET /weeks/:week_key
pub async fn get_week(
    State(state): State<AppState>,
    Path(week_key): Path<String>,
) -> Result<Json<WeeklyKpiRecord>, AppError> {
    let week_key = parse_week_key(&week_key)?;
    Ok(Json(state.kpi_service.get_week(week_key).await?))
}

/// PUT /weeks/:week_key
///
/// Replace the week's values. Does not re-assess the week.
pub async fn put_week(
    State(state): State<AppState>,
    Path(week_key): Path<String>,
    Json(body): Json<WeekValuesRequest>,
) -> Result<Json<WeeklyKpiRecord>, AppError> {
    let week_key = parse_week_key(&week_key)?;
    Ok(Json(state.kpi_service.put_week(week_key, body.values).await?))
}

/// GET /weeks/:week_key/completion
///
/// Completion preview; nothing is persisted.
pub async fn get_week_completion(
    State(state): State<AppState>,
    Path(week_key): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let week_key = parse_week_key(&week_key)?;
    let progress = state
        .ranking_service
        .preview_week_completion(week_key)
        .await?;
    let text = render_week_progress(&progress);
    Ok(negotiate(&headers, &progress, text))
}
