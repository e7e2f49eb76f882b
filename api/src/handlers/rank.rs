//! Rank handlers
//!
//! Endpoints for rank status, weekly assessment and rank history.

use axum::{extract::State, http::HeaderMap, response::Response, Json};
use serde::{Deserialize, Serialize};

use super::{negotiate, parse_week_key};
use crate::domain::entities::{TierInfo, UserRank, RANK_TABLE};
use crate::error::AppError;
use crate::summary::{
    render_assessment, render_history, render_needs_assessment, render_rank_status,
    render_rank_tiers, render_regeneration,
};
use crate::AppState;

/// Response for GET /rank
#[derive(Debug, Serialize)]
pub struct RankResponse {
    #[serde(flatten)]
    pub rank: UserRank,
    pub tier: TierInfo,
    pub rr_to_next_tier: Option<i32>,
}

/// Request body for POST /rank/assess
#[derive(Debug, Default, Deserialize)]
pub struct AssessRequest {
    /// `YYYY-Www`; defaults to the most recently completed week
    #[serde(default)]
    pub week_key: Option<String>,
}

/// Response for GET /rank/needs-assessment
#[derive(Debug, Serialize)]
pub struct NeedsAssessmentResponse {
    pub week_key: String,
    pub needs_assessment: bool,
}

/// GET /rank
pub async fn get_rank(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rank = state.ranking_service.get_user_rank().await?;
    let text = render_rank_status(&rank);

    let response = RankResponse {
        tier: *rank.current_rank.info(),
        rr_to_next_tier: rank.rr_to_next_tier(),
        rank,
    };
    Ok(negotiate(&headers, &response, text))
}

/// GET /rank/tiers
pub async fn get_rank_tiers(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let rank = state.ranking_service.get_user_rank().await?;
    let tiers: &[TierInfo] = &RANK_TABLE;
    Ok(negotiate(
        &headers,
        &tiers,
        render_rank_tiers(Some(rank.current_rank)),
    ))
}

/// POST /rank/assess
///
/// Assess a week (default: the most recently completed one). Re-assessing a
/// week replaces its previous result.
pub async fn assess_week(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<AssessRequest>>,
) -> Result<Response, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let week_key = match request.week_key.as_deref() {
        Some(raw) => parse_week_key(raw)?,
        None => state.ranking_service.last_completed_week(),
    };

    let assessment = state
        .ranking_service
        .assess_weekly_performance(week_key)
        .await?;
    let text = render_assessment(&assessment);
    Ok(negotiate(&headers, &assessment, text))
}

/// GET /rank/needs-assessment
pub async fn needs_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let week_key = state.ranking_service.last_completed_week();
    let needed = state.ranking_service.needs_weekly_assessment().await?;

    let response = NeedsAssessmentResponse {
        week_key: week_key.to_string(),
        needs_assessment: needed,
    };
    Ok(negotiate(
        &headers,
        &response,
        render_needs_assessment(week_key, needed),
    ))
}

/// GET /rank/history
pub async fn get_rank_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let history = state.ranking_service.get_rank_history().await?;
    let text = render_history(&history);
    Ok(negotiate(&headers, &history, text))
}

/// POST /rank/history/regenerate
///
/// Rebuild the full history from weekly KPI data.
pub async fn regenerate_rank_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let result = state.ranking_service.regenerate_rank_history().await?;
    let text = render_regeneration(&result);
    Ok(negotiate(&headers, &result, text))
}
