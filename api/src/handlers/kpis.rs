//! KPI handlers
//!
//! Endpoints for managing KPI definitions.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::KpiDefinition;
use crate::error::AppError;
use crate::AppState;

/// Request body for PUT /kpis/:id
#[derive(Debug, Deserialize)]
pub struct KpiRequest {
    pub name: String,
    pub target: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl KpiRequest {
    fn into_definition(self, id: String) -> KpiDefinition {
        KpiDefinition {
            id,
            name: self.name,
            target: self.target,
            weight: self.weight.unwrap_or(1.0),
            unit: self.unit,
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

/// GET /kpis
pub async fn list_kpis(
    State(state): State<AppState>,
) -> Result<Json<Vec<KpiDefinition>>, AppError> {
    Ok(Json(state.kpi_service.list_kpis().await?))
}

/// PUT /kpis/:id
///
/// Create or replace a KPI definition.
pub async fn put_kpi(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<KpiRequest>,
) -> Result<Json<KpiDefinition>, AppError> {
    let kpi = state
        .kpi_service
        .upsert_kpi(body.into_definition(id))
        .await?;
    Ok(Json(kpi))
}
