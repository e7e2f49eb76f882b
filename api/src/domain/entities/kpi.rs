//! KPI domain entities
//!
//! KPI definitions are the weekly goals the user tracks (training sessions,
//! deep work hours, ...). A weekly record holds what was achieved per KPI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::week_key::WeekKey;

fn default_weight() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

/// A tracked weekly goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    /// Unique key, also used in weekly value maps (e.g. "training")
    pub id: String,
    pub name: String,
    /// Weekly goal quantity
    pub target: f64,
    /// Relative importance when averaging completion
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl KpiDefinition {
    /// Whether this KPI takes part in completion scoring
    pub fn is_scored(&self) -> bool {
        self.is_active && self.target > 0.0 && self.weight > 0.0
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("KPI id must not be empty".to_string());
        }
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(format!("KPI {} target must be positive", self.id));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!("KPI {} weight must not be negative", self.id));
        }
        Ok(())
    }
}

/// Achieved values for one week, keyed by KPI id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyKpiRecord {
    pub week_key: WeekKey,
    pub values: BTreeMap<String, f64>,
}

impl WeeklyKpiRecord {
    pub fn empty(week_key: WeekKey) -> Self {
        Self {
            week_key,
            values: BTreeMap::new(),
        }
    }

    /// Achieved value for a KPI, 0 when nothing was logged
    pub fn value(&self, kpi_id: &str) -> f64 {
        self.values.get(kpi_id).copied().unwrap_or(0.0)
    }

    pub fn has_data(&self) -> bool {
        !self.values.is_empty()
    }

    /// Overwrite the given keys, keeping the others
    pub fn merge(&mut self, values: &BTreeMap<String, f64>) {
        for (key, value) in values {
            self.values.insert(key.clone(), *value);
        }
    }
}

/// Validate a weekly value map before it is stored
pub fn validate_values(values: &BTreeMap<String, f64>) -> Result<(), String> {
    for (key, value) in values {
        if key.trim().is_empty() {
            return Err("KPI id must not be empty".to_string());
        }
        if !value.is_finite() || *value < 0.0 {
            return Err(format!("Value for {} must be a non-negative number", key));
        }
    }
    Ok(())
}
