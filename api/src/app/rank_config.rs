//! Rank scoring configuration
//!
//! Defines the per-tier RR curves and the thresholds used by weekly scoring.
//! Higher tiers gain less for a strong week and lose more for a weak one.

use crate::domain::entities::RankTier;

/// Completion percentage at which a week neither gains nor loses RR
pub const DEFAULT_BREAKEVEN_PERCENT: f64 = 50.0;

/// Completion percentage at which a week counts toward `weeks_completed`
pub const DEFAULT_WEEK_COMPLETED_PERCENT: f64 = 50.0;

/// Per-KPI progress cap (over-achievement does not count extra)
pub const MAX_KPI_PROGRESS: f64 = 100.0;

/// Per-KPI progress at which the KPI is marked completed
pub const KPI_COMPLETED_PERCENT: f64 = 100.0;

/// Gain and loss magnitudes for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCurve {
    /// RR gained for a 100% week
    pub base_gain: i32,
    /// RR lost for a 0% week
    pub base_loss: i32,
}

impl TierCurve {
    pub const fn new(base_gain: i32, base_loss: i32) -> Self {
        Self {
            base_gain,
            base_loss,
        }
    }
}

impl std::str::FromStr for TierCurve {
    type Err = String;

    /// Parses `<gain>:<loss>`, e.g. `20:20`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (gain, loss) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected <gain>:<loss>, got {}", s))?;
        let base_gain: i32 = gain
            .trim()
            .parse()
            .map_err(|_| format!("Invalid gain: {}", gain))?;
        let base_loss: i32 = loss
            .trim()
            .parse()
            .map_err(|_| format!("Invalid loss: {}", loss))?;
        if base_gain <= 0 || base_loss <= 0 {
            return Err(format!("Gain and loss must be positive, got {}", s));
        }
        Ok(Self::new(base_gain, base_loss))
    }
}

/// Default curve for a tier
pub const fn default_curve(tier: RankTier) -> TierCurve {
    match tier {
        RankTier::Bronze => TierCurve::new(30, 10),
        RankTier::Silver => TierCurve::new(25, 15),
        RankTier::Gold => TierCurve::new(20, 20),
        RankTier::Platinum => TierCurve::new(18, 25),
        RankTier::Diamond => TierCurve::new(15, 30),
        RankTier::Master => TierCurve::new(12, 35),
        RankTier::Grandmaster => TierCurve::new(10, 40),
    }
}

/// Tunable scoring parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub breakeven_percent: f64,
    pub week_completed_percent: f64,
    curves: [TierCurve; 7],
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            breakeven_percent: DEFAULT_BREAKEVEN_PERCENT,
            week_completed_percent: DEFAULT_WEEK_COMPLETED_PERCENT,
            curves: RankTier::ALL.map(default_curve),
        }
    }
}

impl ScoringConfig {
    pub fn curve(&self, tier: RankTier) -> TierCurve {
        self.curves[tier as usize]
    }

    pub fn with_curve(mut self, tier: RankTier, curve: TierCurve) -> Self {
        self.curves[tier as usize] = curve;
        self
    }

    /// Read overrides from the environment, falling back to defaults.
    ///
    /// - `RANK_BREAKEVEN_PERCENT` (strictly between 0 and 100)
    /// - `RANK_WEEK_COMPLETED_PERCENT` (0..=100)
    /// - `RANK_CURVE_<TIER>=<gain>:<loss>`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("RANK_BREAKEVEN_PERCENT") {
            match raw.trim().parse::<f64>() {
                Ok(value) if value > 0.0 && value < 100.0 => config.breakeven_percent = value,
                _ => tracing::warn!(value = %raw, "Ignoring invalid RANK_BREAKEVEN_PERCENT"),
            }
        }

        if let Some(raw) = lookup("RANK_WEEK_COMPLETED_PERCENT") {
            match raw.trim().parse::<f64>() {
                Ok(value) if (0.0..=100.0).contains(&value) => {
                    config.week_completed_percent = value
                }
                _ => tracing::warn!(value = %raw, "Ignoring invalid RANK_WEEK_COMPLETED_PERCENT"),
            }
        }

        for tier in RankTier::ALL {
            let key = format!("RANK_CURVE_{}", tier.to_string().to_uppercase());
            if let Some(raw) = lookup(&key) {
                match raw.parse::<TierCurve>() {
                    Ok(curve) => config = config.with_curve(tier, curve),
                    Err(e) => tracing::warn!(key = %key, error = %e, "Ignoring invalid rank curve"),
                }
            }
        }

        config
    }
}
