//! Rank tier domain entity
//!
//! The ladder is a fixed, contiguous set of RR (rank rating) bands.
//! Every non-negative RR total falls into exactly one tier.

use serde::{Deserialize, Serialize};

/// Rank tier, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
}

/// Static attributes of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierInfo {
    pub tier: RankTier,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    /// Inclusive lower bound
    pub min_rr: i32,
    /// Exclusive upper bound, `None` for the top tier
    pub max_rr: Option<i32>,
}

impl TierInfo {
    pub fn contains(&self, rr: i32) -> bool {
        rr >= self.min_rr && self.max_rr.map_or(true, |max| rr < max)
    }
}

/// Rank table, sorted ascending by `min_rr`
pub static RANK_TABLE: [TierInfo; 7] = [
    TierInfo {
        tier: RankTier::Bronze,
        name: "Bronze",
        icon: "🥉",
        color: "#cd7f32",
        min_rr: 0,
        max_rr: Some(200),
    },
    TierInfo {
        tier: RankTier::Silver,
        name: "Silver",
        icon: "🥈",
        color: "#c0c0c0",
        min_rr: 200,
        max_rr: Some(500),
    },
    TierInfo {
        tier: RankTier::Gold,
        name: "Gold",
        icon: "🥇",
        color: "#ffd700",
        min_rr: 500,
        max_rr: Some(1000),
    },
    TierInfo {
        tier: RankTier::Platinum,
        name: "Platinum",
        icon: "💠",
        color: "#4fd1c5",
        min_rr: 1000,
        max_rr: Some(1500),
    },
    TierInfo {
        tier: RankTier::Diamond,
        name: "Diamond",
        icon: "💎",
        color: "#63b3ed",
        min_rr: 1500,
        max_rr: Some(2100),
    },
    TierInfo {
        tier: RankTier::Master,
        name: "Master",
        icon: "👑",
        color: "#9f7aea",
        min_rr: 2100,
        max_rr: Some(2800),
    },
    TierInfo {
        tier: RankTier::Grandmaster,
        name: "Grandmaster",
        icon: "🏆",
        color: "#f56565",
        min_rr: 2800,
        max_rr: None,
    },
];

impl RankTier {
    pub const ALL: [RankTier; 7] = [
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Master,
        RankTier::Grandmaster,
    ];

    /// Lowest tier, where every new user starts
    pub fn lowest() -> Self {
        RankTier::Bronze
    }

    pub fn info(&self) -> &'static TierInfo {
        &RANK_TABLE[*self as usize]
    }

    pub fn min_rr(&self) -> i32 {
        self.info().min_rr
    }

    pub fn max_rr(&self) -> Option<i32> {
        self.info().max_rr
    }

    /// Resolve the tier containing an RR total.
    ///
    /// Negative totals are clamped to 0. If no band contains the value the
    /// highest tier whose lower bound is not above it is returned.
    pub fn from_rr(rr: i32) -> Self {
        resolve_in(&RANK_TABLE, rr)
    }
}

/// Tier lookup over an arbitrary sorted table.
pub(crate) fn resolve_in(table: &[TierInfo], rr: i32) -> RankTier {
    let rr = rr.max(0);

    if let Some(info) = table.iter().find(|info| info.contains(rr)) {
        return info.tier;
    }

    // Gap in the table: nearest tier below, else the first tier
    table
        .iter()
        .rev()
        .find(|info| info.min_rr <= rr)
        .or_else(|| table.first())
        .map(|info| info.tier)
        .unwrap_or(RankTier::Bronze)
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankTier::Bronze => write!(f, "bronze"),
            RankTier::Silver => write!(f, "silver"),
            RankTier::Gold => write!(f, "gold"),
            RankTier::Platinum => write!(f, "platinum"),
            RankTier::Diamond => write!(f, "diamond"),
            RankTier::Master => write!(f, "master"),
            RankTier::Grandmaster => write!(f, "grandmaster"),
        }
    }
}

impl std::str::FromStr for RankTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(RankTier::Bronze),
            "silver" => Ok(RankTier::Silver),
            "gold" => Ok(RankTier::Gold),
            "platinum" => Ok(RankTier::Platinum),
            "diamond" => Ok(RankTier::Diamond),
            "master" => Ok(RankTier::Master),
            "grandmaster" => Ok(RankTier::Grandmaster),
            _ => Err(format!("Unknown rank tier: {}", s)),
        }
    }
}

/// Direction of a tier change between two RR totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierTransition {
    Promoted,
    Demoted,
    Unchanged,
}

impl TierTransition {
    pub fn between(old_rr: i32, new_rr: i32) -> Self {
        let old_min = RankTier::from_rr(old_rr).min_rr();
        let new_min = RankTier::from_rr(new_rr).min_rr();

        match new_min.cmp(&old_min) {
            std::cmp::Ordering::Greater => TierTransition::Promoted,
            std::cmp::Ordering::Less => TierTransition::Demoted,
            std::cmp::Ordering::Equal => TierTransition::Unchanged,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, TierTransition::Unchanged)
    }
}
