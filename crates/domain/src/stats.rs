//! Summary statistics produced by the data pipeline (`stats.json`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::IsoDate;

/// One row of the contributor leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub count: u64,
}

/// Contents of `stats.json`.
///
/// `leaderboard` holds at most the top twenty contributors, descending by
/// count. `daily_additions` keys double as date-axis members: a day can
/// appear here even when every lamp added that day was later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub baseline_count: u64,
    pub new_count: u64,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub daily_additions: BTreeMap<IsoDate, u64>,
}
