//! Leaderboard computation over raw per-judge totals.
//!
//! The ranked leaderboard is derived client-side from `/api/raw-scores`
//! rows. Each category total is normalized against its attainable
//! maximum and the percentages blend 40% street with 60% festival.

use serde::{Deserialize, Serialize};

use crate::types::RawTotals;

/// Weight of the street category in the final score.
pub const STREET_WEIGHT: f64 = 0.4;
/// Weight of the festival category in the final score.
pub const FESTIVAL_WEIGHT: f64 = 0.6;
/// Default maximum attainable total per category.
pub const DEFAULT_MAX_POINTS: f64 = 100.0;

/// Maximum attainable totals used to normalize raw sums.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderboardConfig {
    pub max_street: f64,
    pub max_festival: f64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            max_street: DEFAULT_MAX_POINTS,
            max_festival: DEFAULT_MAX_POINTS,
        }
    }
}

/// One row of the computed leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardRow {
    pub contestant_id: i64,
    #[serde(rename = "judgeName")]
    pub judge_name: String,
    pub street_total: f64,
    pub festival_total: f64,
    pub street_pct: f64,
    pub festival_pct: f64,
    pub final_score: f64,
    /// 1-based position in the final-score sort. Rows are per
    /// (contestant, judge), so a contestant scored by several judges
    /// appears once per judge, each row with its own rank.
    pub rank: usize,
}

/// Converts a raw total into a percentage of the attainable maximum.
/// A non-positive maximum yields zero instead of dividing by it.
pub fn percentage(total: f64, max: f64) -> f64 {
    if max > 0.0 { total / max * 100.0 } else { 0.0 }
}

/// Blends category percentages into the final score.
pub fn final_score(street_pct: f64, festival_pct: f64) -> f64 {
    street_pct * STREET_WEIGHT + festival_pct * FESTIVAL_WEIGHT
}

/// Computes the ranked leaderboard from raw per-judge totals.
///
/// Rows sort by final score descending; ties break by contestant id,
/// then judge name, keeping the order stable across storage backends.
pub fn compute(raw: &[RawTotals], config: &LeaderboardConfig) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = raw
        .iter()
        .map(|r| {
            let street_pct = percentage(r.street_total, config.max_street);
            let festival_pct = percentage(r.festival_total, config.max_festival);
            LeaderboardRow {
                contestant_id: r.contestant_id,
                judge_name: r.judge_name.clone(),
                street_total: r.street_total,
                festival_total: r.festival_total,
                street_pct,
                festival_pct,
                final_score: final_score(street_pct, festival_pct),
                rank: 0,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| a.contestant_id.cmp(&b.contestant_id))
            .then_with(|| a.judge_name.cmp(&b.judge_name))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.rank = idx + 1;
    }
    rows
}
