//! Wire types shared by the API, store, and client.
//!
//! Field names match the HTTP JSON surface exactly, including its mix
//! of snake_case and camelCase (`judgeName` next to `contestant_id`).

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A registered judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Judge {
    pub id: i64,
    pub name: String,
}

/// One stored criterion score, as listed under a contestant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreEntry {
    pub criteria: String,
    pub score: f64,
    #[serde(rename = "judgeName")]
    pub judge_name: String,
}

/// Per-contestant grouping returned by the category scores query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryScores {
    /// Running sum across every judge and criterion in the group.
    pub total: f64,
    pub scores: Vec<ScoreEntry>,
}

/// A single score write, keyed by contestant, category, judge, and criterion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreSubmission {
    pub contestant: i64,
    pub category: Category,
    #[serde(rename = "judgeName")]
    pub judge_name: String,
    pub criteria: String,
    pub score: f64,
}

/// Per-judge raw category sums for one contestant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTotals {
    pub contestant_id: i64,
    #[serde(rename = "judgeName")]
    pub judge_name: String,
    pub street_total: f64,
    pub festival_total: f64,
}

/// Materialized blended totals for one contestant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContestantTotals {
    pub contestant_id: i64,
    pub street_total: f64,
    pub festival_total: f64,
    pub final_score: f64,
}

/// Generic success acknowledgement, `{"ok": true}` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    pub ok: bool,
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorBody {
    pub error: String,
}
