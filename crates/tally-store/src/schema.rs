//! Schema bootstrap statements.
//!
//! The DDL sticks to the subset both backends accept; the only branch
//! is the auto-assigned judge id, which each dialect spells its own
//! way. SQLite reads `BIGINT` and `DOUBLE PRECISION` through type
//! affinity, so the shared statements run unchanged there.

/// Database dialect behind the `Any` pool, derived from the URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Maps a connection URL to its dialect. Returns `None` for schemes
    /// the store has no driver for.
    pub fn from_url(url: &str) -> Option<Backend> {
        match url.split(':').next().unwrap_or_default() {
            "postgres" | "postgresql" => Some(Backend::Postgres),
            "sqlite" => Some(Backend::Sqlite),
            _ => None,
        }
    }
}

const JUDGES_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS judges (
    id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
)";

const JUDGES_SQLITE: &str = "CREATE TABLE IF NOT EXISTS judges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)";

const SCORES: &str = "CREATE TABLE IF NOT EXISTS scores (
    contestant_id BIGINT NOT NULL,
    category INTEGER NOT NULL,
    judge_name TEXT NOT NULL,
    criteria TEXT NOT NULL,
    score DOUBLE PRECISION NOT NULL,
    PRIMARY KEY (contestant_id, category, judge_name, criteria)
)";

const SCORES_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_scores_category ON scores (category)";

const CONTESTANT_TOTALS: &str = "CREATE TABLE IF NOT EXISTS contestant_totals (
    contestant_id BIGINT PRIMARY KEY,
    street_total DOUBLE PRECISION NOT NULL,
    festival_total DOUBLE PRECISION NOT NULL,
    final_score DOUBLE PRECISION NOT NULL
)";

/// All bootstrap statements, in execution order. Each is idempotent.
pub fn statements(backend: Backend) -> Vec<&'static str> {
    let judges = match backend {
        Backend::Postgres => JUDGES_POSTGRES,
        Backend::Sqlite => JUDGES_SQLITE,
    };
    vec![judges, SCORES, SCORES_CATEGORY_INDEX, CONTESTANT_TOTALS]
}
