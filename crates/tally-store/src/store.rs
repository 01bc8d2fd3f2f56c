//! Store: pooled SQL access to judges, scores, and contestant totals.
//!
//! Production opens Postgres; tests and local runs open SQLite through
//! the same `Any` pool. Concurrent writes rely on the database's
//! conflict primitive (`ON CONFLICT`), never on in-process locking, so
//! simultaneous upserts of one key settle last-write-wins inside the
//! engine.

use std::collections::BTreeMap;
use std::sync::Once;

use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::{AnyPool, Row};
use tracing::debug;

use tally_core::leaderboard;
use tally_core::{
    Category, CategoryScores, ContestantTotals, Judge, RawTotals, ScoreEntry, ScoreSubmission,
};

use crate::config::DbConfig;
use crate::error::{StoreError, StoreResult};
use crate::schema::{self, Backend};

static DRIVERS: Once = Once::new();

/// Registering the Any drivers twice panics, so it goes through a Once.
fn install_drivers() {
    DRIVERS.call_once(install_default_drivers);
}

/// Pooled handle to the score database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: AnyPool,
    backend: Backend,
}

impl Store {
    /// Connect using assembled settings (or their URL override).
    pub async fn connect(config: &DbConfig) -> StoreResult<Self> {
        Self::open(&config.connect_url(), config.pool_size).await
    }

    /// Open the database at the given URL and bootstrap the schema.
    pub async fn open(url: &str, pool_size: u32) -> StoreResult<Self> {
        install_drivers();
        let backend = Backend::from_url(url)
            .ok_or_else(|| StoreError::Storage(format!("unsupported database url: {url}")))?;

        // A shared in-memory SQLite database lives and dies with its
        // connection, so pin the pool to one connection that never expires.
        let in_memory = backend == Backend::Sqlite && url.contains(":memory:");
        let mut options = AnyPoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size });
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }

        let pool = options.connect(url).await?;
        let store = Self { pool, backend };
        store.ensure_schema().await?;
        debug!(backend = ?store.backend, "score store opened");
        Ok(store)
    }

    /// Ephemeral in-memory store, for tests and local development.
    pub async fn open_in_memory() -> StoreResult<Self> {
        Self::open("sqlite::memory:", 1).await
    }

    /// Create all tables if they don't exist yet.
    async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in schema::statements(self.backend) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ── Judges ─────────────────────────────────────────────────────

    /// List all judges, ordered by name.
    pub async fn list_judges(&self) -> StoreResult<Vec<Judge>> {
        let rows = sqlx::query("SELECT id, name FROM judges ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        let mut judges = Vec::with_capacity(rows.len());
        for row in rows {
            judges.push(Judge {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            });
        }
        Ok(judges)
    }

    /// Register a judge and return the stored row with its assigned id.
    ///
    /// The name is trimmed first; a blank name is a `Validation` error
    /// and a name already on file is a `Duplicate` error.
    pub async fn create_judge(&self, name: &str) -> StoreResult<Judge> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("Name required".to_string()));
        }
        let row = sqlx::query("INSERT INTO judges (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from_insert(e, "Judge exists"))?;
        let judge = Judge {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        };
        debug!(id = judge.id, name = %judge.name, "judge created");
        Ok(judge)
    }

    // ── Scores ─────────────────────────────────────────────────────

    /// Write one criterion score, replacing any previous value for the
    /// same (contestant, category, judge, criterion) key.
    pub async fn upsert_score(&self, submission: &ScoreSubmission) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO scores (contestant_id, category, judge_name, criteria, score)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (contestant_id, category, judge_name, criteria)
             DO UPDATE SET score = excluded.score",
        )
        .bind(submission.contestant)
        .bind(submission.category.code() as i32)
        .bind(&submission.judge_name)
        .bind(&submission.criteria)
        .bind(submission.score)
        .execute(&self.pool)
        .await?;
        debug!(
            contestant = submission.contestant,
            category = %submission.category,
            judge = %submission.judge_name,
            criteria = %submission.criteria,
            score = submission.score,
            "score upserted"
        );
        Ok(())
    }

    /// All scores in one category, grouped per contestant with a running
    /// total across every judge and criterion in the group.
    pub async fn scores_by_category(
        &self,
        category: Category,
    ) -> StoreResult<BTreeMap<i64, CategoryScores>> {
        let rows = sqlx::query(
            "SELECT contestant_id, criteria, score, judge_name FROM scores
             WHERE category = $1
             ORDER BY contestant_id, judge_name, criteria",
        )
        .bind(category.code() as i32)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: BTreeMap<i64, CategoryScores> = BTreeMap::new();
        for row in rows {
            let contestant: i64 = row.try_get("contestant_id")?;
            let entry = ScoreEntry {
                criteria: row.try_get("criteria")?,
                score: row.try_get("score")?,
                judge_name: row.try_get("judge_name")?,
            };
            let group = grouped.entry(contestant).or_default();
            group.total += entry.score;
            group.scores.push(entry);
        }
        Ok(grouped)
    }

    /// Per-judge raw category sums, one row per (contestant, judge).
    ///
    /// `festival_total` sums category 0 scores and `street_total` sums
    /// category 1 scores; a judge with no writes in a category gets 0.
    pub async fn raw_totals(&self) -> StoreResult<Vec<RawTotals>> {
        let rows = sqlx::query(
            "SELECT contestant_id, judge_name,
                    COALESCE(SUM(score) FILTER (WHERE category = $1), 0.0) AS street_total,
                    COALESCE(SUM(score) FILTER (WHERE category = $2), 0.0) AS festival_total
             FROM scores
             GROUP BY contestant_id, judge_name
             ORDER BY contestant_id, judge_name",
        )
        .bind(Category::Street.code() as i32)
        .bind(Category::Festival.code() as i32)
        .fetch_all(&self.pool)
        .await?;

        let mut totals = Vec::with_capacity(rows.len());
        for row in rows {
            totals.push(RawTotals {
                contestant_id: row.try_get("contestant_id")?,
                judge_name: row.try_get("judge_name")?,
                street_total: row.try_get("street_total")?,
                festival_total: row.try_get("festival_total")?,
            });
        }
        Ok(totals)
    }

    // ── Contestant totals ──────────────────────────────────────────

    /// Materialized blended totals, best first.
    pub async fn contestant_totals(&self) -> StoreResult<Vec<ContestantTotals>> {
        let rows = sqlx::query(
            "SELECT contestant_id, street_total, festival_total, final_score
             FROM contestant_totals
             ORDER BY final_score DESC, contestant_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut totals = Vec::with_capacity(rows.len());
        for row in rows {
            totals.push(ContestantTotals {
                contestant_id: row.try_get("contestant_id")?,
                street_total: row.try_get("street_total")?,
                festival_total: row.try_get("festival_total")?,
                final_score: row.try_get("final_score")?,
            });
        }
        Ok(totals)
    }

    /// Recompute the materialized totals from the score rows.
    ///
    /// Each contestant's category totals are averaged across the judges
    /// who scored them, then blended 40% street with 60% festival.
    /// Returns the number of contestants written.
    pub async fn refresh_contestant_totals(&self) -> StoreResult<usize> {
        let raw = self.raw_totals().await?;

        let mut buckets: BTreeMap<i64, (f64, f64, u32)> = BTreeMap::new();
        for row in &raw {
            let bucket = buckets.entry(row.contestant_id).or_insert((0.0, 0.0, 0));
            bucket.0 += row.street_total;
            bucket.1 += row.festival_total;
            bucket.2 += 1;
        }

        let mut written = 0;
        for (contestant, (street_sum, festival_sum, judges)) in buckets {
            let judges = f64::from(judges);
            let street_avg = street_sum / judges;
            let festival_avg = festival_sum / judges;
            let final_score = leaderboard::final_score(
                leaderboard::percentage(street_avg, leaderboard::DEFAULT_MAX_POINTS),
                leaderboard::percentage(festival_avg, leaderboard::DEFAULT_MAX_POINTS),
            );
            sqlx::query(
                "INSERT INTO contestant_totals
                     (contestant_id, street_total, festival_total, final_score)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (contestant_id) DO UPDATE SET
                     street_total = excluded.street_total,
                     festival_total = excluded.festival_total,
                     final_score = excluded.final_score",
            )
            .bind(contestant)
            .bind(street_avg)
            .bind(festival_avg)
            .bind(final_score)
            .execute(&self.pool)
            .await?;
            written += 1;
        }
        debug!(contestants = written, "contestant totals refreshed");
        Ok(written)
    }
}
