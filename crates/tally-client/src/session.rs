//! Scoring session state machine.
//!
//! Models the judge's entry flow: pick or register a judge, load that
//! judge's saved scores for the category, edit cells with optimistic
//! local writes, and re-submit the whole sheet at the end. A failed
//! load keeps the session in `Loading` and returns the error, so the
//! caller retries explicitly instead of silently scoring over nothing.

use tracing::{debug, warn};

use tally_core::{Category, Judge, ScoreSubmission, criteria};

use crate::client::ApiClient;
use crate::error::{SessionError, SessionResult};
use crate::sheet::{ScoreSheet, Standing};

/// Where the session is in its judge/load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No judge chosen yet; score entry is disabled.
    NoJudge,
    /// A judge is chosen but their saved scores have not loaded.
    Loading,
    /// Saved scores are in the sheet; cells are editable.
    Editable,
}

/// Outcome of a bulk sheet submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReport {
    pub attempted: usize,
    pub submitted: usize,
    pub failures: Vec<SubmitFailure>,
}

impl SubmitReport {
    /// True when every attempted write landed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One cell that failed to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFailure {
    pub contestant: i64,
    pub criteria: String,
    pub error: String,
}

/// One judge's scoring pass over a category.
pub struct ScoringSession {
    client: ApiClient,
    category: Category,
    contestants: Vec<i64>,
    judges: Vec<Judge>,
    judge: Option<String>,
    sheet: ScoreSheet,
    phase: SessionPhase,
}

impl ScoringSession {
    /// Session over the default contestant roster.
    pub fn new(client: ApiClient, category: Category) -> Self {
        Self::with_contestants(client, category, criteria::default_contestants())
    }

    /// Session over an explicit contestant roster.
    pub fn with_contestants(client: ApiClient, category: Category, contestants: Vec<i64>) -> Self {
        Self {
            client,
            category,
            contestants,
            judges: Vec::new(),
            judge: None,
            sheet: ScoreSheet::new(category),
            phase: SessionPhase::NoJudge,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn contestants(&self) -> &[i64] {
        &self.contestants
    }

    /// Judges known to this session, as of the last refresh.
    pub fn judges(&self) -> &[Judge] {
        &self.judges
    }

    /// The selected judge, if any.
    pub fn judge(&self) -> Option<&str> {
        self.judge.as_deref()
    }

    pub fn sheet(&self) -> &ScoreSheet {
        &self.sheet
    }

    /// Fetch the judge registry.
    pub async fn refresh_judges(&mut self) -> SessionResult<()> {
        self.judges = self.client.judges().await?;
        debug!(count = self.judges.len(), "judges refreshed");
        Ok(())
    }

    /// Register a judge and select them.
    ///
    /// The name is trimmed and pre-checked against the known judges
    /// case-insensitively; the server's own uniqueness check is
    /// exact-match, so the pre-check catches `ada` next to `Ada`.
    pub async fn add_judge(&mut self, name: &str) -> SessionResult<Judge> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(SessionError::BlankJudgeName);
        }
        if self
            .judges
            .iter()
            .any(|j| j.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(SessionError::DuplicateJudge);
        }
        let judge = self.client.create_judge(trimmed).await?;
        self.judges.push(judge.clone());
        self.select_judge(&judge.name).await?;
        Ok(judge)
    }

    /// Select a known judge and load their saved scores.
    pub async fn select_judge(&mut self, name: &str) -> SessionResult<()> {
        if !self.judges.iter().any(|j| j.name == name) {
            return Err(SessionError::UnknownJudge(name.to_string()));
        }
        self.judge = Some(name.to_string());
        self.phase = SessionPhase::Loading;
        self.load_saved().await
    }

    /// Retry loading after a failed select or category switch.
    pub async fn reload(&mut self) -> SessionResult<()> {
        if self.judge.is_none() {
            return Err(SessionError::NoJudgeSelected);
        }
        self.phase = SessionPhase::Loading;
        self.load_saved().await
    }

    /// Switch category, dropping the sheet and reloading the selected
    /// judge's saved scores for the new one.
    pub async fn switch_category(&mut self, category: Category) -> SessionResult<()> {
        if category == self.category {
            return Ok(());
        }
        self.category = category;
        self.sheet = ScoreSheet::new(category);
        if self.judge.is_some() {
            self.phase = SessionPhase::Loading;
            self.load_saved().await
        } else {
            self.phase = SessionPhase::NoJudge;
            Ok(())
        }
    }

    async fn load_saved(&mut self) -> SessionResult<()> {
        let Some(judge) = self.judge.clone() else {
            return Err(SessionError::NoJudgeSelected);
        };
        match self.client.scores(self.category).await {
            Ok(fetched) => {
                self.sheet = ScoreSheet::from_fetched(self.category, &fetched, &judge);
                self.phase = SessionPhase::Editable;
                debug!(
                    judge = %judge,
                    category = %self.category,
                    cells = self.sheet.len(),
                    "saved scores loaded"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "loading saved scores failed");
                Err(e.into())
            }
        }
    }

    /// Validate and write one cell.
    ///
    /// The sheet updates before the upsert goes out; a failed upsert
    /// returns the error but keeps the local value, which goes out
    /// again on the next `submit_all`.
    pub async fn set_score(
        &mut self,
        contestant: i64,
        criteria_name: &str,
        score: f64,
    ) -> SessionResult<()> {
        let Some(judge) = self.judge.clone() else {
            return Err(SessionError::NoJudgeSelected);
        };
        if self.phase != SessionPhase::Editable {
            return Err(SessionError::SheetNotLoaded);
        }
        if !self.contestants.contains(&contestant) {
            return Err(SessionError::UnknownContestant(contestant));
        }
        let Some(criterion) = criteria::find(self.category, criteria_name) else {
            return Err(SessionError::UnknownCriterion {
                category: self.category,
                name: criteria_name.to_string(),
            });
        };
        let max = f64::from(criterion.max_points);
        if !(0.0..=max).contains(&score) {
            return Err(SessionError::ScoreOutOfRange {
                criteria: criterion.name.to_string(),
                score,
                max: criterion.max_points,
            });
        }

        self.sheet.set(contestant, criterion.name, score);

        let submission = ScoreSubmission {
            contestant,
            category: self.category,
            judge_name: judge,
            criteria: criterion.name.to_string(),
            score,
        };
        self.client.submit_score(&submission).await?;
        Ok(())
    }

    /// Re-submit every filled cell sequentially.
    ///
    /// A failure does not stop the loop and earlier writes stay
    /// committed; the report says exactly which cells landed.
    pub async fn submit_all(&mut self) -> SessionResult<SubmitReport> {
        let Some(judge) = self.judge.clone() else {
            return Err(SessionError::NoJudgeSelected);
        };
        let cells: Vec<(i64, String, f64)> = self
            .sheet
            .cells()
            .map(|(contestant, criteria, score)| (contestant, criteria.to_string(), score))
            .collect();

        let mut report = SubmitReport::default();
        for (contestant, criteria, score) in cells {
            report.attempted += 1;
            let submission = ScoreSubmission {
                contestant,
                category: self.category,
                judge_name: judge.clone(),
                criteria: criteria.clone(),
                score,
            };
            match self.client.submit_score(&submission).await {
                Ok(_) => report.submitted += 1,
                Err(e) => {
                    warn!(contestant, criteria = %criteria, error = %e, "cell submission failed");
                    report.failures.push(SubmitFailure {
                        contestant,
                        criteria,
                        error: e.to_string(),
                    });
                }
            }
        }
        debug!(
            attempted = report.attempted,
            submitted = report.submitted,
            "sheet submitted"
        );
        Ok(report)
    }

    /// Per-contestant totals and ranks for the entry grid.
    pub fn standings(&self) -> Vec<Standing> {
        self.sheet.standings(&self.contestants)
    }
}
