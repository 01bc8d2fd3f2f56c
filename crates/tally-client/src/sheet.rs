//! Local score sheet state.
//!
//! The sheet is the entry grid's backing container: the scores one
//! judge has filled in for one category, keyed by contestant and
//! criterion. It is deliberately dumb; validation and submission live
//! in the scoring session.

use std::collections::BTreeMap;

use tally_core::{Category, CategoryScores};

/// One judge's locally entered scores for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    category: Category,
    cells: BTreeMap<i64, BTreeMap<String, f64>>,
}

/// Per-contestant running total and rank shown in the entry grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub contestant_id: i64,
    pub total: f64,
    pub rank: usize,
}

impl ScoreSheet {
    /// Empty sheet for a category.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            cells: BTreeMap::new(),
        }
    }

    /// Rebuild a sheet from fetched category scores, keeping only the
    /// given judge's entries.
    pub fn from_fetched(
        category: Category,
        fetched: &BTreeMap<i64, CategoryScores>,
        judge: &str,
    ) -> Self {
        let mut sheet = Self::new(category);
        for (contestant, group) in fetched {
            for entry in &group.scores {
                if entry.judge_name == judge {
                    sheet.set(*contestant, &entry.criteria, entry.score);
                }
            }
        }
        sheet
    }

    /// Category this sheet belongs to.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Write one cell, replacing any previous value.
    pub fn set(&mut self, contestant: i64, criteria: &str, score: f64) {
        self.cells
            .entry(contestant)
            .or_default()
            .insert(criteria.to_string(), score);
    }

    /// Read one cell.
    pub fn get(&self, contestant: i64, criteria: &str) -> Option<f64> {
        self.cells.get(&contestant)?.get(criteria).copied()
    }

    /// Number of filled cells.
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(BTreeMap::is_empty)
    }

    /// Drop every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate filled cells in contestant, then criterion order.
    pub fn cells(&self) -> impl Iterator<Item = (i64, &str, f64)> {
        self.cells.iter().flat_map(|(contestant, row)| {
            row.iter()
                .map(|(criteria, score)| (*contestant, criteria.as_str(), *score))
        })
    }

    /// Sum of this sheet's entries for one contestant.
    pub fn total_for(&self, contestant: i64) -> f64 {
        self.cells
            .get(&contestant)
            .map(|row| row.values().sum())
            .unwrap_or(0.0)
    }

    /// Ranks the given contestants by their sheet totals, best first.
    /// Contestants without entries total zero and still appear; ties
    /// break by contestant number.
    pub fn standings(&self, contestants: &[i64]) -> Vec<Standing> {
        let mut rows: Vec<Standing> = contestants
            .iter()
            .map(|&id| Standing {
                contestant_id: id,
                total: self.total_for(id),
                rank: 0,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.contestant_id.cmp(&b.contestant_id))
        });
        for (idx, row) in rows.iter_mut().enumerate() {
            row.rank = idx + 1;
        }
        rows
    }
}
