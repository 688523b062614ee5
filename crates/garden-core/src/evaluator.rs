//! Achievement evaluator
//!
//! Single pass over a [`GardenGrid`] in index order:
//! - earned cells are never re-checked
//! - empty cells without a catalog rule are skipped
//! - a matching rule replaces the cell with its reward dated `snapshot.today`
//!
//! A predicate fault leaves its cell untouched and is reported in
//! [`Evaluation::faults`]; the rest of the pass continues.

use crate::activity::ActivitySnapshot;
use crate::catalog::{AchievementRule, RuleCatalog};
use crate::error::PredicateError;
use crate::types::{AchievementId, GardenCell, GardenGrid, Suggestion};
use serde::Serialize;

/// A cell filled during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Award {
    /// Grid index
    pub index: usize,
    /// Achievement earned
    pub achievement: AchievementId,
}

/// A rule that could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFault {
    /// Grid index of the affected cell
    pub index: usize,
    /// Achievement whose rule failed
    pub achievement: AchievementId,
    /// What went wrong
    #[serde(serialize_with = "serialize_display")]
    pub error: PredicateError,
}

fn serialize_display<S: serde::Serializer>(
    error: &PredicateError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Result of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationOutcome {
    /// No cell matched; nothing to persist
    NoChange,
    /// At least one cell was filled
    Updated {
        /// The new grid, same length and order as the input
        grid: GardenGrid,
        /// Cells filled in this pass, in grid order
        awarded: Vec<Award>,
    },
}

/// Outcome plus any predicate faults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// What changed
    pub outcome: EvaluationOutcome,
    /// Rules that faulted during the pass
    pub faults: Vec<RuleFault>,
}

impl Evaluation {
    /// Check if the pass filled any cell
    #[inline]
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self.outcome, EvaluationOutcome::Updated { .. })
    }

    /// New grid, if any cell was filled
    #[must_use]
    pub fn updated_grid(&self) -> Option<&GardenGrid> {
        match &self.outcome {
            EvaluationOutcome::Updated { grid, .. } => Some(grid),
            EvaluationOutcome::NoChange => None,
        }
    }

    /// Cells filled in this pass
    #[must_use]
    pub fn awarded(&self) -> &[Award] {
        match &self.outcome {
            EvaluationOutcome::Updated { awarded, .. } => awarded,
            EvaluationOutcome::NoChange => &[],
        }
    }
}

/// Rule matcher bound to a catalog
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'c> {
    catalog: &'c RuleCatalog,
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new(RuleCatalog::standard())
    }
}

impl<'c> Evaluator<'c> {
    /// Create an evaluator over `catalog`
    #[inline]
    #[must_use]
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Catalog in use
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &'c RuleCatalog {
        self.catalog
    }

    /// Evaluate `grid` against `snapshot`
    ///
    /// Deterministic: the same grid, snapshot and catalog always produce the
    /// same evaluation.
    #[must_use]
    pub fn evaluate(&self, grid: &GardenGrid, snapshot: &ActivitySnapshot) -> Evaluation {
        let mut cells = Vec::with_capacity(grid.len());
        let mut awarded = Vec::new();
        let mut faults = Vec::new();

        for (index, cell) in grid.iter().enumerate() {
            let GardenCell::Empty { suggestion } = cell else {
                cells.push(cell.clone());
                continue;
            };

            let Some(rule) = self.find_rule(suggestion) else {
                tracing::debug!(index, suggestion = suggestion.text(), "no rule for cell");
                cells.push(cell.clone());
                continue;
            };

            match rule.check(snapshot) {
                Ok(true) => {
                    tracing::info!(index, achievement = %rule.id(), "achievement earned");
                    cells.push(rule.reward().earn(snapshot.today));
                    awarded.push(Award {
                        index,
                        achievement: rule.id(),
                    });
                }
                Ok(false) => cells.push(cell.clone()),
                Err(error) => {
                    tracing::warn!(index, achievement = %rule.id(), %error, "rule check failed");
                    cells.push(cell.clone());
                    faults.push(RuleFault {
                        index,
                        achievement: rule.id(),
                        error,
                    });
                }
            }
        }

        let outcome = if awarded.is_empty() {
            EvaluationOutcome::NoChange
        } else {
            EvaluationOutcome::Updated {
                grid: GardenGrid::from_cells(cells),
                awarded,
            }
        };

        Evaluation { outcome, faults }
    }

    fn find_rule(&self, suggestion: &Suggestion) -> Option<&'c AchievementRule> {
        suggestion
            .achievement()
            .and_then(|id| self.catalog.find(id))
    }
}

/// Evaluate with the standard catalog
#[must_use]
pub fn evaluate(grid: &GardenGrid, snapshot: &ActivitySnapshot) -> Evaluation {
    Evaluator::default().evaluate(grid, snapshot)
}
