//! Per-column type scoring.
//!
//! Each column races one [`CandidateRunner`] per candidate type. A present
//! cell moves every live runner's score by +1 (parsed) or -1 (rejected).
//! The first runner, in candidate order, whose score reaches
//! `max_score * confidence` becomes the column's type and the column stops
//! being scored. `max_score` starts at the sample size and drops by one for
//! every missing cell. A runner whose score falls below
//! `sample_size * (confidence - 1)` can no longer win and is skipped.

use crate::{
    data::{Cell, is_missing},
    field::{Field, FieldType},
};

#[derive(Debug, Clone)]
pub struct CandidateRunner {
    pub field: Field,
    pub score: i64,
}

#[derive(Debug, Clone)]
pub struct ColumnScorer {
    runners: Vec<CandidateRunner>,
    sample_size: usize,
    max_score: i64,
    confidence: f64,
    locked: Option<Field>,
    name: String,
}

impl ColumnScorer {
    pub fn new(name: &str, sample_size: usize, confidence: f64, float_numbers: bool) -> Self {
        let runners = FieldType::CANDIDATES
            .iter()
            .map(|ty| {
                let mut field = Field::new(name, *ty);
                if *ty == FieldType::Number && float_numbers {
                    field.float_number = true;
                }
                CandidateRunner { field, score: 0 }
            })
            .collect();
        Self {
            runners,
            sample_size,
            max_score: sample_size as i64,
            confidence,
            locked: None,
            name: name.to_string(),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    pub fn runners(&self) -> &[CandidateRunner] {
        &self.runners
    }

    pub fn max_score(&self) -> i64 {
        self.max_score
    }

    fn prune_floor(&self) -> f64 {
        self.sample_size as f64 * (self.confidence - 1.0)
    }

    /// Feeds one cell. Returns the winning field when this cell locks the
    /// column's type.
    pub fn observe(&mut self, cell: &Cell, missing_values: &[String]) -> Option<&Field> {
        if self.locked.is_some() {
            return None;
        }
        if is_missing(cell, missing_values) {
            self.max_score -= 1;
            return None;
        }
        let floor = self.prune_floor();
        let threshold = self.max_score as f64 * self.confidence;
        for runner in self.runners.iter_mut() {
            if (runner.score as f64) < floor {
                continue;
            }
            runner.score += if runner.field.parse(cell).is_ok() { 1 } else { -1 };
            if runner.score as f64 >= threshold {
                self.locked = Some(runner.field.clone());
                break;
            }
        }
        self.locked.as_ref()
    }

    /// The locked field, or `any` when no candidate proved itself.
    pub fn finish(self) -> Field {
        self.locked
            .unwrap_or_else(|| Field::new(self.name, FieldType::Any))
    }
}
