//! Weighted task ranking.
//!
//! # Responsibility
//! - Score task records against fixed status/impact/recency/due-date
//!   tables and return an ordered top-K subset.
//!
//! # Invariants
//! - Only "In Progress" and "Not Started" tasks qualify; everything
//!   else is filtered out before scoring, never scored at zero.
//! - The sort is total and reproducible: score descending, then
//!   impact sub-score descending, then input order.
//! - An empty input (or an input fully removed by the status filter)
//!   yields an empty result, not an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of tasks returned by [`rank`].
pub const DEFAULT_TOP_K: usize = 5;

const STATUS_WEIGHT: f64 = 0.15;
const IMPACT_WEIGHT: f64 = 0.60;
const RECENCY_WEIGHT: f64 = 0.10;
const DUE_DATE_WEIGHT: f64 = 0.15;

/// One task-like record handed in by the external workflow. Status
/// and impact are free text resolved against fixed lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub status: String,
    pub impact: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub created_date: Option<NaiveDate>,
}

/// Per-factor sub-scores for one ranked task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub status: f64,
    pub impact: f64,
    pub recency: f64,
    pub due_date: f64,
}

impl ScoreBreakdown {
    /// Weighted total in `[0, 1]`.
    pub fn total(&self) -> f64 {
        STATUS_WEIGHT * self.status
            + IMPACT_WEIGHT * self.impact
            + RECENCY_WEIGHT * self.recency
            + DUE_DATE_WEIGHT * self.due_date
    }
}

/// A task that survived the status filter, with its scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTask {
    pub task: TaskRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Ranks tasks as of `today` and returns the best `top_k`.
pub fn rank(tasks: &[TaskRecord], today: NaiveDate, top_k: usize) -> Vec<RankedTask> {
    let mut ranked: Vec<RankedTask> = tasks
        .iter()
        .filter_map(|task| {
            let status = status_score(&task.status)?;
            let breakdown = ScoreBreakdown {
                status,
                impact: impact_score(task.impact.as_deref()),
                recency: recency_score(task.created_date, today),
                due_date: due_date_score(task.due_date, today),
            };
            Some(RankedTask {
                task: task.clone(),
                score: breakdown.total(),
                breakdown,
            })
        })
        .collect();

    // Stable sort keeps input order as the final tie-breaker.
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.breakdown.impact.total_cmp(&a.breakdown.impact))
    });
    ranked.truncate(top_k);
    ranked
}

/// `None` means the status disqualifies the task outright.
fn status_score(status: &str) -> Option<f64> {
    let status = status.trim();
    if status.eq_ignore_ascii_case("in progress") {
        Some(1.0)
    } else if status.eq_ignore_ascii_case("not started") {
        Some(0.7)
    } else {
        None
    }
}

fn impact_score(impact: Option<&str>) -> f64 {
    match impact.map(str::trim) {
        Some(text) if text.eq_ignore_ascii_case("high") || text.eq_ignore_ascii_case("critical") => {
            1.0
        }
        Some(text) if text.eq_ignore_ascii_case("medium") => 0.6,
        Some(text) if text.eq_ignore_ascii_case("low") => 0.3,
        _ => 0.1,
    }
}

// Missing created dates score as "older" rather than being penalized
// below the oldest real date.
fn recency_score(created: Option<NaiveDate>, today: NaiveDate) -> f64 {
    match created {
        Some(created) => {
            let age_days = (today - created).num_days();
            if age_days < 7 {
                1.0
            } else if age_days < 30 {
                0.7
            } else {
                0.3
            }
        }
        None => 0.3,
    }
}

fn due_date_score(due: Option<NaiveDate>, today: NaiveDate) -> f64 {
    match due {
        Some(due) if due < today => 1.0,
        Some(due) if (due - today).num_days() <= 7 => 0.8,
        Some(_) => 0.5,
        None => 0.3,
    }
}
