//! Evidence-to-confidence scoring.
//!
//! # Responsibility
//! - Turn a structured evidence bundle into one bounded trust score
//!   and a qualitative level.
//!
//! # Invariants
//! - The factor-to-weight table is data, not inline constants, so
//!   different workflows can score the same bundle differently.
//! - The value is the clamped (not renormalized) sum of triggered
//!   weights, always within `[0, 1]`.
//! - Pure and total: missing evidence means the factor does not
//!   trigger, never an error.

use serde::{Deserialize, Serialize};

/// Meeting-section count at which the "structured history" factor
/// triggers.
pub const MEETING_SECTIONS_THRESHOLD: u32 = 3;
/// Days since the last recorded meeting below which the full recency
/// weight applies.
pub const RECENCY_FRESH_DAYS: u32 = 30;
/// Upper bound for the reduced recency weight; beyond this the factor
/// does not trigger.
pub const RECENCY_AGING_DAYS: u32 = 90;

/// Structured per-entity facts handed in by the external workflow.
///
/// Every field defaults to "no evidence"; absent sources simply leave
/// their factor untriggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceBundle {
    /// External document page was fetched successfully.
    pub document_fetched: bool,
    /// Parsed meeting sections found in the document.
    pub meeting_sections: u32,
    /// Days since the most recent meeting section, when known.
    pub days_since_last_meeting: Option<u32>,
    /// Open action items found in the document.
    pub open_actions: u32,
    /// Memory entries stored for the entity.
    pub memory_entries: u32,
    /// Task rows found in the entity's task database.
    pub database_tasks: u32,
}

/// Factor-to-weight table for one calling workflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub document_fetched: f64,
    /// Applies when `meeting_sections >= MEETING_SECTIONS_THRESHOLD`.
    pub meeting_sections: f64,
    /// Applies when the last meeting is under `RECENCY_FRESH_DAYS` old.
    pub recency_fresh: f64,
    /// Applies when the last meeting is under `RECENCY_AGING_DAYS` old.
    pub recency_aging: f64,
    pub open_actions: f64,
    pub memory_entries: f64,
    pub database_tasks: f64,
}

/// Weight set for the meeting-preparation workflow: document evidence
/// dominates because the report is built from it.
pub const MEETING_PREP: ConfidenceWeights = ConfidenceWeights {
    document_fetched: 0.30,
    meeting_sections: 0.20,
    recency_fresh: 0.15,
    recency_aging: 0.05,
    open_actions: 0.10,
    memory_entries: 0.15,
    database_tasks: 0.10,
};

/// Weight set for the weekly-review workflow: open actions and task
/// evidence matter more than document completeness.
pub const WEEKLY_REVIEW: ConfidenceWeights = ConfidenceWeights {
    document_fetched: 0.20,
    meeting_sections: 0.10,
    recency_fresh: 0.20,
    recency_aging: 0.10,
    open_actions: 0.20,
    memory_entries: 0.15,
    database_tasks: 0.15,
};

/// Qualitative confidence band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Scoring result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Clamped weighted sum in `[0, 1]`.
    pub value: f64,
    pub level: ConfidenceLevel,
}

/// Scores one evidence bundle against one weight table.
pub fn score(evidence: &EvidenceBundle, weights: &ConfidenceWeights) -> Confidence {
    let mut value = 0.0;

    if evidence.document_fetched {
        value += weights.document_fetched;
    }
    if evidence.meeting_sections >= MEETING_SECTIONS_THRESHOLD {
        value += weights.meeting_sections;
    }
    match evidence.days_since_last_meeting {
        Some(days) if days < RECENCY_FRESH_DAYS => value += weights.recency_fresh,
        Some(days) if days < RECENCY_AGING_DAYS => value += weights.recency_aging,
        _ => {}
    }
    if evidence.open_actions > 0 {
        value += weights.open_actions;
    }
    if evidence.memory_entries > 0 {
        value += weights.memory_entries;
    }
    if evidence.database_tasks > 0 {
        value += weights.database_tasks;
    }

    let value = value.clamp(0.0, 1.0);
    Confidence {
        value,
        level: level_for(value),
    }
}

// Documented bands are 0.0-0.4 Low, 0.5-0.7 Medium, 0.8-1.0 High;
// the gaps [0.4,0.5) and (0.7,0.8) resolve to the lower band.
fn level_for(value: f64) -> ConfidenceLevel {
    if value < 0.5 {
        ConfidenceLevel::Low
    } else if value < 0.8 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::High
    }
}
