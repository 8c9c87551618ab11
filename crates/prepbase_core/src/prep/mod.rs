//! Deterministic decision algorithms for meeting preparation.
//!
//! # Responsibility
//! - Match event titles to entity patterns, score evidence bundles
//!   and rank task records.
//!
//! # Invariants
//! - Everything in here is pure and total: no store access, no I/O,
//!   no failure on malformed or missing evidence.

pub mod confidence;
pub mod matcher;
pub mod ranker;

pub use confidence::{
    score, Confidence, ConfidenceLevel, ConfidenceWeights, EvidenceBundle, MEETING_PREP,
    WEEKLY_REVIEW,
};
pub use matcher::{candidates_from_mappings, match_event_title, PatternCandidate};
pub use ranker::{rank, RankedTask, ScoreBreakdown, TaskRecord, DEFAULT_TOP_K};
