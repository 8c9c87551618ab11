//! Event-title to entity pattern matching.
//!
//! # Responsibility
//! - Decide which declared pattern, if any, an event title matches.
//!
//! # Invariants
//! - Containment is case-insensitive and tests pattern-in-title,
//!   never the reverse.
//! - Longer patterns beat shorter ones; remaining ties go to the
//!   earliest candidate, so callers must supply candidates in a
//!   fixed, reproducible order.
//! - No match is `None`, never an error.

use crate::model::Mapping;

/// One candidate pattern with the entity it would resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCandidate {
    pub pattern: String,
    pub entity_id: String,
}

/// Builds the candidate list from stored mappings, preserving the
/// store's id ordering so results stay reproducible.
pub fn candidates_from_mappings(mappings: &[Mapping]) -> Vec<PatternCandidate> {
    mappings
        .iter()
        .map(|mapping| PatternCandidate {
            pattern: mapping.pattern.clone(),
            entity_id: mapping.entity_id.clone(),
        })
        .collect()
}

/// Returns the best-matching candidate for an event title, or `None`
/// when nothing matches.
pub fn match_event_title<'a>(
    title: &str,
    candidates: &'a [PatternCandidate],
) -> Option<&'a PatternCandidate> {
    let title = title.to_lowercase();
    let mut best: Option<&PatternCandidate> = None;

    for candidate in candidates {
        let pattern = candidate.pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        if !title.contains(&pattern.to_lowercase()) {
            continue;
        }
        // Strictly-greater keeps the earliest candidate on equal length.
        let better = match best {
            None => true,
            Some(current) => pattern.chars().count() > current.pattern.trim().chars().count(),
        };
        if better {
            best = Some(candidate);
        }
    }

    best
}
