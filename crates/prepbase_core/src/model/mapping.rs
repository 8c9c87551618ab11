//! Calendar-pattern mapping records.
//!
//! # Responsibility
//! - Link a free-text calendar pattern to an entity and an optional
//!   external document reference.
//!
//! # Invariants
//! - `entity_id` resolves in the entity store at write time.
//! - Deleting the referenced entity either cascades or is refused;
//!   a mapping is never left dangling.

use super::EntityKind;
use serde::{Deserialize, Serialize};

/// A stored pattern-to-entity mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Stable slug identifier derived from the pattern text.
    pub id: String,
    /// Free-text substring matched against calendar event titles.
    pub pattern: String,
    /// Target entity in the flat Person + Team namespace.
    pub entity_id: String,
    /// Kind of the target, recorded at creation time.
    pub entity_kind: EntityKind,
    /// External document reference, possibly inherited from the
    /// target entity at creation time.
    pub doc_ref: Option<String>,
}

/// Request model for creating a mapping.
///
/// `id = None` derives the identifier from `pattern`. Unlike entity
/// creation, a derived mapping id that collides fails; auto-seeded
/// mappings follow the same rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMapping {
    pub id: Option<String>,
    pub pattern: String,
    pub entity_id: String,
    pub doc_ref: Option<String>,
}
