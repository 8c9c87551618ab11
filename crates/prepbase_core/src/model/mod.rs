//! Domain model for entities, mappings and memory entries.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own schema-level validation rules (names, identifier slugs,
//!   referential references).
//!
//! # Invariants
//! - Person and Team identifiers share one flat namespace.
//! - Identifiers match `^[a-z0-9-]+$` and never change once assigned.

pub mod entity;
pub mod mapping;
pub mod memory;

pub use entity::{slugify, Entity, EntityKind, NewPerson, NewTeam, Person, Team};
pub use mapping::{Mapping, NewMapping};
pub use memory::{EntrySource, EntryType, MemoryEntry, NewMemoryEntry};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema or referential-integrity violation detected on a write path.
///
/// Always recoverable by the caller by fixing input; a failed
/// validation never partially applies a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Entity name is empty or whitespace-only.
    EmptyName,
    /// Identifier does not match the slug rule, or no slug could be
    /// derived from the given name/pattern.
    InvalidId(String),
    /// A referenced team id does not resolve to an existing team.
    UnknownTeam(String),
    /// A referenced entity id does not resolve at all.
    UnknownEntity(String),
    /// Calendar pattern is empty or whitespace-only.
    EmptyPattern,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidId(id) => write!(
                f,
                "invalid identifier `{id}`: expected lowercase letters, digits and hyphens"
            ),
            Self::UnknownTeam(id) => write!(f, "team `{id}` does not exist"),
            Self::UnknownEntity(id) => write!(f, "entity `{id}` does not exist"),
            Self::EmptyPattern => write!(f, "calendar pattern cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
