//! Append-only memory entries scoped to an entity.
//!
//! # Responsibility
//! - Define the dated observation/note/inference record shape.
//!
//! # Invariants
//! - Entries are immutable once written; there is no update path.
//! - Identity is (entity, date, type, source) plus `seq` when several
//!   entries share all four.
//! - The owning entity id is intentionally not validated here; memory
//!   may outlive the entity it describes.

use super::EntityKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a memory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Something observed about the entity.
    Observation,
    /// A plain note.
    Note,
    /// A conclusion drawn from other evidence.
    Inference,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Note => "note",
            Self::Inference => "inference",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "observation" => Some(Self::Observation),
            "note" => Some(Self::Note),
            "inference" => Some(Self::Inference),
            _ => None,
        }
    }
}

/// Who recorded the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Written directly by the user.
    User,
    /// Written by the external agent on the user's behalf.
    Inferred,
}

impl EntrySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Inferred => "inferred",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "inferred" => Some(Self::Inferred),
            _ => None,
        }
    }
}

/// A stored memory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Owning entity id (may no longer resolve; see module docs).
    pub entity_id: String,
    pub entity_kind: EntityKind,
    /// Calendar date, not a timestamp.
    pub entry_date: NaiveDate,
    pub entry_type: EntryType,
    pub source: EntrySource,
    /// Disambiguator within (entity, date, type, source); starts at 1.
    pub seq: u32,
    /// Free-text body.
    pub body: String,
    /// Optional context, e.g. a meeting reference.
    pub context: Option<String>,
}

/// Request model for appending a memory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemoryEntry {
    pub entity_id: String,
    pub entity_kind: EntityKind,
    pub entry_date: NaiveDate,
    pub entry_type: EntryType,
    pub source: EntrySource,
    pub body: String,
    pub context: Option<String>,
}

impl NewMemoryEntry {
    /// Creates a user observation for the given date, the default
    /// shape used by the `remember` control-plane path.
    pub fn observation(
        entity_id: impl Into<String>,
        entity_kind: EntityKind,
        entry_date: NaiveDate,
        body: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_kind,
            entry_date,
            entry_type: EntryType::Observation,
            source: EntrySource::User,
            body: body.into(),
            context: None,
        }
    }
}
