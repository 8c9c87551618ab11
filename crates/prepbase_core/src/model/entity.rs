//! Person and Team domain records.
//!
//! # Responsibility
//! - Define the two entity shapes sharing one flat id namespace.
//! - Provide slug derivation for stable, name-derived identifiers.
//!
//! # Invariants
//! - `id` is stable once assigned and unique across Person + Team.
//! - A Person's `team_ids` only ever reference existing teams at
//!   write time (enforced by the repository layer).

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ID_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("id rule regex is valid"));

/// Discriminator for the combined Person + Team namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Team,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Team => "team",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "person" => Some(Self::Person),
            "team" => Some(Self::Team),
            _ => None,
        }
    }
}

/// A person tracked by the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable slug identifier, unique across people and teams.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Job title or role.
    pub role: Option<String>,
    /// Ordered memberships; a person may belong to zero teams.
    pub team_ids: Vec<String>,
    /// Free-form tags, unique within the set.
    pub tags: Vec<String>,
    /// Ordered substrings matched against calendar event titles.
    pub calendar_patterns: Vec<String>,
    /// External document reference (URL or page id).
    pub doc_ref: Option<String>,
}

/// A team or group tracked by the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable slug identifier, unique across people and teams.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form team category (e.g. engineering, product).
    pub team_type: Option<String>,
    /// Ordered substrings matched against calendar event titles.
    pub calendar_patterns: Vec<String>,
    /// External document reference (URL or page id).
    pub doc_ref: Option<String>,
}

/// Either side of the flat entity namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Entity {
    Person(Person),
    Team(Team),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Self::Person(person) => &person.id,
            Self::Team(team) => &team.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Person(person) => &person.name,
            Self::Team(team) => &team.name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Team(_) => EntityKind::Team,
        }
    }

    pub fn doc_ref(&self) -> Option<&str> {
        match self {
            Self::Person(person) => person.doc_ref.as_deref(),
            Self::Team(team) => team.doc_ref.as_deref(),
        }
    }

    pub fn calendar_patterns(&self) -> &[String] {
        match self {
            Self::Person(person) => &person.calendar_patterns,
            Self::Team(team) => &team.calendar_patterns,
        }
    }
}

/// Request model for creating a person.
///
/// `id = None` derives the identifier from `name` and resolves
/// collisions with a deterministic numeric suffix; an explicit id
/// that collides fails instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    pub id: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub team_ids: Vec<String>,
    pub tags: Vec<String>,
    pub calendar_patterns: Vec<String>,
    pub doc_ref: Option<String>,
}

/// Request model for creating a team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTeam {
    pub id: Option<String>,
    pub name: String,
    pub team_type: Option<String>,
    pub calendar_patterns: Vec<String>,
    pub doc_ref: Option<String>,
}

/// Derives a slug identifier from free text.
///
/// Lowercases, maps spaces/underscores to hyphens, strips everything
/// outside `[a-z0-9-]`, collapses hyphen runs and trims the ends.
/// Returns `None` when nothing survives (e.g. punctuation-only input).
pub fn slugify(text: &str) -> Option<String> {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = false;
    for ch in text.trim().to_lowercase().chars() {
        let mapped = match ch {
            ' ' | '_' | '\t' | '-' => Some('-'),
            'a'..='z' | '0'..='9' => Some(ch),
            _ => None,
        };
        if let Some(ch) = mapped {
            if ch == '-' {
                if !last_was_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                last_was_hyphen = true;
            } else {
                slug.push(ch);
                last_was_hyphen = false;
            }
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// Validates a caller-provided identifier against the slug rule.
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if ID_RULE.is_match(id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{slugify, validate_id, Entity, EntityKind, Person};
    use crate::model::ValidationError;

    #[test]
    fn slugify_normalizes_names() {
        assert_eq!(slugify("John Doe").as_deref(), Some("john-doe"));
        assert_eq!(slugify("ML_Platform  Team").as_deref(), Some("ml-platform-team"));
        assert_eq!(slugify("--Weekly -- Sync--").as_deref(), Some("weekly-sync"));
        assert_eq!(slugify("1:1 John").as_deref(), Some("11-john"));
    }

    #[test]
    fn slugify_rejects_unusable_input() {
        assert_eq!(slugify("!!!"), None);
        assert_eq!(slugify("   "), None);
        assert_eq!(slugify("---"), None);
    }

    #[test]
    fn validate_id_enforces_slug_rule() {
        assert!(validate_id("jane-doe").is_ok());
        assert!(validate_id("team-42").is_ok());
        assert_eq!(
            validate_id("Jane Doe"),
            Err(ValidationError::InvalidId("Jane Doe".to_string()))
        );
        assert!(validate_id("").is_err());
    }

    #[test]
    fn entity_accessors_cover_both_kinds() {
        let entity = Entity::Person(Person {
            id: "jane".to_string(),
            name: "Jane".to_string(),
            role: None,
            team_ids: vec!["platform".to_string()],
            tags: Vec::new(),
            calendar_patterns: vec!["1:1 Jane".to_string()],
            doc_ref: Some("doc-1".to_string()),
        });
        assert_eq!(entity.id(), "jane");
        assert_eq!(entity.kind(), EntityKind::Person);
        assert_eq!(entity.doc_ref(), Some("doc-1"));
        assert_eq!(entity.calendar_patterns().len(), 1);
    }

    #[test]
    fn entity_kind_serializes_snake_case() {
        let json = serde_json::to_string(&EntityKind::Person).unwrap();
        assert_eq!(json, "\"person\"");
    }
}
