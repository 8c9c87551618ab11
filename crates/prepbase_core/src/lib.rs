//! Core domain logic for PrepBase.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod prep;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Entity, EntityKind, EntrySource, EntryType, Mapping, MemoryEntry, NewMapping, NewMemoryEntry,
    NewPerson, NewTeam, Person, Team, ValidationError,
};
pub use prep::{
    candidates_from_mappings, match_event_title, rank, score, Confidence, ConfidenceLevel,
    ConfidenceWeights, EvidenceBundle, PatternCandidate, RankedTask, TaskRecord, DEFAULT_TOP_K,
    MEETING_PREP, WEEKLY_REVIEW,
};
pub use repo::{
    Config, ConfigRepository, CreatedPerson, CreatedTeam, DeleteOutcome, EntityRepository,
    MappingRepository, MemoryRepository, MemorySearchHit, PersonUpdate, RepoError, RepoResult,
    SqliteConfigRepository, SqliteEntityRepository, SqliteMappingRepository,
    SqliteMemoryRepository, TeamUpdate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
