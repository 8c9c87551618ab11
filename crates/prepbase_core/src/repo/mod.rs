//! Store layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for entities,
//!   mappings, memory and config.
//! - Isolate SQL details from callers and keep every mutation atomic.
//!
//! # Invariants
//! - A failed write leaves the database exactly as before the call.
//! - Store APIs return semantic errors (`NotFound`, `DuplicateId`,
//!   `ReferentialIntegrity`) in addition to DB transport errors.

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod config_repo;
pub mod entity_repo;
pub mod mapping_repo;
pub mod memory_repo;

pub use config_repo::{Config, ConfigRepository, SqliteConfigRepository, CONFIG_KEYS};
pub use entity_repo::{
    CreatedPerson, CreatedTeam, DeleteOutcome, EntityRepository, PersonUpdate,
    SqliteEntityRepository, TeamUpdate,
};
pub use mapping_repo::{MappingRepository, SqliteMappingRepository};
pub use memory_repo::{MemoryRepository, MemorySearchHit, SqliteMemoryRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-layer error shared by all repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Schema or referential-integrity violation; the write did not
    /// apply at all.
    Validation(ValidationError),
    /// Id collision on creation.
    DuplicateId(String),
    /// Lookup miss on an operation that requires the record.
    NotFound(String),
    /// Delete blocked by live dependents; retry with force to cascade.
    ReferentialIntegrity {
        id: String,
        member_count: usize,
        mapping_count: usize,
        memory_count: usize,
    },
    /// Malformed query input, e.g. an empty search keyword.
    InvalidArgument(String),
    Db(DbError),
    /// Persisted row violates the domain shape.
    InvalidData(String),
    /// Connection has not been migrated by `open_db`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "id `{id}` already exists"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::ReferentialIntegrity {
                id,
                member_count,
                mapping_count,
                memory_count,
            } => write!(
                f,
                "cannot delete `{id}`: {member_count} member(s), {mapping_count} mapping(s), \
                 {memory_count} memory entr(ies) still reference it (use force to cascade)"
            ),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that skipped `open_db` bootstrap.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    required_tables: &[&'static str],
) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }

    for table in required_tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
