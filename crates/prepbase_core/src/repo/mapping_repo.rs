//! Mapping store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own calendar-pattern mapping records as non-owning references
//!   into the entity namespace.
//!
//! # Invariants
//! - `add` verifies the target entity exists; the kind is recorded
//!   from the entity, never trusted from the caller.
//! - Mappings have no dependents; `delete` is unconditional.

use crate::model::entity::validate_id;
use crate::model::{slugify, Mapping, NewMapping, ValidationError};
use crate::repo::entity_repo::load_entity;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const MAPPING_SELECT_SQL: &str =
    "SELECT id, pattern, entity_id, entity_kind, doc_ref FROM mappings";

/// Store interface for mapping operations.
pub trait MappingRepository {
    fn add(&self, new: &NewMapping) -> RepoResult<Mapping>;
    /// Unconditional delete; `NotFound` only when the id is unknown.
    fn delete(&self, id: &str) -> RepoResult<()>;
    fn get(&self, id: &str) -> RepoResult<Mapping>;
    /// All mappings ordered by id.
    fn list(&self) -> RepoResult<Vec<Mapping>>;
    /// Mappings targeting one entity, ordered by id.
    fn find_by_entity(&self, entity_id: &str) -> RepoResult<Vec<Mapping>>;
}

/// SQLite-backed mapping store.
pub struct SqliteMappingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMappingRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["mappings", "entities"])?;
        Ok(Self { conn })
    }
}

impl MappingRepository for SqliteMappingRepository<'_> {
    fn add(&self, new: &NewMapping) -> RepoResult<Mapping> {
        let pattern = new.pattern.trim();
        if pattern.is_empty() {
            return Err(ValidationError::EmptyPattern.into());
        }

        let entity = load_entity(self.conn, &new.entity_id)?
            .ok_or_else(|| ValidationError::UnknownEntity(new.entity_id.clone()))?;

        let id = match new.id.as_deref() {
            Some(id) => {
                validate_id(id)?;
                id.to_string()
            }
            None => slugify(pattern)
                .ok_or_else(|| ValidationError::InvalidId(pattern.to_string()))?,
        };
        if self.mapping_exists(&id)? {
            return Err(RepoError::DuplicateId(id));
        }

        // Inherit the entity's document reference when none is given.
        let doc_ref = new
            .doc_ref
            .clone()
            .or_else(|| entity.doc_ref().map(str::to_string));

        self.conn.execute(
            "INSERT INTO mappings (id, pattern, entity_id, entity_kind, doc_ref)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id,
                pattern,
                entity.id(),
                entity.kind().as_str(),
                doc_ref.as_deref(),
            ],
        )?;
        log::info!(
            "event=mapping_add module=repo status=ok id={id} entity_id={}",
            entity.id()
        );

        Ok(Mapping {
            id,
            pattern: pattern.to_string(),
            entity_id: entity.id().to_string(),
            entity_kind: entity.kind(),
            doc_ref,
        })
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM mappings WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Mapping> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MAPPING_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_mapping_row(row),
            None => Err(RepoError::NotFound(id.to_string())),
        }
    }

    fn list(&self) -> RepoResult<Vec<Mapping>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MAPPING_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut mappings = Vec::new();
        while let Some(row) = rows.next()? {
            mappings.push(parse_mapping_row(row)?);
        }
        Ok(mappings)
    }

    fn find_by_entity(&self, entity_id: &str) -> RepoResult<Vec<Mapping>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MAPPING_SELECT_SQL} WHERE entity_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([entity_id])?;
        let mut mappings = Vec::new();
        while let Some(row) = rows.next()? {
            mappings.push(parse_mapping_row(row)?);
        }
        Ok(mappings)
    }
}

impl SqliteMappingRepository<'_> {
    fn mapping_exists(&self, id: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM mappings WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_mapping_row(row: &Row<'_>) -> RepoResult<Mapping> {
    let kind_text: String = row.get("entity_kind")?;
    let entity_kind = crate::model::EntityKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entity kind `{kind_text}` in mappings"))
    })?;

    Ok(Mapping {
        id: row.get("id")?,
        pattern: row.get("pattern")?,
        entity_id: row.get("entity_id")?,
        entity_kind,
        doc_ref: row.get("doc_ref")?,
    })
}
