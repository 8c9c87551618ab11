//! Memory store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Append dated observation/note/inference entries per entity.
//! - Provide keyword search across all entities.
//!
//! # Invariants
//! - `append` does not validate that the entity id currently resolves;
//!   re-validation is the caller's responsibility (memory survives as
//!   orphaned history unless an entity-delete cascade removes it).
//! - Entries are never updated; only appended, listed and searched.
//! - `list_for` orders by date ascending, insertion order within a
//!   date; `search` orders most recent first.

use crate::model::{MemoryEntry, NewMemoryEntry};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const MEMORY_SELECT_SQL: &str = "SELECT
    entity_id,
    entity_kind,
    entry_date,
    entry_type,
    source,
    seq,
    body,
    context
FROM memory_entries";

/// One search match, paired with the owning entity id for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySearchHit {
    pub entity_id: String,
    pub entry: MemoryEntry,
}

/// Store interface for memory operations.
pub trait MemoryRepository {
    fn append(&self, new: &NewMemoryEntry) -> RepoResult<MemoryEntry>;
    fn list_for(&self, entity_id: &str) -> RepoResult<Vec<MemoryEntry>>;
    /// Case-insensitive substring search over body and context.
    fn search(&self, keyword: &str) -> RepoResult<Vec<MemorySearchHit>>;
    /// Removes all entries for one entity; returns how many went.
    /// Store-level capability used by the entity-delete cascade.
    fn delete_for(&self, entity_id: &str) -> RepoResult<usize>;
}

/// SQLite-backed memory store.
pub struct SqliteMemoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["memory_entries"])?;
        Ok(Self { conn })
    }
}

impl MemoryRepository for SqliteMemoryRepository<'_> {
    fn append(&self, new: &NewMemoryEntry) -> RepoResult<MemoryEntry> {
        // Seq is computed in the same INSERT so identity stays unique
        // under the single-writer model without a separate read.
        self.conn.execute(
            "INSERT INTO memory_entries
                (entity_id, entity_kind, entry_date, entry_type, source, seq, body, context)
             VALUES (
                ?1, ?2, ?3, ?4, ?5,
                (SELECT COALESCE(MAX(seq), 0) + 1
                 FROM memory_entries
                 WHERE entity_id = ?1
                   AND entry_date = ?3
                   AND entry_type = ?4
                   AND source = ?5),
                ?6, ?7
             );",
            params![
                new.entity_id,
                new.entity_kind.as_str(),
                new.entry_date.to_string(),
                new.entry_type.as_str(),
                new.source.as_str(),
                new.body,
                new.context.as_deref(),
            ],
        )?;

        let seq: u32 = self.conn.query_row(
            "SELECT MAX(seq) FROM memory_entries
             WHERE entity_id = ?1 AND entry_date = ?2 AND entry_type = ?3 AND source = ?4;",
            params![
                new.entity_id,
                new.entry_date.to_string(),
                new.entry_type.as_str(),
                new.source.as_str(),
            ],
            |row| row.get(0),
        )?;
        log::info!(
            "event=memory_append module=repo status=ok entity_id={} entry_type={} seq={seq}",
            new.entity_id,
            new.entry_type.as_str()
        );

        Ok(MemoryEntry {
            entity_id: new.entity_id.clone(),
            entity_kind: new.entity_kind,
            entry_date: new.entry_date,
            entry_type: new.entry_type,
            source: new.source,
            seq,
            body: new.body.clone(),
            context: new.context.clone(),
        })
    }

    fn list_for(&self, entity_id: &str) -> RepoResult<Vec<MemoryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORY_SELECT_SQL} WHERE entity_id = ?1 ORDER BY entry_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([entity_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_memory_row(row)?);
        }
        Ok(entries)
    }

    fn search(&self, keyword: &str) -> RepoResult<Vec<MemorySearchHit>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(RepoError::InvalidArgument(
                "search keyword cannot be empty".to_string(),
            ));
        }
        let needle = keyword.to_lowercase();

        // Substring match happens in Rust: SQLite LOWER() is
        // ASCII-only, which would miss non-ASCII keywords.
        let mut stmt = self.conn.prepare(&format!(
            "{MEMORY_SELECT_SQL} ORDER BY entry_date DESC, entity_id ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut hits = Vec::new();
        while let Some(row) = rows.next()? {
            let entry = parse_memory_row(row)?;
            let in_body = entry.body.to_lowercase().contains(&needle);
            let in_context = entry
                .context
                .as_deref()
                .is_some_and(|context| context.to_lowercase().contains(&needle));
            if in_body || in_context {
                hits.push(MemorySearchHit {
                    entity_id: entry.entity_id.clone(),
                    entry,
                });
            }
        }
        Ok(hits)
    }

    fn delete_for(&self, entity_id: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM memory_entries WHERE entity_id = ?1;", [entity_id])?;
        Ok(removed)
    }
}

fn parse_memory_row(row: &Row<'_>) -> RepoResult<MemoryEntry> {
    let kind_text: String = row.get("entity_kind")?;
    let entity_kind = crate::model::EntityKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entity kind `{kind_text}` in memory_entries"))
    })?;

    let date_text: String = row.get("entry_date")?;
    let entry_date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!("invalid entry date `{date_text}` in memory_entries"))
    })?;

    let type_text: String = row.get("entry_type")?;
    let entry_type = crate::model::EntryType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entry type `{type_text}` in memory_entries"))
    })?;

    let source_text: String = row.get("source")?;
    let source = crate::model::EntrySource::parse(&source_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid source `{source_text}` in memory_entries"))
    })?;

    Ok(MemoryEntry {
        entity_id: row.get("entity_id")?,
        entity_kind,
        entry_date,
        entry_type,
        source,
        seq: row.get("seq")?,
        body: row.get("body")?,
        context: row.get("context")?,
    })
}
