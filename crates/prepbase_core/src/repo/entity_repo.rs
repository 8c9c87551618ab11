//! Entity store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the Person/Team lifecycle over the flat id namespace.
//! - Enforce team-reference integrity and delete-with-dependents
//!   protection, cascading across mappings and memory on force.
//! - Auto-seed one calendar-pattern mapping per declared pattern at
//!   creation time, inside the same transaction.
//!
//! # Invariants
//! - Every write is a single transaction; a failed validation leaves
//!   the database untouched.
//! - Team-membership and tag mutation are idempotent set operations.
//! - Auto-seeded mappings follow the same duplicate-id rules as an
//!   explicit mapping add; a collision fails the whole creation.

use crate::model::entity::validate_id;
use crate::model::{
    slugify, Entity, EntityKind, NewPerson, NewTeam, Person, Team, ValidationError,
};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Result of creating a person, including how many calendar-pattern
/// mappings were auto-seeded for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPerson {
    pub person: Person,
    pub mappings_created: usize,
}

/// Result of creating a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTeam {
    pub team: Team,
    pub mappings_created: usize,
}

/// Partial update for a person; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub doc_ref: Option<String>,
}

/// Partial update for a team; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub team_type: Option<String>,
    pub doc_ref: Option<String>,
}

/// What a (possibly cascading) delete removed besides the entity row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: String,
    pub kind: EntityKind,
    /// Membership rows removed (dependent members plus, for a person,
    /// its own memberships).
    pub removed_team_links: usize,
    pub removed_mappings: usize,
    pub removed_memory_entries: usize,
}

/// Store interface for Person/Team lifecycle operations.
pub trait EntityRepository {
    fn add_person(&mut self, new: &NewPerson) -> RepoResult<CreatedPerson>;
    fn add_team(&mut self, new: &NewTeam) -> RepoResult<CreatedTeam>;
    /// Lookup returning `None` on a miss.
    fn find(&self, id: &str) -> RepoResult<Option<Entity>>;
    /// Lookup failing with `NotFound` on a miss.
    fn get(&self, id: &str) -> RepoResult<Entity>;
    /// All entities, optionally one kind, ordered by id.
    fn list(&self, kind: Option<EntityKind>) -> RepoResult<Vec<Entity>>;
    /// People whose memberships include the given team, ordered by id.
    fn team_members(&self, team_id: &str) -> RepoResult<Vec<Person>>;
    fn update_person(&mut self, id: &str, update: &PersonUpdate) -> RepoResult<Person>;
    fn update_team(&mut self, id: &str, update: &TeamUpdate) -> RepoResult<Team>;
    /// Idempotent: adding an already-present team id is a no-op.
    fn add_team_to_person(&mut self, person_id: &str, team_id: &str) -> RepoResult<Person>;
    /// Idempotent: removing an absent team id is a no-op.
    fn remove_team_from_person(&mut self, person_id: &str, team_id: &str) -> RepoResult<Person>;
    fn replace_teams(&mut self, person_id: &str, team_ids: &[String]) -> RepoResult<Person>;
    /// Idempotent: adding a present tag is a no-op.
    fn add_tag(&mut self, person_id: &str, tag: &str) -> RepoResult<Person>;
    /// Idempotent: removing an absent tag is a no-op.
    fn remove_tag(&mut self, person_id: &str, tag: &str) -> RepoResult<Person>;
    fn replace_tags(&mut self, person_id: &str, tags: &[String]) -> RepoResult<Person>;
    /// Fails with `ReferentialIntegrity` when dependents exist and
    /// `force` is not set; with `force`, cascades in one transaction.
    fn delete(&mut self, id: &str, force: bool) -> RepoResult<DeleteOutcome>;
}

/// SQLite-backed entity store.
#[derive(Debug)]
pub struct SqliteEntityRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntityRepository<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                "entities",
                "person_teams",
                "entity_tags",
                "entity_patterns",
                "mappings",
                "memory_entries",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteEntityRepository<'_> {
    fn add_person(&mut self, new: &NewPerson) -> RepoResult<CreatedPerson> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let team_ids = dedupe_trimmed(&new.team_ids);
        let tags = dedupe_trimmed(&new.tags);
        let patterns = dedupe_trimmed(&new.calendar_patterns);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        for team_id in &team_ids {
            if entity_kind_of(&tx, team_id)? != Some(EntityKind::Team) {
                return Err(ValidationError::UnknownTeam(team_id.clone()).into());
            }
        }

        let id = resolve_new_entity_id(&tx, new.id.as_deref(), name)?;
        tx.execute(
            "INSERT INTO entities (id, kind, name, role, doc_ref)
             VALUES (?1, 'person', ?2, ?3, ?4);",
            params![id, name, new.role.as_deref(), new.doc_ref.as_deref()],
        )?;
        for (position, team_id) in team_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO person_teams (person_id, team_id, position) VALUES (?1, ?2, ?3);",
                params![id, team_id, position as i64],
            )?;
        }
        for tag in &tags {
            tx.execute(
                "INSERT INTO entity_tags (entity_id, tag) VALUES (?1, ?2);",
                params![id, tag],
            )?;
        }
        insert_patterns(&tx, &id, &patterns)?;
        let mappings_created =
            seed_mappings(&tx, &id, EntityKind::Person, &patterns, new.doc_ref.as_deref())?;

        tx.commit()?;
        log::info!(
            "event=entity_add module=repo status=ok kind=person id={id} mappings_created={mappings_created}"
        );

        Ok(CreatedPerson {
            person: Person {
                id,
                name: name.to_string(),
                role: new.role.clone(),
                team_ids,
                tags,
                calendar_patterns: patterns,
                doc_ref: new.doc_ref.clone(),
            },
            mappings_created,
        })
    }

    fn add_team(&mut self, new: &NewTeam) -> RepoResult<CreatedTeam> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let patterns = dedupe_trimmed(&new.calendar_patterns);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let id = resolve_new_entity_id(&tx, new.id.as_deref(), name)?;
        tx.execute(
            "INSERT INTO entities (id, kind, name, team_type, doc_ref)
             VALUES (?1, 'team', ?2, ?3, ?4);",
            params![id, name, new.team_type.as_deref(), new.doc_ref.as_deref()],
        )?;
        insert_patterns(&tx, &id, &patterns)?;
        let mappings_created =
            seed_mappings(&tx, &id, EntityKind::Team, &patterns, new.doc_ref.as_deref())?;

        tx.commit()?;
        log::info!(
            "event=entity_add module=repo status=ok kind=team id={id} mappings_created={mappings_created}"
        );

        Ok(CreatedTeam {
            team: Team {
                id,
                name: name.to_string(),
                team_type: new.team_type.clone(),
                calendar_patterns: patterns,
                doc_ref: new.doc_ref.clone(),
            },
            mappings_created,
        })
    }

    fn find(&self, id: &str) -> RepoResult<Option<Entity>> {
        load_entity(self.conn, id)
    }

    fn get(&self, id: &str) -> RepoResult<Entity> {
        load_entity(self.conn, id)?.ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    fn list(&self, kind: Option<EntityKind>) -> RepoResult<Vec<Entity>> {
        let mut sql = String::from("SELECT id FROM entities");
        if kind.is_some() {
            sql.push_str(" WHERE kind = ?1");
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let ids: Vec<String> = match kind {
            Some(kind) => stmt
                .query_map([kind.as_str()], |row| row.get(0))?
                .collect::<Result<_, _>>()?,
            None => stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<_, _>>()?,
        };

        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = load_entity(self.conn, &id)? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    fn team_members(&self, team_id: &str) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id FROM person_teams WHERE team_id = ?1 ORDER BY person_id ASC;",
        )?;
        let ids: Vec<String> = stmt
            .query_map([team_id], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(Entity::Person(person)) = load_entity(self.conn, &id)? {
                members.push(person);
            }
        }
        Ok(members)
    }

    fn update_person(&mut self, id: &str, update: &PersonUpdate) -> RepoResult<Person> {
        if let Some(name) = update.name.as_deref() {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName.into());
            }
        }

        let changed = self.conn.execute(
            "UPDATE entities
             SET
                name = COALESCE(?2, name),
                role = COALESCE(?3, role),
                doc_ref = COALESCE(?4, doc_ref),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND kind = 'person';",
            params![
                id,
                update.name.as_deref().map(str::trim),
                update.role.as_deref(),
                update.doc_ref.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        expect_person(load_entity(self.conn, id)?, id)
    }

    fn update_team(&mut self, id: &str, update: &TeamUpdate) -> RepoResult<Team> {
        if let Some(name) = update.name.as_deref() {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName.into());
            }
        }

        let changed = self.conn.execute(
            "UPDATE entities
             SET
                name = COALESCE(?2, name),
                team_type = COALESCE(?3, team_type),
                doc_ref = COALESCE(?4, doc_ref),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1 AND kind = 'team';",
            params![
                id,
                update.name.as_deref().map(str::trim),
                update.team_type.as_deref(),
                update.doc_ref.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }

        expect_team(load_entity(self.conn, id)?, id)
    }

    fn add_team_to_person(&mut self, person_id: &str, team_id: &str) -> RepoResult<Person> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }
        if entity_kind_of(&tx, team_id)? != Some(EntityKind::Team) {
            return Err(ValidationError::UnknownTeam(team_id.to_string()).into());
        }

        tx.execute(
            "INSERT OR IGNORE INTO person_teams (person_id, team_id, position)
             VALUES (
                ?1,
                ?2,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM person_teams WHERE person_id = ?1)
             );",
            params![person_id, team_id],
        )?;
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn remove_team_from_person(&mut self, person_id: &str, team_id: &str) -> RepoResult<Person> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }

        tx.execute(
            "DELETE FROM person_teams WHERE person_id = ?1 AND team_id = ?2;",
            params![person_id, team_id],
        )?;
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn replace_teams(&mut self, person_id: &str, team_ids: &[String]) -> RepoResult<Person> {
        let team_ids = dedupe_trimmed(team_ids);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }
        for team_id in &team_ids {
            if entity_kind_of(&tx, team_id)? != Some(EntityKind::Team) {
                return Err(ValidationError::UnknownTeam(team_id.clone()).into());
            }
        }

        tx.execute(
            "DELETE FROM person_teams WHERE person_id = ?1;",
            [person_id],
        )?;
        for (position, team_id) in team_ids.iter().enumerate() {
            tx.execute(
                "INSERT INTO person_teams (person_id, team_id, position) VALUES (?1, ?2, ?3);",
                params![person_id, team_id, position as i64],
            )?;
        }
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn add_tag(&mut self, person_id: &str, tag: &str) -> RepoResult<Person> {
        let tag = non_empty_tag(tag)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }

        tx.execute(
            "INSERT OR IGNORE INTO entity_tags (entity_id, tag) VALUES (?1, ?2);",
            params![person_id, tag],
        )?;
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn remove_tag(&mut self, person_id: &str, tag: &str) -> RepoResult<Person> {
        let tag = non_empty_tag(tag)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }

        tx.execute(
            "DELETE FROM entity_tags WHERE entity_id = ?1 AND tag = ?2;",
            params![person_id, tag],
        )?;
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn replace_tags(&mut self, person_id: &str, tags: &[String]) -> RepoResult<Person> {
        let tags = dedupe_trimmed(tags);

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if entity_kind_of(&tx, person_id)? != Some(EntityKind::Person) {
            return Err(RepoError::NotFound(person_id.to_string()));
        }

        tx.execute("DELETE FROM entity_tags WHERE entity_id = ?1;", [person_id])?;
        for tag in &tags {
            tx.execute(
                "INSERT INTO entity_tags (entity_id, tag) VALUES (?1, ?2);",
                params![person_id, tag],
            )?;
        }
        touch_entity(&tx, person_id)?;
        tx.commit()?;

        expect_person(load_entity(self.conn, person_id)?, person_id)
    }

    fn delete(&mut self, id: &str, force: bool) -> RepoResult<DeleteOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let kind =
            entity_kind_of(&tx, id)?.ok_or_else(|| RepoError::NotFound(id.to_string()))?;

        let member_count = match kind {
            EntityKind::Team => count(&tx, "SELECT COUNT(*) FROM person_teams WHERE team_id = ?1;", id)?,
            EntityKind::Person => 0,
        };
        let mapping_count = count(&tx, "SELECT COUNT(*) FROM mappings WHERE entity_id = ?1;", id)?;
        let memory_count = count(
            &tx,
            "SELECT COUNT(*) FROM memory_entries WHERE entity_id = ?1;",
            id,
        )?;

        if !force && member_count + mapping_count + memory_count > 0 {
            return Err(RepoError::ReferentialIntegrity {
                id: id.to_string(),
                member_count,
                mapping_count,
                memory_count,
            });
        }

        let removed_team_links = tx.execute(
            "DELETE FROM person_teams WHERE person_id = ?1 OR team_id = ?1;",
            [id],
        )?;
        let removed_mappings = tx.execute("DELETE FROM mappings WHERE entity_id = ?1;", [id])?;
        let removed_memory_entries =
            tx.execute("DELETE FROM memory_entries WHERE entity_id = ?1;", [id])?;
        tx.execute("DELETE FROM entity_tags WHERE entity_id = ?1;", [id])?;
        tx.execute("DELETE FROM entity_patterns WHERE entity_id = ?1;", [id])?;
        tx.execute("DELETE FROM entities WHERE id = ?1;", [id])?;

        tx.commit()?;
        log::info!(
            "event=entity_delete module=repo status=ok id={id} force={force} \
             removed_mappings={removed_mappings} removed_memory={removed_memory_entries}"
        );

        Ok(DeleteOutcome {
            id: id.to_string(),
            kind,
            removed_team_links,
            removed_mappings,
            removed_memory_entries,
        })
    }
}

/// Resolves the identifier for a new entity inside the flat namespace.
///
/// Explicit ids fail on collision; derived ids disambiguate with a
/// deterministic numeric suffix (`jane-doe`, `jane-doe-2`, ...).
fn resolve_new_entity_id(
    conn: &Connection,
    explicit: Option<&str>,
    name: &str,
) -> RepoResult<String> {
    if let Some(id) = explicit {
        validate_id(id)?;
        if entity_kind_of(conn, id)?.is_some() {
            return Err(RepoError::DuplicateId(id.to_string()));
        }
        return Ok(id.to_string());
    }

    let base = slugify(name).ok_or_else(|| ValidationError::InvalidId(name.to_string()))?;
    if entity_kind_of(conn, &base)?.is_none() {
        return Ok(base);
    }
    let mut suffix = 2u32;
    loop {
        let candidate = format!("{base}-{suffix}");
        if entity_kind_of(conn, &candidate)?.is_none() {
            return Ok(candidate);
        }
        suffix += 1;
    }
}

/// Creates one mapping per declared pattern, inheriting the entity's
/// document reference. Runs inside the caller's transaction so a
/// collision rolls back the whole entity creation.
fn seed_mappings(
    conn: &Connection,
    entity_id: &str,
    kind: EntityKind,
    patterns: &[String],
    doc_ref: Option<&str>,
) -> RepoResult<usize> {
    let mut created = 0usize;
    for pattern in patterns {
        let mapping_id =
            slugify(pattern).ok_or_else(|| ValidationError::InvalidId(pattern.clone()))?;
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM mappings WHERE id = ?1);",
            [mapping_id.as_str()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            return Err(RepoError::DuplicateId(mapping_id));
        }
        conn.execute(
            "INSERT INTO mappings (id, pattern, entity_id, entity_kind, doc_ref)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![mapping_id, pattern, entity_id, kind.as_str(), doc_ref],
        )?;
        created += 1;
    }
    Ok(created)
}

fn insert_patterns(conn: &Connection, entity_id: &str, patterns: &[String]) -> RepoResult<()> {
    for (position, pattern) in patterns.iter().enumerate() {
        conn.execute(
            "INSERT INTO entity_patterns (entity_id, position, pattern) VALUES (?1, ?2, ?3);",
            params![entity_id, position as i64, pattern],
        )?;
    }
    Ok(())
}

pub(crate) fn entity_kind_of(conn: &Connection, id: &str) -> RepoResult<Option<EntityKind>> {
    let kind: Option<String> = conn
        .query_row("SELECT kind FROM entities WHERE id = ?1;", [id], |row| {
            row.get(0)
        })
        .optional()?;
    match kind {
        None => Ok(None),
        Some(value) => EntityKind::parse(&value)
            .map(Some)
            .ok_or_else(|| RepoError::InvalidData(format!("invalid entity kind `{value}`"))),
    }
}

/// Loads one entity with its memberships, tags and patterns hydrated.
pub(crate) fn load_entity(conn: &Connection, id: &str) -> RepoResult<Option<Entity>> {
    let row = conn
        .query_row(
            "SELECT id, kind, name, role, team_type, doc_ref FROM entities WHERE id = ?1;",
            [id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((id, kind_text, name, role, team_type, doc_ref)) = row else {
        return Ok(None);
    };
    let kind = EntityKind::parse(&kind_text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid entity kind `{kind_text}`")))?;
    let calendar_patterns = patterns_for(conn, &id)?;

    Ok(Some(match kind {
        EntityKind::Person => Entity::Person(Person {
            team_ids: team_ids_for(conn, &id)?,
            tags: tags_for(conn, &id)?,
            id,
            name,
            role,
            calendar_patterns,
            doc_ref,
        }),
        EntityKind::Team => Entity::Team(Team {
            id,
            name,
            team_type,
            calendar_patterns,
            doc_ref,
        }),
    }))
}

fn team_ids_for(conn: &Connection, person_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT team_id FROM person_teams WHERE person_id = ?1 ORDER BY position ASC;",
    )?;
    let ids = stmt
        .query_map([person_id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(ids)
}

fn tags_for(conn: &Connection, entity_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT tag FROM entity_tags WHERE entity_id = ?1 ORDER BY tag ASC;")?;
    let tags = stmt
        .query_map([entity_id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(tags)
}

fn patterns_for(conn: &Connection, entity_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT pattern FROM entity_patterns WHERE entity_id = ?1 ORDER BY position ASC;",
    )?;
    let patterns = stmt
        .query_map([entity_id], |row| row.get(0))?
        .collect::<Result<_, _>>()?;
    Ok(patterns)
}

fn touch_entity(conn: &Connection, id: &str) -> RepoResult<()> {
    conn.execute(
        "UPDATE entities SET updated_at = (strftime('%s', 'now') * 1000) WHERE id = ?1;",
        [id],
    )?;
    Ok(())
}

fn count(conn: &Connection, sql: &str, id: &str) -> RepoResult<usize> {
    let value: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(value as usize)
}

fn expect_person(entity: Option<Entity>, id: &str) -> RepoResult<Person> {
    match entity {
        Some(Entity::Person(person)) => Ok(person),
        _ => Err(RepoError::NotFound(id.to_string())),
    }
}

fn expect_team(entity: Option<Entity>, id: &str) -> RepoResult<Team> {
    match entity {
        Some(Entity::Team(team)) => Ok(team),
        _ => Err(RepoError::NotFound(id.to_string())),
    }
}

fn non_empty_tag(tag: &str) -> RepoResult<&str> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidArgument("tag cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Trims, drops empties and collapses duplicates while preserving the
/// caller's declaration order.
fn dedupe_trimmed(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            out.push(trimmed.to_string());
        }
    }
    out
}
