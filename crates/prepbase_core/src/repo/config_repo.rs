//! Global configuration store.
//!
//! # Responsibility
//! - Persist the small set of workspace-level settings as key-value
//!   records.
//!
//! # Invariants
//! - Only keys in [`CONFIG_KEYS`] are accepted; unknown keys fail
//!   with `InvalidArgument` before any write.

use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Keys accepted by `set`.
pub const CONFIG_KEYS: &[&str] = &["default_team", "doc_workspace"];

/// Typed view over the config table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default team id suggested for new people.
    pub default_team: Option<String>,
    /// Default external document workspace.
    pub doc_workspace: Option<String>,
}

/// Store interface for configuration.
pub trait ConfigRepository {
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn load(&self) -> RepoResult<Config>;
}

/// SQLite-backed configuration store.
pub struct SqliteConfigRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteConfigRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["config"])?;
        Ok(Self { conn })
    }
}

impl ConfigRepository for SqliteConfigRepository<'_> {
    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        if !CONFIG_KEYS.contains(&key) {
            return Err(RepoError::InvalidArgument(format!(
                "unknown config key `{key}`; valid keys: {}",
                CONFIG_KEYS.join(", ")
            )));
        }
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM config WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn load(&self) -> RepoResult<Config> {
        Ok(Config {
            default_team: self.get("default_team")?,
            doc_workspace: self.get("doc_workspace")?,
        })
    }
}
