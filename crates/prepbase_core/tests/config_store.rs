use prepbase_core::db::open_db_in_memory;
use prepbase_core::{Config, ConfigRepository, RepoError, SqliteConfigRepository};

#[test]
fn set_get_and_load_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteConfigRepository::try_new(&conn).unwrap();

    assert_eq!(repo.load().unwrap(), Config::default());

    repo.set("default_team", "platform").unwrap();
    repo.set("doc_workspace", "acme-notes").unwrap();
    repo.set("default_team", "infra").unwrap(); // overwrite

    assert_eq!(repo.get("default_team").unwrap().as_deref(), Some("infra"));
    let config = repo.load().unwrap();
    assert_eq!(config.default_team.as_deref(), Some("infra"));
    assert_eq!(config.doc_workspace.as_deref(), Some("acme-notes"));
}

#[test]
fn unknown_keys_are_rejected_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteConfigRepository::try_new(&conn).unwrap();

    let err = repo.set("notion_token", "secret").unwrap_err();
    assert!(matches!(err, RepoError::InvalidArgument(_)));
    assert_eq!(repo.load().unwrap(), Config::default());
}
