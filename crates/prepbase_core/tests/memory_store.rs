use chrono::NaiveDate;
use prepbase_core::db::open_db_in_memory;
use prepbase_core::{
    EntityKind, EntityRepository, EntrySource, EntryType, MemoryRepository, NewMemoryEntry,
    NewPerson, RepoError, SqliteEntityRepository, SqliteMemoryRepository,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_person(conn: &mut rusqlite::Connection, name: &str) -> String {
    let mut repo = SqliteEntityRepository::try_new(conn).unwrap();
    repo.add_person(&NewPerson {
        name: name.to_string(),
        ..NewPerson::default()
    })
    .unwrap()
    .person
    .id
}

#[test]
fn append_assigns_increasing_seq_within_the_identity_scope() {
    let mut conn = open_db_in_memory().unwrap();
    let person_id = seed_person(&mut conn, "Jane");

    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    let date = day(2026, 8, 20);
    let first = repo
        .append(&NewMemoryEntry::observation(
            &person_id,
            EntityKind::Person,
            date,
            "prefers async updates",
        ))
        .unwrap();
    let second = repo
        .append(&NewMemoryEntry::observation(
            &person_id,
            EntityKind::Person,
            date,
            "owns the migration plan",
        ))
        .unwrap();
    assert_eq!(first.seq, 1);
    assert_eq!(second.seq, 2);

    // A different entry type restarts its own seq scope.
    let note = repo
        .append(&NewMemoryEntry {
            entry_type: EntryType::Note,
            ..NewMemoryEntry::observation(&person_id, EntityKind::Person, date, "ping about OKRs")
        })
        .unwrap();
    assert_eq!(note.seq, 1);
}

#[test]
fn list_for_orders_by_date_then_insertion() {
    let mut conn = open_db_in_memory().unwrap();
    let person_id = seed_person(&mut conn, "Jane");

    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    for (date, body) in [
        (day(2026, 8, 22), "later entry"),
        (day(2026, 8, 20), "earliest entry"),
        (day(2026, 8, 22), "later entry, second"),
    ] {
        repo.append(&NewMemoryEntry::observation(
            &person_id,
            EntityKind::Person,
            date,
            body,
        ))
        .unwrap();
    }

    let bodies: Vec<String> = repo
        .list_for(&person_id)
        .unwrap()
        .into_iter()
        .map(|entry| entry.body)
        .collect();
    assert_eq!(
        bodies,
        vec!["earliest entry", "later entry", "later entry, second"]
    );
}

#[test]
fn search_is_case_insensitive_and_most_recent_first() {
    let mut conn = open_db_in_memory().unwrap();
    let jane = seed_person(&mut conn, "Jane");
    let john = seed_person(&mut conn, "John");

    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    repo.append(&NewMemoryEntry::observation(
        &jane,
        EntityKind::Person,
        day(2026, 8, 10),
        "started the ML pipeline rewrite",
    ))
    .unwrap();
    repo.append(&NewMemoryEntry::observation(
        &john,
        EntityKind::Person,
        day(2026, 8, 20),
        "asked about ml evaluation datasets",
    ))
    .unwrap();
    repo.append(&NewMemoryEntry::observation(
        &jane,
        EntityKind::Person,
        day(2026, 8, 15),
        "no match here",
    ))
    .unwrap();

    let hits = repo.search("ml").unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].entity_id, john);
    assert_eq!(hits[0].entry.entry_date, day(2026, 8, 20));
    assert_eq!(hits[1].entity_id, jane);
}

#[test]
fn search_also_covers_the_context_field() {
    let mut conn = open_db_in_memory().unwrap();
    let jane = seed_person(&mut conn, "Jane");

    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    repo.append(&NewMemoryEntry {
        context: Some("Quarterly Planning".to_string()),
        ..NewMemoryEntry::observation(&jane, EntityKind::Person, day(2026, 8, 12), "raised risks")
    })
    .unwrap();

    let hits = repo.search("planning").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].entry.context.as_deref(), Some("Quarterly Planning"));
}

#[test]
fn blank_search_keywords_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();

    for keyword in ["", "   "] {
        let err = repo.search(keyword).unwrap_err();
        assert!(matches!(err, RepoError::InvalidArgument(_)));
    }
}

#[test]
fn entries_survive_as_orphans_after_entity_deletion_plus_reappend() {
    let mut conn = open_db_in_memory().unwrap();
    let jane = seed_person(&mut conn, "Jane");
    {
        let mut entities = SqliteEntityRepository::try_new(&mut conn).unwrap();
        entities.delete(&jane, true).unwrap();
    }

    // Appends never validate the entity id; history may outlive it.
    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    let entry = repo
        .append(&NewMemoryEntry::observation(
            &jane,
            EntityKind::Person,
            day(2026, 8, 21),
            "left the company",
        ))
        .unwrap();
    assert_eq!(entry.source, EntrySource::User);
    assert_eq!(repo.list_for(&jane).unwrap().len(), 1);
}

#[test]
fn delete_for_removes_every_entry_for_one_entity() {
    let mut conn = open_db_in_memory().unwrap();
    let jane = seed_person(&mut conn, "Jane");
    let john = seed_person(&mut conn, "John");

    let repo = SqliteMemoryRepository::try_new(&conn).unwrap();
    for entity in [&jane, &jane, &john] {
        repo.append(&NewMemoryEntry::observation(
            entity,
            EntityKind::Person,
            day(2026, 8, 18),
            "entry",
        ))
        .unwrap();
    }

    assert_eq!(repo.delete_for(&jane).unwrap(), 2);
    assert!(repo.list_for(&jane).unwrap().is_empty());
    assert_eq!(repo.list_for(&john).unwrap().len(), 1);
}
