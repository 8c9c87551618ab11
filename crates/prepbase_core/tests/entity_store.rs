use prepbase_core::db::open_db_in_memory;
use prepbase_core::{
    Entity, EntityKind, EntityRepository, MappingRepository, NewMemoryEntry, NewPerson, NewTeam,
    PersonUpdate, RepoError, SqliteEntityRepository, SqliteMappingRepository,
    SqliteMemoryRepository, TeamUpdate, ValidationError,
};
use prepbase_core::repo::MemoryRepository;
use chrono::NaiveDate;

fn new_team(id: &str, name: &str) -> NewTeam {
    NewTeam {
        id: Some(id.to_string()),
        name: name.to_string(),
        ..NewTeam::default()
    }
}

fn entity_count(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM entities;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_person_round_trips_with_memberships_and_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("platform", "Platform")).unwrap();
    let created = repo
        .add_person(&NewPerson {
            name: "Jane Doe".to_string(),
            role: Some("EM".to_string()),
            team_ids: vec![
                "platform".to_string(),
                " platform ".to_string(), // duplicate after trim
            ],
            tags: vec!["mentor".to_string(), "mentor".to_string()],
            ..NewPerson::default()
        })
        .unwrap();

    assert_eq!(created.person.id, "jane-doe");
    assert_eq!(created.person.team_ids, vec!["platform".to_string()]);
    assert_eq!(created.person.tags, vec!["mentor".to_string()]);

    let loaded = repo.get("jane-doe").unwrap();
    match loaded {
        Entity::Person(person) => {
            assert_eq!(person.name, "Jane Doe");
            assert_eq!(person.role.as_deref(), Some("EM"));
            assert_eq!(person.team_ids, vec!["platform".to_string()]);
        }
        other => panic!("expected a person, got {other:?}"),
    }
}

#[test]
fn add_person_with_unknown_team_fails_and_leaves_store_unchanged() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();
        let err = repo
            .add_person(&NewPerson {
                name: "Jane Doe".to_string(),
                team_ids: vec!["ghost-team".to_string()],
                ..NewPerson::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::UnknownTeam(id)) if id == "ghost-team"
        ));
    }
    assert_eq!(entity_count(&conn), 0);
}

#[test]
fn a_person_cannot_join_a_person() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_person(&NewPerson {
        name: "John".to_string(),
        ..NewPerson::default()
    })
    .unwrap();

    let err = repo
        .add_person(&NewPerson {
            name: "Jane".to_string(),
            team_ids: vec!["john".to_string()],
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UnknownTeam(_))
    ));
}

#[test]
fn derived_ids_disambiguate_and_explicit_duplicates_fail() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    let first = repo
        .add_person(&NewPerson {
            name: "John Smith".to_string(),
            ..NewPerson::default()
        })
        .unwrap();
    let second = repo
        .add_person(&NewPerson {
            name: "John Smith".to_string(),
            ..NewPerson::default()
        })
        .unwrap();
    assert_eq!(first.person.id, "john-smith");
    assert_eq!(second.person.id, "john-smith-2");

    let err = repo
        .add_person(&NewPerson {
            id: Some("john-smith".to_string()),
            name: "Another John".to_string(),
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(id) if id == "john-smith"));
}

#[test]
fn ids_are_unique_across_people_and_teams() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("apollo", "Apollo")).unwrap();
    let err = repo
        .add_person(&NewPerson {
            id: Some("apollo".to_string()),
            name: "Apollo".to_string(),
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateId(_)));
}

#[test]
fn empty_or_unusable_names_are_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    let empty = repo
        .add_person(&NewPerson {
            name: "   ".to_string(),
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(
        empty,
        RepoError::Validation(ValidationError::EmptyName)
    ));

    let unusable = repo
        .add_person(&NewPerson {
            name: "!!!".to_string(),
            ..NewPerson::default()
        })
        .unwrap_err();
    assert!(matches!(
        unusable,
        RepoError::Validation(ValidationError::InvalidId(_))
    ));
}

#[test]
fn creation_auto_seeds_one_mapping_per_pattern() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();
        let created = repo
            .add_person(&NewPerson {
                name: "John".to_string(),
                calendar_patterns: vec!["1:1 John".to_string(), "John sync".to_string()],
                doc_ref: Some("doc-john".to_string()),
                ..NewPerson::default()
            })
            .unwrap();
        assert_eq!(created.mappings_created, 2);
    }

    let mappings = SqliteMappingRepository::try_new(&conn).unwrap();
    let seeded = mappings.find_by_entity("john").unwrap();
    assert_eq!(seeded.len(), 2);
    for mapping in &seeded {
        assert_eq!(mapping.entity_id, "john");
        assert_eq!(mapping.entity_kind, EntityKind::Person);
        assert_eq!(mapping.doc_ref.as_deref(), Some("doc-john"));
    }
}

#[test]
fn seeded_mapping_collision_rolls_back_the_whole_creation() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();
        repo.add_team(&NewTeam {
            id: Some("platform".to_string()),
            name: "Platform".to_string(),
            calendar_patterns: vec!["Weekly Sync".to_string()],
            ..NewTeam::default()
        })
        .unwrap();

        let err = repo
            .add_person(&NewPerson {
                name: "Jane".to_string(),
                calendar_patterns: vec!["weekly sync".to_string()], // same slug
                ..NewPerson::default()
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateId(id) if id == "weekly-sync"));
    }
    assert_eq!(entity_count(&conn), 1);
}

#[test]
fn list_filters_by_kind_and_orders_by_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("zeta", "Zeta")).unwrap();
    repo.add_team(&new_team("alpha", "Alpha")).unwrap();
    repo.add_person(&NewPerson {
        name: "Mia".to_string(),
        ..NewPerson::default()
    })
    .unwrap();

    let all: Vec<String> = repo
        .list(None)
        .unwrap()
        .iter()
        .map(|entity| entity.id().to_string())
        .collect();
    assert_eq!(all, vec!["alpha", "mia", "zeta"]);

    let teams = repo.list(Some(EntityKind::Team)).unwrap();
    assert_eq!(teams.len(), 2);
    assert!(teams.iter().all(|entity| entity.kind() == EntityKind::Team));
}

#[test]
fn team_members_lists_people_in_id_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("platform", "Platform")).unwrap();
    for name in ["Zoe", "Adam"] {
        repo.add_person(&NewPerson {
            name: name.to_string(),
            team_ids: vec!["platform".to_string()],
            ..NewPerson::default()
        })
        .unwrap();
    }

    let members: Vec<String> = repo
        .team_members("platform")
        .unwrap()
        .into_iter()
        .map(|person| person.id)
        .collect();
    assert_eq!(members, vec!["adam", "zoe"]);
}

#[test]
fn partial_updates_change_only_the_given_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        role: Some("IC".to_string()),
        ..NewPerson::default()
    })
    .unwrap();

    let updated = repo
        .update_person(
            "jane",
            &PersonUpdate {
                role: Some("Staff".to_string()),
                ..PersonUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Jane");
    assert_eq!(updated.role.as_deref(), Some("Staff"));

    let err = repo
        .update_team("jane", &TeamUpdate::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn team_membership_mutation_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("platform", "Platform")).unwrap();
    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        ..NewPerson::default()
    })
    .unwrap();

    let once = repo.add_team_to_person("jane", "platform").unwrap();
    let twice = repo.add_team_to_person("jane", "platform").unwrap();
    assert_eq!(once.team_ids, twice.team_ids);

    let removed = repo.remove_team_from_person("jane", "platform").unwrap();
    assert!(removed.team_ids.is_empty());
    // Removing an absent membership is a no-op, not an error.
    let removed_again = repo.remove_team_from_person("jane", "platform").unwrap();
    assert!(removed_again.team_ids.is_empty());
}

#[test]
fn adding_an_unknown_team_to_a_person_fails() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        ..NewPerson::default()
    })
    .unwrap();

    let err = repo.add_team_to_person("jane", "ghost").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UnknownTeam(_))
    ));
}

#[test]
fn replace_teams_preserves_declaration_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    for (id, name) in [("alpha", "Alpha"), ("beta", "Beta")] {
        repo.add_team(&new_team(id, name)).unwrap();
    }
    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        team_ids: vec!["alpha".to_string()],
        ..NewPerson::default()
    })
    .unwrap();

    let replaced = repo
        .replace_teams("jane", &["beta".to_string(), "alpha".to_string()])
        .unwrap();
    assert_eq!(replaced.team_ids, vec!["beta", "alpha"]);
}

#[test]
fn tag_mutation_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        ..NewPerson::default()
    })
    .unwrap();

    repo.add_tag("jane", "mentor").unwrap();
    let person = repo.add_tag("jane", "mentor").unwrap();
    assert_eq!(person.tags, vec!["mentor"]);

    let cleared = repo.remove_tag("jane", "mentor").unwrap();
    assert!(cleared.tags.is_empty());
    let cleared_again = repo.remove_tag("jane", "mentor").unwrap();
    assert!(cleared_again.tags.is_empty());
}

#[test]
fn delete_with_dependents_requires_force() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();

    repo.add_team(&new_team("platform", "Platform")).unwrap();
    repo.add_person(&NewPerson {
        name: "Jane".to_string(),
        team_ids: vec!["platform".to_string()],
        ..NewPerson::default()
    })
    .unwrap();

    let err = repo.delete("platform", false).unwrap_err();
    match err {
        RepoError::ReferentialIntegrity {
            id, member_count, ..
        } => {
            assert_eq!(id, "platform");
            assert_eq!(member_count, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    let outcome = repo.delete("platform", true).unwrap();
    assert_eq!(outcome.removed_team_links, 1);

    // The dependent person survives with the membership dropped.
    match repo.get("jane").unwrap() {
        Entity::Person(person) => assert!(person.team_ids.is_empty()),
        other => panic!("expected a person, got {other:?}"),
    }
    let err = repo.get("platform").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "platform"));
}

#[test]
fn force_delete_cascades_mappings_and_memory() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();
        repo.add_person(&NewPerson {
            name: "John".to_string(),
            calendar_patterns: vec!["1:1 John".to_string()],
            ..NewPerson::default()
        })
        .unwrap();
    }
    {
        let memory = SqliteMemoryRepository::try_new(&conn).unwrap();
        memory
            .append(&NewMemoryEntry::observation(
                "john",
                EntityKind::Person,
                NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
                "prefers async updates",
            ))
            .unwrap();
    }

    let mut repo = SqliteEntityRepository::try_new(&mut conn).unwrap();
    let err = repo.delete("john", false).unwrap_err();
    assert!(matches!(err, RepoError::ReferentialIntegrity { .. }));

    let outcome = repo.delete("john", true).unwrap();
    assert_eq!(outcome.removed_mappings, 1);
    assert_eq!(outcome.removed_memory_entries, 1);
    drop(repo);

    let mappings = SqliteMappingRepository::try_new(&conn).unwrap();
    assert!(mappings.find_by_entity("john").unwrap().is_empty());
    let memory = SqliteMemoryRepository::try_new(&conn).unwrap();
    assert!(memory.list_for("john").unwrap().is_empty());
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteEntityRepository::try_new(&mut conn).unwrap_err();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
}
