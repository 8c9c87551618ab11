//! Control-plane CLI over the knowledge base.
//!
//! # Responsibility
//! - Translate shell commands into store operations and store errors
//!   into user-facing text and exit codes.

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use prepbase_core::{
    Entity, EntityKind, EntityRepository, EntrySource, EntryType, MappingRepository,
    MemoryRepository, NewMapping, NewMemoryEntry, NewPerson, NewTeam, PersonUpdate,
    SqliteConfigRepository, SqliteEntityRepository, SqliteMappingRepository,
    SqliteMemoryRepository, TeamUpdate,
};
use prepbase_core::repo::ConfigRepository;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "prepbase.db";

#[derive(Parser, Debug)]
#[command(name = "prepbase", version, about = "Personal meeting-prep knowledge base")]
struct Cli {
    /// Data directory (default: $PREPBASE_DATA_DIR, then
    /// $XDG_DATA_HOME/prepbase, then ~/.local/share/prepbase)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage people
    #[command(subcommand)]
    Person(PersonCommands),
    /// Manage teams
    #[command(subcommand)]
    Team(TeamCommands),
    /// Inspect the combined person + team namespace
    #[command(subcommand)]
    Entity(EntityCommands),
    /// Manage calendar-pattern mappings
    #[command(subcommand)]
    Map(MapCommands),
    /// Record a dated observation about an entity
    Remember {
        /// Target person or team id
        entity_id: String,
        /// Observation text
        body: String,
        /// Entry date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Entry type: observation, note, inference
        #[arg(long, default_value = "observation")]
        kind: String,
        /// Optional context, e.g. the meeting it came from
        #[arg(long)]
        context: Option<String>,
    },
    /// Browse and search memory entries
    #[command(subcommand)]
    Memory(MemoryCommands),
    /// Workspace-level settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum PersonCommands {
    /// Add a person (id derived from the name unless --id is given)
    Add {
        name: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Team ids, repeatable
        #[arg(long = "team")]
        teams: Vec<String>,
        /// Free-form tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Calendar patterns, repeatable; each seeds a mapping
        #[arg(long = "pattern")]
        patterns: Vec<String>,
        #[arg(long)]
        doc_ref: Option<String>,
    },
    /// Update name/role/doc-ref; omitted fields stay unchanged
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        doc_ref: Option<String>,
    },
    /// Add a team membership (idempotent)
    Join { id: String, team_id: String },
    /// Remove a team membership (no-op when absent)
    Leave { id: String, team_id: String },
    /// Add a tag (idempotent)
    Tag { id: String, tag: String },
    /// Remove a tag (no-op when absent)
    Untag { id: String, tag: String },
}

#[derive(Subcommand, Debug)]
enum TeamCommands {
    /// Add a team (id derived from the name unless --id is given)
    Add {
        name: String,
        #[arg(long)]
        id: Option<String>,
        /// Free-form category, e.g. engineering
        #[arg(long = "type")]
        team_type: Option<String>,
        /// Calendar patterns, repeatable; each seeds a mapping
        #[arg(long = "pattern")]
        patterns: Vec<String>,
        #[arg(long)]
        doc_ref: Option<String>,
    },
    /// Update name/type/doc-ref; omitted fields stay unchanged
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        team_type: Option<String>,
        #[arg(long)]
        doc_ref: Option<String>,
    },
    /// List people belonging to a team
    Members { id: String },
}

#[derive(Subcommand, Debug)]
enum EntityCommands {
    /// List all entities, optionally one kind
    List {
        /// person or team
        #[arg(long)]
        kind: Option<String>,
    },
    /// Show one entity with memberships, tags and patterns
    Show { id: String },
    /// Delete an entity; refuses while dependents exist unless --force
    Delete {
        id: String,
        /// Cascade memberships, mappings and memory entries
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MapCommands {
    /// Map a calendar pattern to an entity
    Add {
        pattern: String,
        entity_id: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        doc_ref: Option<String>,
    },
    /// List mappings, optionally for one entity
    List {
        #[arg(long)]
        entity: Option<String>,
    },
    /// Delete a mapping by id
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum MemoryCommands {
    /// Show all entries for one entity, oldest first
    Show { entity_id: String },
    /// Search entries across all entities, most recent first
    Search { keyword: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Set a setting: default_team or doc_workspace
    Set { key: String, value: String },
    /// Print all settings
    Show,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("cannot create data directory {}", data_dir.display()))?;

    let log_dir = data_dir.join("logs");
    if let Err(err) = prepbase_core::init_logging(
        prepbase_core::default_log_level(),
        &log_dir.to_string_lossy(),
    ) {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut conn = prepbase_core::open_db(data_dir.join(DB_FILE_NAME))
        .with_context(|| format!("cannot open database in {}", data_dir.display()))?;

    match cli.command {
        Commands::Person(cmd) => run_person(&mut conn, cmd),
        Commands::Team(cmd) => run_team(&mut conn, cmd),
        Commands::Entity(cmd) => run_entity(&mut conn, cmd),
        Commands::Map(cmd) => run_map(&conn, cmd),
        Commands::Remember {
            entity_id,
            body,
            date,
            kind,
            context,
        } => run_remember(&mut conn, entity_id, body, date, kind, context),
        Commands::Memory(cmd) => run_memory(&conn, cmd),
        Commands::Config(cmd) => run_config(&conn, cmd),
    }
}

/// Resolution order: flag, `PREPBASE_DATA_DIR`, `XDG_DATA_HOME`,
/// `~/.local/share`.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var("PREPBASE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir).join("prepbase"));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set; pass --data-dir")?;
    Ok(PathBuf::from(home).join(".local/share/prepbase"))
}

fn run_person(conn: &mut rusqlite::Connection, cmd: PersonCommands) -> Result<()> {
    let mut repo = SqliteEntityRepository::try_new(conn)?;
    match cmd {
        PersonCommands::Add {
            name,
            id,
            role,
            teams,
            tags,
            patterns,
            doc_ref,
        } => {
            let created = repo.add_person(&NewPerson {
                id,
                name,
                role,
                team_ids: teams,
                tags,
                calendar_patterns: patterns,
                doc_ref,
            })?;
            println!("Added person: {}", created.person.id);
            if created.mappings_created > 0 {
                println!("Seeded {} mapping(s)", created.mappings_created);
            }
        }
        PersonCommands::Update {
            id,
            name,
            role,
            doc_ref,
        } => {
            let person = repo.update_person(&id, &PersonUpdate { name, role, doc_ref })?;
            println!("Updated person: {}", person.id);
        }
        PersonCommands::Join { id, team_id } => {
            let person = repo.add_team_to_person(&id, &team_id)?;
            println!("{} teams: {}", person.id, person.team_ids.join(", "));
        }
        PersonCommands::Leave { id, team_id } => {
            let person = repo.remove_team_from_person(&id, &team_id)?;
            println!("{} teams: {}", person.id, person.team_ids.join(", "));
        }
        PersonCommands::Tag { id, tag } => {
            let person = repo.add_tag(&id, &tag)?;
            println!("{} tags: {}", person.id, person.tags.join(", "));
        }
        PersonCommands::Untag { id, tag } => {
            let person = repo.remove_tag(&id, &tag)?;
            println!("{} tags: {}", person.id, person.tags.join(", "));
        }
    }
    Ok(())
}

fn run_team(conn: &mut rusqlite::Connection, cmd: TeamCommands) -> Result<()> {
    let mut repo = SqliteEntityRepository::try_new(conn)?;
    match cmd {
        TeamCommands::Add {
            name,
            id,
            team_type,
            patterns,
            doc_ref,
        } => {
            let created = repo.add_team(&NewTeam {
                id,
                name,
                team_type,
                calendar_patterns: patterns,
                doc_ref,
            })?;
            println!("Added team: {}", created.team.id);
            if created.mappings_created > 0 {
                println!("Seeded {} mapping(s)", created.mappings_created);
            }
        }
        TeamCommands::Update {
            id,
            name,
            team_type,
            doc_ref,
        } => {
            let team = repo.update_team(
                &id,
                &TeamUpdate {
                    name,
                    team_type,
                    doc_ref,
                },
            )?;
            println!("Updated team: {}", team.id);
        }
        TeamCommands::Members { id } => {
            let members = repo.team_members(&id)?;
            if members.is_empty() {
                println!("No members in {id}.");
                return Ok(());
            }
            for person in members {
                let role = person.role.as_deref().unwrap_or("-");
                println!("  {} ({}) {}", person.id, role, person.name);
            }
        }
    }
    Ok(())
}

fn run_entity(conn: &mut rusqlite::Connection, cmd: EntityCommands) -> Result<()> {
    let mut repo = SqliteEntityRepository::try_new(conn)?;
    match cmd {
        EntityCommands::List { kind } => {
            let kind = match kind.as_deref() {
                None => None,
                Some(text) => Some(
                    EntityKind::parse(text)
                        .ok_or_else(|| anyhow!("unknown kind `{text}`; expected person|team"))?,
                ),
            };
            let entities = repo.list(kind)?;
            if entities.is_empty() {
                println!("No entities found.");
                return Ok(());
            }
            for entity in entities {
                println!("  [{}] {}: {}", entity.kind().as_str(), entity.id(), entity.name());
            }
        }
        EntityCommands::Show { id } => print_entity(&repo.get(&id)?),
        EntityCommands::Delete { id, force } => {
            let outcome = repo.delete(&id, force)?;
            println!("Deleted {} `{}`", outcome.kind.as_str(), outcome.id);
            if outcome.removed_team_links + outcome.removed_mappings + outcome.removed_memory_entries
                > 0
            {
                println!(
                    "Cascaded: {} membership(s), {} mapping(s), {} memory entr(ies)",
                    outcome.removed_team_links,
                    outcome.removed_mappings,
                    outcome.removed_memory_entries
                );
            }
        }
    }
    Ok(())
}

fn print_entity(entity: &Entity) {
    println!("Id:       {}", entity.id());
    println!("Kind:     {}", entity.kind().as_str());
    println!("Name:     {}", entity.name());
    match entity {
        Entity::Person(person) => {
            if let Some(role) = &person.role {
                println!("Role:     {role}");
            }
            if !person.team_ids.is_empty() {
                println!("Teams:    {}", person.team_ids.join(", "));
            }
            if !person.tags.is_empty() {
                println!("Tags:     {}", person.tags.join(", "));
            }
        }
        Entity::Team(team) => {
            if let Some(team_type) = &team.team_type {
                println!("Type:     {team_type}");
            }
        }
    }
    if !entity.calendar_patterns().is_empty() {
        println!("Patterns: {}", entity.calendar_patterns().join(", "));
    }
    if let Some(doc_ref) = entity.doc_ref() {
        println!("Doc:      {doc_ref}");
    }
}

fn run_map(conn: &rusqlite::Connection, cmd: MapCommands) -> Result<()> {
    let repo = SqliteMappingRepository::try_new(conn)?;
    match cmd {
        MapCommands::Add {
            pattern,
            entity_id,
            id,
            doc_ref,
        } => {
            let mapping = repo.add(&NewMapping {
                id,
                pattern,
                entity_id,
                doc_ref,
            })?;
            println!("Added mapping: {} -> {}", mapping.id, mapping.entity_id);
        }
        MapCommands::List { entity } => {
            let mappings = match entity {
                Some(entity_id) => repo.find_by_entity(&entity_id)?,
                None => repo.list()?,
            };
            if mappings.is_empty() {
                println!("No mappings found.");
                return Ok(());
            }
            for mapping in mappings {
                println!(
                    "  {}: \"{}\" -> {} ({})",
                    mapping.id,
                    mapping.pattern,
                    mapping.entity_id,
                    mapping.entity_kind.as_str()
                );
            }
        }
        MapCommands::Delete { id } => {
            repo.delete(&id)?;
            println!("Deleted mapping: {id}");
        }
    }
    Ok(())
}

fn run_remember(
    conn: &mut rusqlite::Connection,
    entity_id: String,
    body: String,
    date: Option<String>,
    kind: String,
    context: Option<String>,
) -> Result<()> {
    // The store allows orphan appends; the control plane does not.
    let entity = {
        let repo = SqliteEntityRepository::try_new(conn)?;
        repo.get(&entity_id)?
    };

    let entry_date = match date {
        Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .with_context(|| format!("invalid date `{text}`; expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };
    let entry_type = parse_entry_type(&kind)?;

    let repo = SqliteMemoryRepository::try_new(conn)?;
    let entry = repo.append(&NewMemoryEntry {
        entity_id: entity.id().to_string(),
        entity_kind: entity.kind(),
        entry_date,
        entry_type,
        source: EntrySource::User,
        body,
        context,
    })?;
    println!(
        "Remembered for {} on {} ({})",
        entry.entity_id,
        entry.entry_date,
        entry.entry_type.as_str()
    );
    Ok(())
}

fn parse_entry_type(text: &str) -> Result<EntryType> {
    EntryType::parse(&text.trim().to_lowercase())
        .ok_or_else(|| anyhow!("unknown entry type `{text}`; expected observation|note|inference"))
}

fn run_memory(conn: &rusqlite::Connection, cmd: MemoryCommands) -> Result<()> {
    let repo = SqliteMemoryRepository::try_new(conn)?;
    match cmd {
        MemoryCommands::Show { entity_id } => {
            let entries = repo.list_for(&entity_id)?;
            if entries.is_empty() {
                println!("No memory entries for {entity_id}.");
                return Ok(());
            }
            for entry in entries {
                print_entry(&entry.entry_date.to_string(), &entry.entry_type, &entry.body, entry.context.as_deref());
            }
        }
        MemoryCommands::Search { keyword } => {
            let hits = repo.search(&keyword)?;
            if hits.is_empty() {
                println!("No matches for \"{keyword}\".");
                return Ok(());
            }
            println!("{} match(es):", hits.len());
            for hit in hits {
                println!("  {}:", hit.entity_id);
                print_entry(
                    &hit.entry.entry_date.to_string(),
                    &hit.entry.entry_type,
                    &hit.entry.body,
                    hit.entry.context.as_deref(),
                );
            }
        }
    }
    Ok(())
}

fn print_entry(date: &str, entry_type: &EntryType, body: &str, context: Option<&str>) {
    match context {
        Some(context) => println!("  {date} [{}] {body} ({context})", entry_type.as_str()),
        None => println!("  {date} [{}] {body}", entry_type.as_str()),
    }
}

fn run_config(conn: &rusqlite::Connection, cmd: ConfigCommands) -> Result<()> {
    let repo = SqliteConfigRepository::try_new(conn)?;
    match cmd {
        ConfigCommands::Set { key, value } => {
            repo.set(&key, &value)?;
            println!("Set {key}");
        }
        ConfigCommands::Show => {
            let config = repo.load()?;
            println!("default_team:  {}", config.default_team.as_deref().unwrap_or("-"));
            println!("doc_workspace: {}", config.doc_workspace.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}
