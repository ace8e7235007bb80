use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rpg_roster_core::{
    from_epoch_millis, to_epoch_millis, PlayerId, PlayerProfile, PlayerRecord, PlayerStore,
    Profession, Race, RosterError,
};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const LATEST_SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA_MIGRATIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
  version INTEGER PRIMARY KEY,
  applied_at TEXT NOT NULL
);
";

const MIGRATION_001_SQL: &str = r"
CREATE TABLE IF NOT EXISTS players (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL CHECK (length(name) BETWEEN 1 AND 12),
  title TEXT NOT NULL CHECK (length(title) <= 30),
  race TEXT NOT NULL CHECK (race IN ('HUMAN','DWARF','ELF','GIANT','ORC','TROLL','HOBBIT')),
  profession TEXT NOT NULL CHECK (profession IN ('WARRIOR','ROGUE','SORCERER','CLERIC','PALADIN','NAZGUL','WARLOCK','DRUID')),
  birthday_ms INTEGER NOT NULL,
  experience INTEGER NOT NULL CHECK (experience BETWEEN 0 AND 10000000),
  level INTEGER NOT NULL CHECK (level >= 0),
  until_next_level INTEGER NOT NULL CHECK (until_next_level > 0),
  banned INTEGER NOT NULL CHECK (banned IN (0, 1))
);

CREATE INDEX IF NOT EXISTS idx_players_birthday ON players(birthday_ms);
CREATE INDEX IF NOT EXISTS idx_players_experience ON players(experience);
";

const PLAYER_COLUMNS: &str =
    "id, name, title, race, profession, birthday_ms, experience, level, until_next_level, banned";

pub struct SqliteStore {
    conn: Connection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current_version: i64,
    pub target_version: i64,
    pub pending_versions: Vec<i64>,
}

impl SqliteStore {
    /// Open a SQLite-backed player store and configure required runtime pragmas.
    ///
    /// # Errors
    /// Returns an error when the database cannot be opened or pragmas cannot be applied.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite database at {}", path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to configure sqlite pragmas")?;

        Ok(Self { conn })
    }

    /// Report current and target schema versions plus pending migrations.
    ///
    /// # Errors
    /// Returns an error when schema metadata cannot be read or initialized.
    pub fn schema_status(&self) -> Result<SchemaStatus> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;
        let current_version = current_schema_version(&self.conn)?;
        let pending_versions = if current_version < LATEST_SCHEMA_VERSION {
            ((current_version + 1)..=LATEST_SCHEMA_VERSION).collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        Ok(SchemaStatus {
            current_version,
            target_version: LATEST_SCHEMA_VERSION,
            pending_versions,
        })
    }

    /// Apply all forward migrations up to the latest supported schema version.
    ///
    /// # Errors
    /// Returns an error when any migration step fails or the database is newer than
    /// this build understands.
    pub fn migrate(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_SCHEMA_MIGRATIONS_SQL)
            .context("failed to apply schema_migrations table")?;

        let version = current_schema_version(&self.conn)?;
        if version > LATEST_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported schema version {version}; expected at most {LATEST_SCHEMA_VERSION}"
            ));
        }

        if version < 1 {
            let tx = self.conn.transaction().context("failed to start migration v1 transaction")?;
            tx.execute_batch(MIGRATION_001_SQL).context("failed to apply migration v1")?;
            record_schema_version(&tx, 1)?;
            tx.commit().context("failed to commit migration v1")?;
        }

        Ok(())
    }

    /// Load every player in ascending id order.
    ///
    /// # Errors
    /// Returns an error when rows cannot be read or decoded from `SQLite`.
    pub fn list_players(&self) -> Result<Vec<PlayerRecord>> {
        let mut stmt =
            self.conn.prepare(&format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id ASC"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(read_player_row(row)?);
        }

        Ok(records)
    }

    /// # Errors
    /// Returns an error when the lookup or row decoding fails.
    pub fn get_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>> {
        let mut stmt =
            self.conn.prepare(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id.0])?;
        match rows.next()? {
            Some(row) => Ok(Some(read_player_row(row)?)),
            None => Ok(None),
        }
    }

    /// Persist one validated player. Without an id the database assigns the next one;
    /// with an id the row is inserted or overwritten in place.
    ///
    /// # Errors
    /// Returns an error when validation fails or the write transaction fails.
    pub fn save_player(
        &mut self,
        id: Option<PlayerId>,
        profile: &PlayerProfile,
    ) -> Result<PlayerRecord> {
        profile.validate().map_err(|err| anyhow!("player validation failed: {err}"))?;

        let tx = self.conn.transaction().context("failed to start transaction")?;
        let id = match id {
            None => {
                tx.execute(
                    "INSERT INTO players(
                        name, title, race, profession, birthday_ms,
                        experience, level, until_next_level, banned
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        profile.name,
                        profile.title,
                        profile.race.as_str(),
                        profile.profession.as_str(),
                        to_epoch_millis(profile.birthday),
                        profile.experience,
                        profile.level,
                        profile.until_next_level,
                        profile.banned,
                    ],
                )
                .context("failed to insert player")?;
                PlayerId(tx.last_insert_rowid())
            }
            Some(id) => {
                tx.execute(
                    "INSERT INTO players(
                        id, name, title, race, profession, birthday_ms,
                        experience, level, until_next_level, banned
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        title = excluded.title,
                        race = excluded.race,
                        profession = excluded.profession,
                        birthday_ms = excluded.birthday_ms,
                        experience = excluded.experience,
                        level = excluded.level,
                        until_next_level = excluded.until_next_level,
                        banned = excluded.banned",
                    params![
                        id.0,
                        profile.name,
                        profile.title,
                        profile.race.as_str(),
                        profile.profession.as_str(),
                        to_epoch_millis(profile.birthday),
                        profile.experience,
                        profile.level,
                        profile.until_next_level,
                        profile.banned,
                    ],
                )
                .with_context(|| format!("failed to upsert player {id}"))?;
                id
            }
        };
        tx.commit().context("failed to commit player write")?;

        Ok(PlayerRecord { id, profile: profile.clone() })
    }

    /// Remove one player. Returns whether a row was deleted.
    ///
    /// # Errors
    /// Returns an error when the delete statement fails.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM players WHERE id = ?1", params![id.0])
            .with_context(|| format!("failed to delete player {id}"))?;
        Ok(deleted > 0)
    }

    /// # Errors
    /// Returns an error when the count query fails.
    pub fn player_count(&self) -> Result<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get::<_, i64>(0))
            .context("failed to count players")?;
        usize::try_from(count).context("player count is negative")
    }
}

impl PlayerStore for SqliteStore {
    fn fetch_all(&self) -> Result<Vec<PlayerRecord>, RosterError> {
        self.list_players().map_err(store_error)
    }

    fn fetch_by_id(&self, id: PlayerId) -> Result<Option<PlayerRecord>, RosterError> {
        self.get_player(id).map_err(store_error)
    }

    fn save(
        &mut self,
        id: Option<PlayerId>,
        profile: &PlayerProfile,
    ) -> Result<PlayerRecord, RosterError> {
        self.save_player(id, profile).map_err(store_error)
    }

    fn delete_by_id(&mut self, id: PlayerId) -> Result<(), RosterError> {
        self.remove_player(id).map(|_| ()).map_err(store_error)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(err: anyhow::Error) -> RosterError {
    RosterError::Store(format!("{err:#}"))
}

fn read_player_row(row: &Row<'_>) -> Result<PlayerRecord> {
    let race_raw: String = row.get(3)?;
    let profession_raw: String = row.get(4)?;
    let birthday_ms: i64 = row.get(5)?;

    Ok(PlayerRecord {
        id: PlayerId(row.get(0)?),
        profile: PlayerProfile {
            name: row.get(1)?,
            title: row.get(2)?,
            race: Race::parse(&race_raw).ok_or_else(|| anyhow!("unknown race: {race_raw}"))?,
            profession: Profession::parse(&profession_raw)
                .ok_or_else(|| anyhow!("unknown profession: {profession_raw}"))?,
            birthday: from_epoch_millis(birthday_ms)
                .map_err(|err| anyhow!("invalid stored birthday: {err}"))?,
            experience: row.get(6)?,
            level: row.get(7)?,
            until_next_level: row.get(8)?,
            banned: row.get(9)?,
        },
    })
}

fn current_schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to read current schema version")?;
    Ok(version)
}

fn record_schema_version(conn: &Connection, version: i64) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations(version, applied_at) VALUES (?1, ?2)",
        params![version, now],
    )
    .with_context(|| format!("failed to record migration version {version}"))?;
    Ok(())
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .context("failed to format RFC3339 timestamp")
}
