use std::path::PathBuf;

use rpg_roster_core::{
    count_players, create_player, delete_player, find_players, get_player, parse_flag_param,
    parse_integer_param, sort_and_page, update_player, PageRequest, PlayerFields, PlayerFilter,
    PlayerId, PlayerOrder, PlayerRecord, Profession, Race, RosterError, DEFAULT_PAGE_SIZE,
};
use rpg_roster_store_sqlite::{SchemaStatus, SqliteStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const API_CONTRACT_VERSION: &str = "api.v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrateResult {
    pub dry_run: bool,
    pub current_version: i64,
    pub target_version: i64,
    pub would_apply_versions: Vec<i64>,
    pub after_version: Option<i64>,
    pub up_to_date: Option<bool>,
}

/// Raw list/count parameters exactly as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuery {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<String>,
    pub profession: Option<String>,
    pub after: Option<String>,
    pub before: Option<String>,
    pub banned: Option<String>,
    pub min_experience: Option<String>,
    pub max_experience: Option<String>,
    pub min_level: Option<String>,
    pub max_level: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
    #[serde(alias = "playerOrder")]
    pub order: Option<String>,
}

impl PlayerQuery {
    /// # Errors
    /// Returns [`RosterError::BadRequest`] when any criterion cannot be parsed.
    pub fn filter(&self) -> Result<PlayerFilter, RosterError> {
        Ok(PlayerFilter {
            name: self.name.clone(),
            title: self.title.clone(),
            race: self
                .race
                .as_deref()
                .map(|raw| {
                    Race::parse(raw)
                        .ok_or_else(|| RosterError::BadRequest(format!("unknown race `{raw}`")))
                })
                .transpose()?,
            profession: self
                .profession
                .as_deref()
                .map(|raw| {
                    Profession::parse(raw).ok_or_else(|| {
                        RosterError::BadRequest(format!("unknown profession `{raw}`"))
                    })
                })
                .transpose()?,
            after: integer_param("after", self.after.as_deref())?,
            before: integer_param("before", self.before.as_deref())?,
            banned: self.banned.as_deref().map(|raw| parse_flag_param("banned", raw)).transpose()?,
            min_experience: integer_param("minExperience", self.min_experience.as_deref())?,
            max_experience: integer_param("maxExperience", self.max_experience.as_deref())?,
            min_level: integer_param("minLevel", self.min_level.as_deref())?,
            max_level: integer_param("maxLevel", self.max_level.as_deref())?,
        })
    }

    /// Page and order, defaulting to the first page of three players by id.
    ///
    /// # Errors
    /// Returns [`RosterError::BadRequest`] for unparseable or out-of-range paging
    /// values and unknown order keys.
    pub fn page(&self) -> Result<(PageRequest, PlayerOrder), RosterError> {
        let page_number = integer_param("pageNumber", self.page_number.as_deref())?.unwrap_or(0);
        let page_size = match integer_param("pageSize", self.page_size.as_deref())? {
            Some(size) => size,
            None => i64::try_from(DEFAULT_PAGE_SIZE).unwrap_or(i64::MAX),
        };
        let order = match self.order.as_deref() {
            Some(raw) => PlayerOrder::parse(raw)
                .ok_or_else(|| RosterError::BadRequest(format!("unknown order `{raw}`")))?,
            None => PlayerOrder::default(),
        };
        Ok((PageRequest::new(page_number, page_size)?, order))
    }
}

fn integer_param(name: &str, raw: Option<&str>) -> Result<Option<i64>, RosterError> {
    raw.map(|raw| parse_integer_param(name, raw)).transpose()
}

#[derive(Debug, Clone)]
pub struct RosterApi {
    db_path: PathBuf,
}

impl RosterApi {
    #[must_use]
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn open_store(&self) -> Result<SqliteStore, RosterError> {
        let mut store = SqliteStore::open(&self.db_path).map_err(store_error)?;
        store.migrate().map_err(store_error)?;
        Ok(store)
    }

    /// Inspect schema status without mutating data.
    ///
    /// # Errors
    /// Returns [`RosterError::Store`] when the database cannot be opened or queried.
    pub fn schema_status(&self) -> Result<SchemaStatus, RosterError> {
        let store = SqliteStore::open(&self.db_path).map_err(store_error)?;
        store.schema_status().map_err(store_error)
    }

    /// Apply pending migrations, or return planned versions for dry-run mode.
    ///
    /// # Errors
    /// Returns [`RosterError::Store`] when migration planning or execution fails.
    pub fn migrate(&self, dry_run: bool) -> Result<MigrateResult, RosterError> {
        let mut store = SqliteStore::open(&self.db_path).map_err(store_error)?;
        let before = store.schema_status().map_err(store_error)?;
        if dry_run {
            return Ok(MigrateResult {
                dry_run: true,
                current_version: before.current_version,
                target_version: before.target_version,
                would_apply_versions: before.pending_versions,
                after_version: None,
                up_to_date: None,
            });
        }

        store.migrate().map_err(store_error)?;
        let after = store.schema_status().map_err(store_error)?;
        tracing::info!(
            from_version = before.current_version,
            to_version = after.current_version,
            "schema migrated"
        );
        Ok(MigrateResult {
            dry_run: false,
            current_version: before.current_version,
            target_version: before.target_version,
            would_apply_versions: before.pending_versions,
            after_version: Some(after.current_version),
            up_to_date: Some(after.pending_versions.is_empty()),
        })
    }

    /// Filter, sort and page the stored players.
    ///
    /// # Errors
    /// Returns [`RosterError::BadRequest`] for unusable parameters, or
    /// [`RosterError::Store`] when the store cannot be read.
    pub fn list_players(&self, query: &PlayerQuery) -> Result<Vec<PlayerRecord>, RosterError> {
        traced("list_players", || {
            let filter = query.filter()?;
            let (page, order) = query.page()?;
            let store = self.open_store()?;
            let matched = find_players(&store, &filter)?;
            Ok(sort_and_page(&matched, page, order))
        })
    }

    /// Count the stored players matching the query's criteria; paging parameters are ignored.
    ///
    /// # Errors
    /// Returns [`RosterError::BadRequest`] for unusable criteria, or
    /// [`RosterError::Store`] when the store cannot be read.
    pub fn count_players(&self, query: &PlayerQuery) -> Result<usize, RosterError> {
        traced("count_players", || {
            let filter = query.filter()?;
            let store = self.open_store()?;
            count_players(&store, &filter)
        })
    }

    /// # Errors
    /// Returns [`RosterError::BadRequest`] for an unreadable body,
    /// [`RosterError::Validation`] for a constraint violation, or
    /// [`RosterError::Store`] when persistence fails.
    pub fn create_player(&self, body: &Value) -> Result<PlayerRecord, RosterError> {
        traced("create_player", || {
            let fields = PlayerFields::from_json(body)?;
            let mut store = self.open_store()?;
            let record = create_player(&mut store, fields)?;
            tracing::info!(player_id = %record.id, level = record.profile.level, "player created");
            Ok(record)
        })
    }

    /// # Errors
    /// Returns [`RosterError::BadRequest`] for a malformed id or
    /// [`RosterError::NotFound`] for an unknown one.
    pub fn get_player(&self, raw_id: &str) -> Result<PlayerRecord, RosterError> {
        traced("get_player", || {
            PlayerId::parse(raw_id)?;
            let store = self.open_store()?;
            get_player(&store, raw_id)
        })
    }

    /// # Errors
    /// Returns [`RosterError::BadRequest`], [`RosterError::NotFound`] or
    /// [`RosterError::Validation`] as described by [`update_player`].
    pub fn update_player(&self, raw_id: &str, body: &Value) -> Result<PlayerRecord, RosterError> {
        traced("update_player", || {
            PlayerId::parse(raw_id)?;
            let fields = PlayerFields::from_json(body)?;
            let mut store = self.open_store()?;
            let record = update_player(&mut store, raw_id, fields)?;
            tracing::info!(player_id = %record.id, level = record.profile.level, "player updated");
            Ok(record)
        })
    }

    /// # Errors
    /// Returns [`RosterError::BadRequest`] for a malformed id or
    /// [`RosterError::NotFound`] for an unknown one.
    pub fn delete_player(&self, raw_id: &str) -> Result<(), RosterError> {
        traced("delete_player", || {
            PlayerId::parse(raw_id)?;
            let mut store = self.open_store()?;
            delete_player(&mut store, raw_id)?;
            tracing::info!(player_id = raw_id, "player deleted");
            Ok(())
        })
    }
}

fn traced<T>(
    operation: &'static str,
    run: impl FnOnce() -> Result<T, RosterError>,
) -> Result<T, RosterError> {
    let result = run();
    match &result {
        Err(err @ RosterError::Store(_)) => tracing::error!(operation, error = %err, "store failure"),
        Err(err) => tracing::debug!(operation, kind = err.kind(), error = %err, "request rejected"),
        Ok(_) => {}
    }
    result
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(err: anyhow::Error) -> RosterError {
    RosterError::Store(format!("{err:#}"))
}
