use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

mod fields;
mod level;
mod query;
mod store;

pub use fields::{parse_flag_param, parse_integer_param, PlayerFields};
pub use level::{level_for_experience, until_next_level};
pub use query::{
    count_filtered, filter_players, sort_and_page, PageRequest, PlayerFilter, PlayerOrder,
    DEFAULT_PAGE_SIZE,
};
pub use store::{MemoryStore, PlayerStore};

pub const NAME_MAX_CHARS: usize = 12;
pub const TITLE_MAX_CHARS: usize = 30;
pub const MAX_EXPERIENCE: u32 = 10_000_000;

/// 2000-01-01T00:00:00Z, the first accepted birthday.
pub const BIRTHDAY_MIN_MILLIS: i64 = 946_684_800_000;
/// 3000-01-01T00:00:00Z, the first rejected birthday; all of 2999-12-31 is accepted.
pub const BIRTHDAY_END_MILLIS: i64 = 32_503_680_000_000;

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum RosterError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation error: {field} {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("player not found: {0}")]
    NotFound(PlayerId),
    #[error("store error: {0}")]
    Store(String),
}

impl RosterError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation { .. } => "validation",
            Self::NotFound(_) => "not_found",
            Self::Store(_) => "store",
        }
    }

    fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl PlayerId {
    /// Resolve a caller-supplied identifier string.
    ///
    /// # Errors
    /// Returns [`RosterError::BadRequest`] unless `raw` is a positive integer.
    pub fn parse(raw: &str) -> Result<Self, RosterError> {
        let value = raw
            .parse::<i64>()
            .map_err(|_| RosterError::BadRequest(format!("player id is not an integer: {raw}")))?;
        if value <= 0 {
            return Err(RosterError::BadRequest(format!("player id must be positive: {raw}")));
        }
        Ok(Self(value))
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Giant,
    Orc,
    Troll,
    Hobbit,
}

impl Race {
    pub const ALL: [Self; 7] =
        [Self::Human, Self::Dwarf, Self::Elf, Self::Giant, Self::Orc, Self::Troll, Self::Hobbit];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "HUMAN",
            Self::Dwarf => "DWARF",
            Self::Elf => "ELF",
            Self::Giant => "GIANT",
            Self::Orc => "ORC",
            Self::Troll => "TROLL",
            Self::Hobbit => "HOBBIT",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|race| race.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profession {
    Warrior,
    Rogue,
    Sorcerer,
    Cleric,
    Paladin,
    Nazgul,
    Warlock,
    Druid,
}

impl Profession {
    pub const ALL: [Self; 8] = [
        Self::Warrior,
        Self::Rogue,
        Self::Sorcerer,
        Self::Cleric,
        Self::Paladin,
        Self::Nazgul,
        Self::Warlock,
        Self::Druid,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "WARRIOR",
            Self::Rogue => "ROGUE",
            Self::Sorcerer => "SORCERER",
            Self::Cleric => "CLERIC",
            Self::Paladin => "PALADIN",
            Self::Nazgul => "NAZGUL",
            Self::Warlock => "WARLOCK",
            Self::Druid => "DRUID",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|profession| profession.as_str() == value)
    }
}

/// Milliseconds since the Unix epoch, the representation used on the wire and in storage.
#[must_use]
pub fn to_epoch_millis(value: OffsetDateTime) -> i64 {
    i64::try_from(value.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

/// # Errors
/// Returns [`RosterError::BadRequest`] when `millis` lies outside the representable date range.
pub fn from_epoch_millis(millis: i64) -> Result<OffsetDateTime, RosterError> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|err| RosterError::BadRequest(format!("timestamp {millis} is out of range: {err}")))
}

pub mod epoch_millis {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(super::to_epoch_millis(*value))
    }

    /// # Errors
    /// Fails when the input is not an integer or is outside the representable date range.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        super::from_epoch_millis(millis).map_err(D::Error::custom)
    }
}

/// Every persisted attribute of a player except its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub title: String,
    pub race: Race,
    pub profession: Profession,
    #[serde(with = "epoch_millis")]
    pub birthday: OffsetDateTime,
    pub experience: u32,
    pub level: u32,
    pub until_next_level: u32,
    pub banned: bool,
}

impl PlayerProfile {
    /// Re-check a profile about to be persisted.
    ///
    /// # Errors
    /// Returns [`RosterError::Validation`] when a text, range, or derived-field
    /// constraint does not hold.
    pub fn validate(&self) -> Result<(), RosterError> {
        if validate_name(&self.name)? != self.name {
            return Err(RosterError::validation("name", "must not carry surrounding whitespace"));
        }
        validate_title(&self.title)?;
        validate_birthday(to_epoch_millis(self.birthday))?;
        validate_experience(i64::from(self.experience))?;

        let level = level_for_experience(self.experience);
        if self.level != level {
            return Err(RosterError::validation(
                "level",
                format!("must equal {level} for experience {}", self.experience),
            ));
        }
        let until_next = until_next_level(level, self.experience);
        if self.until_next_level != until_next {
            return Err(RosterError::validation(
                "untilNextLevel",
                format!("must equal {until_next} for experience {}", self.experience),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    #[serde(flatten)]
    pub profile: PlayerProfile,
}

/// A complete, not yet validated set of caller-level field values.
///
/// Built either from a create request or by overlaying an update request on a
/// stored profile, then validated as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCandidate {
    pub name: String,
    pub title: String,
    pub race: String,
    pub profession: String,
    pub birthday: i64,
    pub experience: i64,
    pub banned: bool,
}

impl PlayerCandidate {
    /// # Errors
    /// Returns [`RosterError::Validation`] naming the first required field that is absent.
    pub fn from_fields(fields: PlayerFields) -> Result<Self, RosterError> {
        Ok(Self {
            name: required("name", fields.name)?,
            title: required("title", fields.title)?,
            race: required("race", fields.race)?,
            profession: required("profession", fields.profession)?,
            birthday: required("birthday", fields.birthday)?,
            experience: required("experience", fields.experience)?,
            banned: fields.banned.unwrap_or(false),
        })
    }

    #[must_use]
    pub fn merged(existing: &PlayerProfile, fields: PlayerFields) -> Self {
        Self {
            name: fields.name.unwrap_or_else(|| existing.name.clone()),
            title: fields.title.unwrap_or_else(|| existing.title.clone()),
            race: fields.race.unwrap_or_else(|| existing.race.as_str().to_string()),
            profession: fields
                .profession
                .unwrap_or_else(|| existing.profession.as_str().to_string()),
            birthday: fields.birthday.unwrap_or_else(|| to_epoch_millis(existing.birthday)),
            experience: fields.experience.unwrap_or_else(|| i64::from(existing.experience)),
            banned: fields.banned.unwrap_or(existing.banned),
        }
    }

    /// Validate every field and derive `level` and `until_next_level`.
    ///
    /// # Errors
    /// Returns [`RosterError::Validation`] for the first field violating its constraint.
    pub fn into_profile(self) -> Result<PlayerProfile, RosterError> {
        let name = validate_name(&self.name)?;
        validate_title(&self.title)?;
        let race = Race::parse(&self.race)
            .ok_or_else(|| RosterError::validation("race", format!("unknown value {}", self.race)))?;
        let profession = Profession::parse(&self.profession).ok_or_else(|| {
            RosterError::validation("profession", format!("unknown value {}", self.profession))
        })?;
        let birthday = validate_birthday(self.birthday)?;
        let experience = validate_experience(self.experience)?;
        let level = level_for_experience(experience);

        Ok(PlayerProfile {
            name,
            title: self.title,
            race,
            profession,
            birthday,
            experience,
            level,
            until_next_level: until_next_level(level, experience),
            banned: self.banned,
        })
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, RosterError> {
    value.ok_or_else(|| RosterError::validation(field, "is required"))
}

fn validate_name(raw: &str) -> Result<String, RosterError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RosterError::validation("name", "must not be empty or blank"));
    }
    let length = name.chars().count();
    if length > NAME_MAX_CHARS {
        return Err(RosterError::validation(
            "name",
            format!("must be at most {NAME_MAX_CHARS} characters, got {length}"),
        ));
    }
    Ok(name.to_string())
}

fn validate_title(title: &str) -> Result<(), RosterError> {
    let length = title.chars().count();
    if length > TITLE_MAX_CHARS {
        return Err(RosterError::validation(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters, got {length}"),
        ));
    }
    Ok(())
}

fn validate_birthday(millis: i64) -> Result<OffsetDateTime, RosterError> {
    if !(BIRTHDAY_MIN_MILLIS..BIRTHDAY_END_MILLIS).contains(&millis) {
        return Err(RosterError::validation(
            "birthday",
            format!("must fall in years 2000..=2999, got epoch millis {millis}"),
        ));
    }
    from_epoch_millis(millis)
}

fn validate_experience(experience: i64) -> Result<u32, RosterError> {
    u32::try_from(experience)
        .ok()
        .filter(|value| *value <= MAX_EXPERIENCE)
        .ok_or_else(|| {
            RosterError::validation(
                "experience",
                format!("must be within 0..={MAX_EXPERIENCE}, got {experience}"),
            )
        })
}

/// Return every stored player matching `filter`, in ascending id order.
///
/// # Errors
/// Returns [`RosterError::Store`] when the store cannot be scanned.
pub fn find_players<S>(store: &S, filter: &PlayerFilter) -> Result<Vec<PlayerRecord>, RosterError>
where
    S: PlayerStore + ?Sized,
{
    let records = store.fetch_all()?;
    Ok(filter_players(&records, filter))
}

/// # Errors
/// Returns [`RosterError::Store`] when the store cannot be scanned.
pub fn count_players<S>(store: &S, filter: &PlayerFilter) -> Result<usize, RosterError>
where
    S: PlayerStore + ?Sized,
{
    let records = store.fetch_all()?;
    Ok(count_filtered(&records, filter))
}

/// Validate a create request and persist it, letting the store assign the id.
///
/// # Errors
/// Returns [`RosterError::Validation`] before any write when a field is missing or
/// invalid, or [`RosterError::Store`] when persistence fails.
pub fn create_player<S>(store: &mut S, fields: PlayerFields) -> Result<PlayerRecord, RosterError>
where
    S: PlayerStore + ?Sized,
{
    let profile = PlayerCandidate::from_fields(fields)?.into_profile()?;
    store.save(None, &profile)
}

/// # Errors
/// Returns [`RosterError::BadRequest`] for a malformed id and
/// [`RosterError::NotFound`] when no player has that id.
pub fn get_player<S>(store: &S, raw_id: &str) -> Result<PlayerRecord, RosterError>
where
    S: PlayerStore + ?Sized,
{
    let id = PlayerId::parse(raw_id)?;
    store.fetch_by_id(id)?.ok_or(RosterError::NotFound(id))
}

/// Overlay `fields` on the stored player, revalidate the merged result and persist it.
///
/// # Errors
/// Returns [`RosterError::BadRequest`] for a malformed id or a request carrying no
/// updatable field, [`RosterError::NotFound`] for an unknown id, and
/// [`RosterError::Validation`] when the merged player violates a constraint.
pub fn update_player<S>(
    store: &mut S,
    raw_id: &str,
    fields: PlayerFields,
) -> Result<PlayerRecord, RosterError>
where
    S: PlayerStore + ?Sized,
{
    let existing = get_player(&*store, raw_id)?;
    if !fields.has_effective_changes() {
        return Err(RosterError::BadRequest(format!(
            "update for player {} carries no name, title, race, profession, birthday or experience",
            existing.id
        )));
    }

    let profile = PlayerCandidate::merged(&existing.profile, fields).into_profile()?;
    store.save(Some(existing.id), &profile)
}

/// # Errors
/// Fails exactly as [`get_player`] does, or with [`RosterError::Store`] when removal fails.
pub fn delete_player<S>(store: &mut S, raw_id: &str) -> Result<(), RosterError>
where
    S: PlayerStore + ?Sized,
{
    let existing = get_player(&*store, raw_id)?;
    store.delete_by_id(existing.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIRTHDAY_2010: i64 = 1_267_401_600_000;
    const BIRTHDAY_1999: i64 = 915_148_800_000;
    const BIRTHDAY_2500: i64 = 16_739_481_600_000;
    const BIRTHDAY_3001: i64 = 32_535_216_000_000;
    const BIRTHDAY_DEC_31_2999: i64 = 32_503_593_600_000;

    fn mk_fields(name: &str, experience: i64) -> PlayerFields {
        PlayerFields {
            name: Some(name.to_string()),
            title: Some("Keeper of the Gate".to_string()),
            race: Some("ELF".to_string()),
            profession: Some("SORCERER".to_string()),
            birthday: Some(BIRTHDAY_2010),
            experience: Some(experience),
            banned: None,
        }
    }

    fn seeded_store() -> (MemoryStore, PlayerRecord) {
        let mut store = MemoryStore::default();
        let record = match create_player(&mut store, mk_fields("Aerin", 1_500)) {
            Ok(record) => record,
            Err(err) => panic!("fixture player should be valid: {err}"),
        };
        (store, record)
    }

    fn assert_validation_field(result: Result<PlayerRecord, RosterError>, expected: &str) {
        match result {
            Err(RosterError::Validation { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error on `{expected}`, got {other:?}"),
        }
    }

    #[test]
    fn player_id_parse_rejects_malformed_and_non_positive_values() {
        assert_eq!(PlayerId::parse("42"), Ok(PlayerId(42)));
        for raw in ["abc", "", "1.5", "-1", "0", " 7"] {
            assert!(
                matches!(PlayerId::parse(raw), Err(RosterError::BadRequest(_))),
                "`{raw}` should be a bad request"
            );
        }
    }

    #[test]
    fn enum_names_round_trip_through_parse() {
        for race in Race::ALL {
            assert_eq!(Race::parse(race.as_str()), Some(race));
        }
        for profession in Profession::ALL {
            assert_eq!(Profession::parse(profession.as_str()), Some(profession));
        }
        assert_eq!(Race::parse("human"), None);
        assert_eq!(Profession::parse("MAGE"), None);
    }

    #[test]
    fn create_derives_level_and_defaults_banned() -> Result<(), RosterError> {
        let mut store = MemoryStore::default();
        let record = create_player(&mut store, mk_fields("Aerin", 100))?;

        assert_eq!(record.id, PlayerId(1));
        assert_eq!(record.profile.level, 1);
        assert_eq!(record.profile.until_next_level, 200);
        assert!(!record.profile.banned);
        assert_eq!(record.profile.race, Race::Elf);
        assert_eq!(record.profile.profession, Profession::Sorcerer);
        Ok(())
    }

    #[test]
    fn create_rejects_name_longer_than_twelve_characters() {
        let mut store = MemoryStore::default();
        assert_validation_field(create_player(&mut store, mk_fields("Thirteenchars", 0)), "name");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn create_rejects_empty_and_blank_names() {
        let mut store = MemoryStore::default();
        assert_validation_field(create_player(&mut store, mk_fields("", 0)), "name");
        assert_validation_field(create_player(&mut store, mk_fields("   \t ", 0)), "name");
    }

    #[test]
    fn create_trims_surrounding_whitespace_from_name() -> Result<(), RosterError> {
        let mut store = MemoryStore::default();
        let record = create_player(&mut store, mk_fields("  Twelve chars ", 0))?;
        assert_eq!(record.profile.name, "Twelve chars");
        Ok(())
    }

    #[test]
    fn create_rejects_title_longer_than_thirty_characters() {
        let mut store = MemoryStore::default();
        let mut fields = mk_fields("Aerin", 0);
        fields.title = Some("x".repeat(31));
        assert_validation_field(create_player(&mut store, fields), "title");
    }

    #[test]
    fn create_rejects_birthdays_outside_the_accepted_years() -> Result<(), RosterError> {
        let mut store = MemoryStore::default();
        for millis in
            [BIRTHDAY_1999, BIRTHDAY_3001, BIRTHDAY_MIN_MILLIS - 1, BIRTHDAY_END_MILLIS, -1, 0]
        {
            let mut fields = mk_fields("Aerin", 0);
            fields.birthday = Some(millis);
            assert_validation_field(create_player(&mut store, fields), "birthday");
        }

        let mut fields = mk_fields("Aerin", 0);
        fields.birthday = Some(BIRTHDAY_2500);
        let record = create_player(&mut store, fields)?;
        assert_eq!(record.profile.birthday.year(), 2500);
        Ok(())
    }

    #[test]
    fn create_accepts_the_first_and_last_days_of_the_accepted_years() -> Result<(), RosterError> {
        let mut store = MemoryStore::default();
        for (millis, year, ordinal) in
            [(BIRTHDAY_MIN_MILLIS, 2000, 1), (BIRTHDAY_DEC_31_2999, 2999, 365)]
        {
            let mut fields = mk_fields("Aerin", 0);
            fields.birthday = Some(millis);
            let record = create_player(&mut store, fields)?;
            assert_eq!(record.profile.birthday.year(), year);
            assert_eq!(record.profile.birthday.ordinal(), ordinal);
        }

        let mut fields = mk_fields("Aerin", 0);
        fields.birthday = Some(BIRTHDAY_END_MILLIS - 1);
        assert!(create_player(&mut store, fields).is_ok());
        Ok(())
    }

    #[test]
    fn create_rejects_experience_out_of_range() {
        let mut store = MemoryStore::default();
        assert_validation_field(create_player(&mut store, mk_fields("Aerin", -1)), "experience");
        assert_validation_field(
            create_player(&mut store, mk_fields("Aerin", 10_000_001)),
            "experience",
        );
    }

    #[test]
    fn create_rejects_unknown_race_and_missing_fields() {
        let mut store = MemoryStore::default();
        let mut fields = mk_fields("Aerin", 0);
        fields.race = Some("CENTAUR".to_string());
        assert_validation_field(create_player(&mut store, fields), "race");

        let mut fields = mk_fields("Aerin", 0);
        fields.profession = None;
        assert_validation_field(create_player(&mut store, fields), "profession");
    }

    #[test]
    fn get_distinguishes_bad_request_from_not_found() {
        let (store, record) = seeded_store();

        assert_eq!(get_player(&store, "1"), Ok(record));
        assert!(matches!(get_player(&store, "abc"), Err(RosterError::BadRequest(_))));
        assert!(matches!(get_player(&store, "-1"), Err(RosterError::BadRequest(_))));
        assert_eq!(get_player(&store, "999999"), Err(RosterError::NotFound(PlayerId(999_999))));
    }

    #[test]
    fn update_with_no_fields_is_a_bad_request() {
        let (mut store, _) = seeded_store();
        let result = update_player(&mut store, "1", PlayerFields::default());
        assert!(matches!(result, Err(RosterError::BadRequest(_))));

        let banned_only = PlayerFields { banned: Some(true), ..PlayerFields::default() };
        let result = update_player(&mut store, "1", banned_only);
        assert!(matches!(result, Err(RosterError::BadRequest(_))));
    }

    #[test]
    fn update_of_experience_recomputes_only_derived_fields() -> Result<(), RosterError> {
        let (mut store, before) = seeded_store();
        let fields = PlayerFields { experience: Some(10_000_000), ..PlayerFields::default() };
        let after = update_player(&mut store, "1", fields)?;

        assert_eq!(after.id, before.id);
        assert_eq!(after.profile.experience, 10_000_000);
        assert_eq!(after.profile.level, 446);
        assert_eq!(after.profile.until_next_level, 12_800);
        assert_eq!(after.profile.name, before.profile.name);
        assert_eq!(after.profile.title, before.profile.title);
        assert_eq!(after.profile.race, before.profile.race);
        assert_eq!(after.profile.profession, before.profile.profession);
        assert_eq!(after.profile.birthday, before.profile.birthday);
        assert_eq!(after.profile.banned, before.profile.banned);
        assert_eq!(get_player(&store, "1")?, after);
        Ok(())
    }

    #[test]
    fn update_aborts_without_persisting_when_merged_player_is_invalid() -> Result<(), RosterError> {
        let (mut store, before) = seeded_store();
        let fields = PlayerFields {
            name: Some("Renamed".to_string()),
            title: Some("t".repeat(40)),
            ..PlayerFields::default()
        };
        assert_validation_field(update_player(&mut store, "1", fields), "title");
        assert_eq!(get_player(&store, "1")?, before);
        Ok(())
    }

    #[test]
    fn update_checks_identifier_before_fields() {
        let (mut store, _) = seeded_store();
        let fields = PlayerFields { name: Some("Other".to_string()), ..PlayerFields::default() };
        assert!(matches!(
            update_player(&mut store, "x1", fields.clone()),
            Err(RosterError::BadRequest(_))
        ));
        assert_eq!(
            update_player(&mut store, "77", fields),
            Err(RosterError::NotFound(PlayerId(77)))
        );
    }

    #[test]
    fn delete_resolves_identifier_like_lookup() -> Result<(), RosterError> {
        let (mut store, _) = seeded_store();
        assert!(matches!(delete_player(&mut store, "zero"), Err(RosterError::BadRequest(_))));
        assert_eq!(delete_player(&mut store, "2"), Err(RosterError::NotFound(PlayerId(2))));

        delete_player(&mut store, "1")?;
        assert_eq!(get_player(&store, "1"), Err(RosterError::NotFound(PlayerId(1))));
        Ok(())
    }

    #[test]
    fn profile_validate_detects_stale_derived_fields() -> Result<(), RosterError> {
        let (_, record) = seeded_store();
        record.profile.validate()?;

        let mut stale = record.profile.clone();
        stale.experience = 0;
        assert!(matches!(stale.validate(), Err(RosterError::Validation { field: "level", .. })));

        let mut padded = record.profile;
        padded.name = " Aerin".to_string();
        assert!(matches!(padded.validate(), Err(RosterError::Validation { field: "name", .. })));
        Ok(())
    }

    #[test]
    fn player_record_json_uses_flat_camel_case_fields() -> Result<(), serde_json::Error> {
        let (_, record) = seeded_store();
        let value = serde_json::to_value(&record)?;

        assert_eq!(value.get("id").and_then(serde_json::Value::as_i64), Some(1));
        assert_eq!(value.get("race").and_then(serde_json::Value::as_str), Some("ELF"));
        assert_eq!(value.get("birthday").and_then(serde_json::Value::as_i64), Some(BIRTHDAY_2010));
        assert!(value.get("untilNextLevel").is_some());

        let decoded: PlayerRecord = serde_json::from_value(value)?;
        assert_eq!(decoded, record);
        Ok(())
    }
}
