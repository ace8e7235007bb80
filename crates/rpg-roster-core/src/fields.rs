use serde_json::{Map, Value};

use crate::RosterError;

/// Sparse, caller-supplied player fields.
///
/// `None` means the caller did not supply the field. Race and profession stay raw
/// so that unknown names surface as validation errors instead of parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFields {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<String>,
    pub profession: Option<String>,
    /// Epoch milliseconds.
    pub birthday: Option<i64>,
    pub experience: Option<i64>,
    pub banned: Option<bool>,
}

impl PlayerFields {
    /// Read fields from a JSON request body.
    ///
    /// Numbers and flags may arrive either typed or string-encoded. `null` counts as
    /// absent; `id`, `level`, `untilNextLevel` and unknown keys are ignored.
    ///
    /// # Errors
    /// Returns [`RosterError::BadRequest`] when the body is not an object or a value
    /// cannot be read as its field's type.
    pub fn from_json(body: &Value) -> Result<Self, RosterError> {
        let Value::Object(map) = body else {
            return Err(RosterError::BadRequest("player body must be a JSON object".to_string()));
        };

        Ok(Self {
            name: text_field(map, "name")?,
            title: text_field(map, "title")?,
            race: text_field(map, "race")?,
            profession: text_field(map, "profession")?,
            birthday: integer_field(map, "birthday")?,
            experience: integer_field(map, "experience")?,
            banned: flag_field(map, "banned")?,
        })
    }

    /// Whether an update request names at least one field that can change a player.
    ///
    /// `banned` alone does not count.
    #[must_use]
    pub fn has_effective_changes(&self) -> bool {
        self.name.is_some()
            || self.title.is_some()
            || self.race.is_some()
            || self.profession.is_some()
            || self.birthday.is_some()
            || self.experience.is_some()
    }
}

/// # Errors
/// Returns [`RosterError::BadRequest`] when `raw` is not a signed 64-bit integer.
pub fn parse_integer_param(name: &str, raw: &str) -> Result<i64, RosterError> {
    raw.parse::<i64>()
        .map_err(|_| RosterError::BadRequest(format!("{name} must be an integer, got `{raw}`")))
}

/// # Errors
/// Returns [`RosterError::BadRequest`] unless `raw` is `true` or `false`.
pub fn parse_flag_param(name: &str, raw: &str) -> Result<bool, RosterError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RosterError::BadRequest(format!("{name} must be true or false, got `{raw}`"))),
    }
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn text_field(map: &Map<String, Value>, key: &str) -> Result<Option<String>, RosterError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(RosterError::BadRequest(format!("{key} must be a string, got {other}"))),
    }
}

/// Integers beyond `i64` saturate so that range validation, not parsing, rejects them.
fn integer_field(map: &Map<String, Value>, key: &str) -> Result<Option<i64>, RosterError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(raw)) => match saturated_digits(raw) {
            Some(value) => Ok(Some(value)),
            None => parse_integer_param(key, raw).map(Some),
        },
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .map(Some)
            .ok_or_else(|| {
                RosterError::BadRequest(format!("{key} must be an integer, got {number}"))
            }),
        Some(other) => {
            Err(RosterError::BadRequest(format!("{key} must be an integer, got {other}")))
        }
    }
}

fn saturated_digits(raw: &str) -> Option<i64> {
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

fn flag_field(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, RosterError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(Value::String(raw)) => parse_flag_param(key, raw).map(Some),
        Some(other) => Err(RosterError::BadRequest(format!("{key} must be a boolean, got {other}"))),
    }
}
