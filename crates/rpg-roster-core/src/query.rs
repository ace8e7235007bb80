use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{to_epoch_millis, PlayerRecord, Profession, Race, RosterError};

pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Optional criteria combined with AND; an absent criterion matches every player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub name: Option<String>,
    pub title: Option<String>,
    pub race: Option<Race>,
    pub profession: Option<Profession>,
    /// Epoch milliseconds, inclusive.
    pub after: Option<i64>,
    /// Epoch milliseconds, inclusive.
    pub before: Option<i64>,
    pub banned: Option<bool>,
    pub min_experience: Option<i64>,
    pub max_experience: Option<i64>,
    pub min_level: Option<i64>,
    pub max_level: Option<i64>,
}

impl PlayerFilter {
    #[must_use]
    pub fn matches(&self, record: &PlayerRecord) -> bool {
        let profile = &record.profile;
        let birthday = to_epoch_millis(profile.birthday);
        let experience = i64::from(profile.experience);
        let level = i64::from(profile.level);

        satisfies(self.name.as_deref(), |needle| profile.name.contains(needle))
            && satisfies(self.title.as_deref(), |needle| profile.title.contains(needle))
            && satisfies(self.race, |race| profile.race == race)
            && satisfies(self.profession, |profession| profile.profession == profession)
            && satisfies(self.after, |after| birthday >= after)
            && satisfies(self.before, |before| birthday <= before)
            && satisfies(self.banned, |banned| profile.banned == banned)
            && satisfies(self.min_experience, |min| experience >= min)
            && satisfies(self.max_experience, |max| experience <= max)
            && satisfies(self.min_level, |min| level >= min)
            && satisfies(self.max_level, |max| level <= max)
    }
}

fn satisfies<T>(criterion: Option<T>, predicate: impl FnOnce(T) -> bool) -> bool {
    criterion.map_or(true, predicate)
}

/// Keep the records matching `filter`, preserving input order.
#[must_use]
pub fn filter_players(records: &[PlayerRecord], filter: &PlayerFilter) -> Vec<PlayerRecord> {
    records.iter().filter(|record| filter.matches(record)).cloned().collect()
}

#[must_use]
pub fn count_filtered(records: &[PlayerRecord], filter: &PlayerFilter) -> usize {
    records.iter().filter(|record| filter.matches(record)).count()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerOrder {
    #[default]
    Id,
    Name,
    Experience,
    Birthday,
}

impl PlayerOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "NAME",
            Self::Experience => "EXPERIENCE",
            Self::Birthday => "BIRTHDAY",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ID" => Some(Self::Id),
            "NAME" => Some(Self::Name),
            "EXPERIENCE" => Some(Self::Experience),
            "BIRTHDAY" => Some(Self::Birthday),
            _ => None,
        }
    }
}

/// A zero-based page of a fixed, non-zero size.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PageRequest {
    pub page_number: usize,
    pub page_size: NonZeroUsize,
}

impl PageRequest {
    /// # Errors
    /// Returns [`RosterError::BadRequest`] for a negative page number or a page size below one.
    pub fn new(page_number: i64, page_size: i64) -> Result<Self, RosterError> {
        let page_number = usize::try_from(page_number).map_err(|_| {
            RosterError::BadRequest(format!("pageNumber must be >= 0, got {page_number}"))
        })?;
        let page_size = usize::try_from(page_size)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                RosterError::BadRequest(format!("pageSize must be >= 1, got {page_size}"))
            })?;
        Ok(Self { page_number, page_size })
    }

    fn bounds(self, len: usize) -> (usize, usize) {
        let start = self.page_number.saturating_mul(self.page_size.get()).min(len);
        let end = start.saturating_add(self.page_size.get()).min(len);
        (start, end)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page_number: 0, page_size: NonZeroUsize::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1) }
    }
}

/// Stable ascending sort on `order`, then cut out one page.
///
/// Records with equal keys keep their input order. A page past the end is empty.
#[must_use]
pub fn sort_and_page(
    records: &[PlayerRecord],
    page: PageRequest,
    order: PlayerOrder,
) -> Vec<PlayerRecord> {
    let mut ordered = records.iter().collect::<Vec<_>>();
    match order {
        PlayerOrder::Id => ordered.sort_by_key(|record| record.id),
        PlayerOrder::Name => ordered.sort_by(|lhs, rhs| lhs.profile.name.cmp(&rhs.profile.name)),
        PlayerOrder::Experience => ordered.sort_by_key(|record| record.profile.experience),
        PlayerOrder::Birthday => ordered.sort_by_key(|record| record.profile.birthday),
    }

    let (start, end) = page.bounds(ordered.len());
    ordered[start..end].iter().map(|&record| record.clone()).collect()
}
