use std::collections::BTreeMap;

use crate::{PlayerId, PlayerProfile, PlayerRecord, RosterError};

/// Persistence boundary for player records.
///
/// Implementations own id assignment and any write serialization; callers treat
/// every `fetch_all` as a fresh, consistent snapshot.
pub trait PlayerStore {
    /// All stored players in ascending id order.
    ///
    /// # Errors
    /// Returns [`RosterError::Store`] when the backing store cannot be read.
    fn fetch_all(&self) -> Result<Vec<PlayerRecord>, RosterError>;

    /// # Errors
    /// Returns [`RosterError::Store`] when the backing store cannot be read.
    fn fetch_by_id(&self, id: PlayerId) -> Result<Option<PlayerRecord>, RosterError>;

    /// Insert `profile` under a fresh id when `id` is `None`, otherwise upsert it under `id`.
    ///
    /// # Errors
    /// Returns [`RosterError::Store`] when the write fails.
    fn save(
        &mut self,
        id: Option<PlayerId>,
        profile: &PlayerProfile,
    ) -> Result<PlayerRecord, RosterError>;

    /// # Errors
    /// Returns [`RosterError::Store`] when the delete fails.
    fn delete_by_id(&mut self, id: PlayerId) -> Result<(), RosterError>;
}

/// Ordered in-memory store. Ids are never reused, even after deletes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: BTreeMap<PlayerId, PlayerProfile>,
    last_id: i64,
}

impl MemoryStore {
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl PlayerStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<PlayerRecord>, RosterError> {
        Ok(self
            .players
            .iter()
            .map(|(id, profile)| PlayerRecord { id: *id, profile: profile.clone() })
            .collect())
    }

    fn fetch_by_id(&self, id: PlayerId) -> Result<Option<PlayerRecord>, RosterError> {
        Ok(self.players.get(&id).map(|profile| PlayerRecord { id, profile: profile.clone() }))
    }

    fn save(
        &mut self,
        id: Option<PlayerId>,
        profile: &PlayerProfile,
    ) -> Result<PlayerRecord, RosterError> {
        profile.validate()?;
        let id = match id {
            Some(id) => id,
            None => PlayerId(self.last_id + 1),
        };
        self.last_id = self.last_id.max(id.0);
        self.players.insert(id, profile.clone());
        Ok(PlayerRecord { id, profile: profile.clone() })
    }

    fn delete_by_id(&mut self, id: PlayerId) -> Result<(), RosterError> {
        self.players.remove(&id);
        Ok(())
    }
}
