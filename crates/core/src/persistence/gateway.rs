use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use super::KeyValueStore;
use crate::{
    models::{Player, PlayerId, TeamConfig, TeamsState},
    reconcile::reconcile,
    state::{default_players, StorageKey, TrackerState},
};

/// Reads and writes [`TrackerState`] through a key-value backend.
///
/// Failures never reach the caller: unreadable keys fall back to their
/// defaults and failed writes are logged.
#[derive(Debug)]
pub struct Gateway<B> {
    backend: B,
}

impl<B: KeyValueStore> Gateway<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Restore the stored state, substituting defaults key by key.
    pub fn load(&self) -> TrackerState {
        let players: Vec<Player> = self
            .read(StorageKey::Players)
            .unwrap_or_else(default_players);
        let config: TeamConfig = self.read(StorageKey::Config).unwrap_or_default();
        let stored: TeamsState = self.read(StorageKey::Teams).unwrap_or_default();
        let dark_mode: bool = self.read(StorageKey::Theme).unwrap_or(false);

        let mut teams = reconcile(&stored, &config);
        let dropped = retain_roster_attendance(&mut teams, &players);
        if dropped > 0 {
            warn!(dropped, "Dropped attendance of players missing from the roster");
        }
        info!(
            players = players.len(),
            teams = teams.len(),
            dark_mode,
            "Tracker state loaded"
        );
        TrackerState {
            players,
            config,
            teams,
            dark_mode,
        }
    }

    /// Write the given slots of `state`.
    pub fn save(&self, state: &TrackerState, keys: &[StorageKey]) {
        for key in keys {
            if let Err(err) = self.write(state, *key) {
                error!(key = key.as_str(), ?err, "Failed to persist tracker state");
            }
        }
    }

    /// Remove every slot from the backend.
    pub fn clear(&self) {
        for key in StorageKey::ALL {
            if let Err(err) = self.backend.remove(key.as_str()) {
                error!(key = key.as_str(), ?err, "Failed to clear stored key");
            }
        }
        info!("Stored tracker data cleared");
    }

    fn read<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.backend.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = key.as_str(), "No stored value; using default");
                return None;
            }
            Err(err) => {
                warn!(key = key.as_str(), ?err, "Failed to read stored value; using default");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = key.as_str(), %err, "Failed to parse stored value; using default");
                None
            }
        }
    }

    fn write(&self, state: &TrackerState, key: StorageKey) -> Result<()> {
        let serialized = match key {
            StorageKey::Players => serde_json::to_string(&state.players),
            StorageKey::Config => serde_json::to_string(&state.config),
            StorageKey::Teams => serde_json::to_string(&state.teams),
            StorageKey::Theme => serde_json::to_string(&state.dark_mode),
        }
        .with_context(|| format!("failed to serialize {}", key.as_str()))?;
        self.backend
            .set(key.as_str(), &serialized)
            .with_context(|| format!("failed to store {}", key.as_str()))
    }
}

/// Remove attendance entries whose player is not in `players`; returns how
/// many were removed.
fn retain_roster_attendance(teams: &mut TeamsState, players: &[Player]) -> usize {
    let roster: BTreeSet<PlayerId> = players.iter().map(|player| player.id).collect();
    let mut dropped = 0;
    for day in teams.game_days_mut() {
        let before = day.players.len();
        day.players.retain(|id| roster.contains(id));
        dropped += before - day.players.len();
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{GameDayEdit, Location},
        participation::calculate_participation,
        persistence::{FileStore, MemoryStore},
        state::Mutation,
    };
    use tempfile::tempdir;

    fn edited_state() -> TrackerState {
        let mutations = [
            Mutation::AddPlayer { id: 22 },
            Mutation::SetNumberOfTeams(3),
            Mutation::SetGameDays { team: 3, days: 2 },
            Mutation::UpdateGameDay {
                team: 3,
                index: 1,
                edit: GameDayEdit::Location(Location::Away),
            },
            Mutation::TogglePlayer {
                team: 3,
                index: 1,
                player: 22,
            },
            Mutation::ToggleTheme,
        ];
        mutations
            .iter()
            .fold(TrackerState::default(), |state, mutation| {
                state.apply(mutation).unwrap_or(state)
            })
    }

    #[test]
    fn empty_backend_loads_defaults() {
        let gateway = Gateway::new(MemoryStore::new());
        assert_eq!(gateway.load(), TrackerState::default());
    }

    #[test]
    fn round_trip_through_memory() {
        let gateway = Gateway::new(MemoryStore::new());
        let state = edited_state();
        gateway.save(&state, &StorageKey::ALL);
        assert_eq!(gateway.backend().len(), 4);
        assert_eq!(gateway.load(), state);
    }

    #[test]
    fn round_trip_through_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let state = edited_state();
        Gateway::new(FileStore::new(dir.path())).save(&state, &StorageKey::ALL);

        let reopened = Gateway::new(FileStore::new(dir.path()));
        assert_eq!(reopened.load(), state);
        Ok(())
    }

    #[test]
    fn corrupt_keys_fall_back_independently() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.set(StorageKey::Players.as_str(), "{not json")?;
        store.set(
            StorageKey::Config.as_str(),
            r#"{"numberOfTeams":1,"gameDaysPerTeam":[3]}"#,
        )?;
        store.set(StorageKey::Theme.as_str(), "true")?;

        let state = Gateway::new(store).load();
        assert_eq!(state.players, default_players());
        assert_eq!(state.config.number_of_teams(), 1);
        assert_eq!(state.teams.team(1).map(<[_]>::len), Some(3));
        assert!(state.dark_mode);
        Ok(())
    }

    #[test]
    fn stored_teams_are_reconciled_against_config() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.set(
            StorageKey::Config.as_str(),
            r#"{"numberOfTeams":2,"gameDaysPerTeam":[2,1]}"#,
        )?;
        store.set(
            StorageKey::Teams.as_str(),
            r#"{"team1":[
                {"gameDay":1,"date":"2024-05-01","location":"Away","opponent":"North","players":[1]},
                {"gameDay":2,"date":"","location":"Home","opponent":"","players":[]}
            ]}"#,
        )?;

        let state = Gateway::new(store).load();
        let team1 = state.teams.team(1).unwrap_or_default();
        assert_eq!(team1[0].opponent, "North");
        assert_eq!(state.teams.team(2).map(<[_]>::len), Some(1));
        Ok(())
    }

    #[test]
    fn attendance_of_unknown_players_is_dropped_on_load() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.set(StorageKey::Players.as_str(), "{corrupt")?;
        store.set(
            StorageKey::Teams.as_str(),
            r#"{"team1":[
                {"gameDay":1,"date":"","location":"Home","opponent":"","players":[5,1]}
            ]}"#,
        )?;

        let state = Gateway::new(store).load();
        assert_eq!(state.players, default_players());
        let referenced: BTreeSet<PlayerId> = state
            .teams
            .game_days()
            .flat_map(|day| day.players.iter().copied())
            .collect();
        assert_eq!(referenced, BTreeSet::from([1]));
        assert_eq!(calculate_participation(&state.teams, 5), 0);
        Ok(())
    }

    #[test]
    fn clear_removes_every_key() {
        let gateway = Gateway::new(MemoryStore::new());
        gateway.save(&edited_state(), &StorageKey::ALL);
        gateway.clear();
        assert!(gateway.backend().is_empty());
    }
}
