//! Immutable tracker snapshots and the mutations that produce them.

use serde::{Deserialize, Serialize};

use crate::{
    models::{GameDayEdit, Player, PlayerField, PlayerId, TeamConfig, TeamsState, MAX_TEAMS},
    reconcile::reconcile,
    roster,
};

/// Storage slot of one part of the tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Players,
    Config,
    Teams,
    Theme,
}

impl StorageKey {
    /// Every slot, in the order they are written.
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Players,
        StorageKey::Config,
        StorageKey::Teams,
        StorageKey::Theme,
    ];

    /// Key under which the slot is persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Players => "player-tracker-players",
            StorageKey::Config => "player-tracker-config",
            StorageKey::Teams => "player-tracker-teams",
            StorageKey::Theme => "player-tracker-theme",
        }
    }
}

/// A single user intent against the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Append an empty player with the given id.
    AddPlayer { id: PlayerId },
    UpdatePlayer {
        id: PlayerId,
        field: PlayerField,
        value: String,
    },
    /// Remove a player and its attendance marks.
    DeletePlayer { id: PlayerId },
    /// Move `from` into the slot held by `to`.
    ReorderPlayers { from: PlayerId, to: PlayerId },
    UpdateGameDay {
        team: usize,
        index: usize,
        edit: GameDayEdit,
    },
    /// Flip attendance of `player` on one game day.
    TogglePlayer {
        team: usize,
        index: usize,
        player: PlayerId,
    },
    SetNumberOfTeams(usize),
    SetGameDays { team: usize, days: usize },
    ToggleTheme,
}

impl Mutation {
    /// Storage slots that change when the mutation applies.
    pub fn touched_keys(&self) -> &'static [StorageKey] {
        match self {
            Mutation::AddPlayer { .. }
            | Mutation::UpdatePlayer { .. }
            | Mutation::ReorderPlayers { .. } => &[StorageKey::Players],
            Mutation::DeletePlayer { .. } => &[StorageKey::Players, StorageKey::Teams],
            Mutation::UpdateGameDay { .. } | Mutation::TogglePlayer { .. } => {
                &[StorageKey::Teams]
            }
            Mutation::SetNumberOfTeams(_) | Mutation::SetGameDays { .. } => {
                &[StorageKey::Config, StorageKey::Teams]
            }
            Mutation::ToggleTheme => &[StorageKey::Theme],
        }
    }
}

/// Everything the tracker knows at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub players: Vec<Player>,
    pub config: TeamConfig,
    pub teams: TeamsState,
    pub dark_mode: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        let config = TeamConfig::default();
        let teams = reconcile(&TeamsState::new(), &config);
        Self {
            players: default_players(),
            config,
            teams,
            dark_mode: false,
        }
    }
}

/// Roster of a fresh tracker: a single empty row.
pub fn default_players() -> Vec<Player> {
    vec![Player::blank(1)]
}

impl TrackerState {
    /// Produce the snapshot that follows `mutation`, or `None` when the
    /// mutation does not apply to this state.
    pub fn apply(&self, mutation: &Mutation) -> Option<TrackerState> {
        let mut next = self.clone();
        match mutation {
            Mutation::AddPlayer { id } => {
                if self.player(*id).is_some() {
                    return None;
                }
                next.players.push(Player::blank(*id));
            }
            Mutation::UpdatePlayer { id, field, value } => {
                let player = next.players.iter_mut().find(|player| player.id == *id)?;
                match field {
                    PlayerField::FirstName => player.first_name = value.clone(),
                    PlayerField::LastName => player.last_name = value.clone(),
                }
            }
            Mutation::DeletePlayer { id } => {
                let (players, teams) = roster::delete_player(&self.players, &self.teams, *id)?;
                next.players = players;
                next.teams = teams;
            }
            Mutation::ReorderPlayers { from, to } => {
                next.players = roster::reorder(&self.players, *from, *to)?;
            }
            Mutation::UpdateGameDay { team, index, edit } => {
                let day = next.teams.team_mut(*team)?.get_mut(*index)?;
                edit.apply_to(day);
            }
            Mutation::TogglePlayer {
                team,
                index,
                player,
            } => {
                if self.player(*player).is_none() {
                    return None;
                }
                let day = next.teams.team_mut(*team)?.get_mut(*index)?;
                if !day.players.remove(player) {
                    day.players.insert(*player);
                }
            }
            Mutation::SetNumberOfTeams(count) => {
                if (*count).clamp(1, MAX_TEAMS) == self.config.number_of_teams() {
                    return None;
                }
                next.config = self.config.with_number_of_teams(*count);
                next.teams = reconcile(&self.teams, &next.config);
            }
            Mutation::SetGameDays { team, days } => {
                if *team == 0 || *team > self.config.number_of_teams() {
                    return None;
                }
                next.config = self.config.with_game_days(*team, *days);
                next.teams = reconcile(&self.teams, &next.config);
            }
            Mutation::ToggleTheme => next.dark_mode = !self.dark_mode,
        }
        Some(next)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{Location, DEFAULT_GAME_DAYS},
        participation::calculate_participation,
    };

    #[test]
    fn default_state_has_two_five_day_teams() {
        let state = TrackerState::default();
        assert_eq!(state.players, vec![Player::blank(1)]);
        assert_eq!(state.teams.len(), 2);
        for (_, schedule) in state.teams.iter() {
            assert_eq!(schedule.len(), DEFAULT_GAME_DAYS);
        }
        assert!(!state.dark_mode);
    }

    #[test]
    fn toggle_adds_then_removes_attendance() {
        let state = TrackerState::default();
        let toggle = Mutation::TogglePlayer {
            team: 1,
            index: 2,
            player: 1,
        };
        let marked = state.apply(&toggle).expect("toggle applies");
        assert_eq!(calculate_participation(&marked.teams, 1), 1);
        let cleared = marked.apply(&toggle).expect("toggle applies");
        assert_eq!(calculate_participation(&cleared.teams, 1), 0);
    }

    #[test]
    fn toggle_unknown_player_is_rejected() {
        let state = TrackerState::default();
        let toggle = Mutation::TogglePlayer {
            team: 1,
            index: 0,
            player: 42,
        };
        assert!(state.apply(&toggle).is_none());
    }

    #[test]
    fn game_day_edits_are_bounds_checked() {
        let state = TrackerState::default();
        let edit = Mutation::UpdateGameDay {
            team: 2,
            index: 4,
            edit: GameDayEdit::Location(Location::Away),
        };
        let next = state.apply(&edit).expect("slot exists");
        assert_eq!(next.teams.team(2).map(|s| s[4].location), Some(Location::Away));

        let out_of_range = Mutation::UpdateGameDay {
            team: 3,
            index: 0,
            edit: GameDayEdit::Opponent("Nobody".to_string()),
        };
        assert!(state.apply(&out_of_range).is_none());
    }

    #[test]
    fn resizing_one_team_keeps_the_other() {
        let state = TrackerState::default()
            .apply(&Mutation::UpdateGameDay {
                team: 1,
                index: 0,
                edit: GameDayEdit::Opponent("Harbour FC".to_string()),
            })
            .expect("slot exists");
        let next = state
            .apply(&Mutation::SetGameDays { team: 2, days: 7 })
            .expect("team exists");
        assert_eq!(next.config.game_days_per_team(), &[5, 7]);
        assert_eq!(next.teams.team(1), state.teams.team(1));
        assert_eq!(next.teams.team(2).map(<[_]>::len), Some(7));
    }

    #[test]
    fn changing_team_count_resets_every_schedule() {
        let longer = TrackerState::default()
            .apply(&Mutation::SetGameDays { team: 1, days: 7 })
            .expect("team exists");
        assert_eq!(longer.teams.team(1).map(<[_]>::len), Some(7));

        let next = longer
            .apply(&Mutation::SetNumberOfTeams(3))
            .expect("count changes");
        assert_eq!(next.teams.len(), 3);
        assert_eq!(next.config.game_days_per_team(), &[5, 5, 5]);
        assert_eq!(next.teams.team(1).map(<[_]>::len), Some(DEFAULT_GAME_DAYS));
    }

    #[test]
    fn unchanged_team_count_does_not_apply() {
        let full = TrackerState::default()
            .apply(&Mutation::SetNumberOfTeams(MAX_TEAMS))
            .expect("count changes");
        assert!(full.apply(&Mutation::SetNumberOfTeams(MAX_TEAMS + 1)).is_none());
        assert!(full.apply(&Mutation::SetNumberOfTeams(MAX_TEAMS)).is_none());
        assert!(TrackerState::default()
            .apply(&Mutation::SetNumberOfTeams(0))
            .is_some());
    }

    #[test]
    fn update_player_edits_single_field() {
        let next = TrackerState::default()
            .apply(&Mutation::UpdatePlayer {
                id: 1,
                field: PlayerField::LastName,
                value: "Okafor".to_string(),
            })
            .expect("player exists");
        assert_eq!(next.players[0].last_name, "Okafor");
        assert_eq!(next.players[0].first_name, "");
    }

    #[test]
    fn duplicate_ids_are_not_added() {
        let state = TrackerState::default();
        assert!(state.apply(&Mutation::AddPlayer { id: 1 }).is_none());
        let next = state.apply(&Mutation::AddPlayer { id: 2 }).expect("fresh id");
        assert_eq!(next.players.len(), 2);
    }
}
