//! Keeps team schedules in shape with the team configuration.

use crate::models::{GameDay, TeamConfig, TeamsState};

/// Build the schedules for `config` out of the existing `teams`.
///
/// A team whose length already matches its configured count is carried over
/// untouched. Any other team is regenerated: each surviving slot keeps only
/// its attending players, while date, opponent and location go back to their
/// defaults and `gameDay` is renumbered from 1. Teams beyond the configured
/// count are dropped.
pub fn reconcile(teams: &TeamsState, config: &TeamConfig) -> TeamsState {
    let mut next = TeamsState::new();
    for team in 1..=config.number_of_teams() {
        let desired = config.game_days_for(team);
        let existing = teams.team(team);
        let schedule = match existing {
            Some(schedule) if schedule.len() == desired => schedule.to_vec(),
            _ => regenerate(existing.unwrap_or_default(), desired),
        };
        next.insert(team, schedule);
    }
    next
}

/// Fresh schedule of `length` empty slots.
pub fn default_schedule(length: usize) -> Vec<GameDay> {
    regenerate(&[], length)
}

fn regenerate(existing: &[GameDay], length: usize) -> Vec<GameDay> {
    (0..length)
        .map(|index| {
            let mut day = GameDay::new(index + 1);
            if let Some(previous) = existing.get(index) {
                day.players = previous.players.clone();
            }
            day
        })
        .collect()
}
