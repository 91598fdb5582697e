//! Attendance counts derived from team schedules.

use crate::models::{Player, PlayerId, TeamsState};

/// Number of game days, across every team, that `player` attends.
pub fn calculate_participation(teams: &TeamsState, player: PlayerId) -> usize {
    teams
        .game_days()
        .filter(|day| day.players.contains(&player))
        .count()
}

/// Each player paired with their participation, in roster order.
pub fn participation_summary<'a>(
    players: &'a [Player],
    teams: &TeamsState,
) -> Vec<(&'a Player, usize)> {
    players
        .iter()
        .map(|player| (player, calculate_participation(teams, player.id)))
        .collect()
}
