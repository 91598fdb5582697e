//! Roster mutations: id allocation, cascading delete and reordering.

use chrono::{DateTime, Utc};

use crate::models::{Player, PlayerId, TeamsState};

/// Allocate an id derived from `now` in milliseconds, moved past the largest
/// id already in the roster so it never collides.
pub fn next_player_id(players: &[Player], now: DateTime<Utc>) -> PlayerId {
    let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = players
        .iter()
        .map(|player| player.id.saturating_add(1))
        .max()
        .unwrap_or(1);
    stamp.max(floor)
}

/// Remove the player and every attendance mark referencing it.
///
/// Returns `None` when no player has the id.
pub fn delete_player(
    players: &[Player],
    teams: &TeamsState,
    id: PlayerId,
) -> Option<(Vec<Player>, TeamsState)> {
    if !players.iter().any(|player| player.id == id) {
        return None;
    }
    let remaining = players
        .iter()
        .filter(|player| player.id != id)
        .cloned()
        .collect();
    let mut teams = teams.clone();
    for day in teams.game_days_mut() {
        day.players.remove(&id);
    }
    Some((remaining, teams))
}

/// Move the player `from` into the slot currently held by `to`, shifting the
/// players in between by one.
///
/// Returns `None` when the ids are equal or either is missing.
pub fn reorder(players: &[Player], from: PlayerId, to: PlayerId) -> Option<Vec<Player>> {
    if from == to {
        return None;
    }
    let old_index = players.iter().position(|player| player.id == from)?;
    let new_index = players.iter().position(|player| player.id == to)?;
    let mut next = players.to_vec();
    let moved = next.remove(old_index);
    next.insert(new_index, moved);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameDay;
    use chrono::TimeZone;

    fn roster(ids: &[PlayerId]) -> Vec<Player> {
        ids.iter().copied().map(Player::blank).collect()
    }

    fn ids(players: &[Player]) -> Vec<PlayerId> {
        players.iter().map(|player| player.id).collect()
    }

    #[test]
    fn delete_cascades_into_game_days() {
        let players = roster(&[1, 2]);
        let mut day = GameDay::new(1);
        day.players.extend([1, 2]);
        let mut teams = TeamsState::new();
        teams.insert(1, vec![day]);

        let (players, teams) = delete_player(&players, &teams, 1).expect("player exists");
        assert_eq!(ids(&players), vec![2]);
        let remaining: Vec<_> = teams.game_days().flat_map(|d| d.players.iter().copied()).collect();
        assert_eq!(remaining, vec![2]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let players = roster(&[1]);
        assert!(delete_player(&players, &TeamsState::new(), 9).is_none());
    }

    #[test]
    fn reorder_moves_to_target_slot() {
        let players = roster(&[1, 2, 3]);
        let moved = reorder(&players, 1, 3).expect("ids exist");
        assert_eq!(ids(&moved), vec![2, 3, 1]);

        let back = reorder(&moved, 1, 2).expect("ids exist");
        assert_eq!(ids(&back), vec![1, 2, 3]);
    }

    #[test]
    fn reorder_same_or_missing_id_is_noop() {
        let players = roster(&[1, 2]);
        assert!(reorder(&players, 2, 2).is_none());
        assert!(reorder(&players, 2, 8).is_none());
    }

    #[test]
    fn ids_follow_clock_but_never_collide() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(next_player_id(&roster(&[1]), now), 1_700_000_000_000);

        let ahead = roster(&[1_700_000_000_000]);
        assert_eq!(next_player_id(&ahead, now), 1_700_000_000_001);
    }
}
