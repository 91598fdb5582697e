//! Shared domain models.

use std::collections::{BTreeMap, BTreeSet};

use serde::de;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier of a roster entry.
pub type PlayerId = u64;

/// Game days a team gets when its configured count is missing or zero.
pub const DEFAULT_GAME_DAYS: usize = 5;
/// Upper bound on game days per team.
pub const MAX_GAME_DAYS: usize = 20;
/// Upper bound on the number of teams.
pub const MAX_TEAMS: usize = 4;
/// Team count of a fresh configuration.
pub const DEFAULT_TEAMS: usize = 2;

/// A roster entry shared by every team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Identifier, unique within the roster.
    pub id: PlayerId,
    /// Given name, possibly empty while the row is being filled in.
    #[serde(default)]
    pub first_name: String,
    /// Family name, possibly empty.
    #[serde(default)]
    pub last_name: String,
}

impl Player {
    /// Create a player with empty name fields.
    pub fn blank(id: PlayerId) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Full name as written into exports.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Name with `First`/`Last` placeholders for empty fields.
    pub fn display_name(&self) -> String {
        let first = if self.first_name.is_empty() {
            "First"
        } else {
            self.first_name.as_str()
        };
        let last = if self.last_name.is_empty() {
            "Last"
        } else {
            self.last_name.as_str()
        };
        format!("{first} {last}")
    }
}

/// Editable name field of a [`Player`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerField {
    FirstName,
    LastName,
}

/// Where a game day is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Home,
    Away,
}

impl Location {
    /// The opposite venue.
    pub fn toggled(self) -> Self {
        match self {
            Location::Home => Location::Away,
            Location::Away => Location::Home,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Location::Home => "Home",
            Location::Away => "Away",
        }
    }
}

/// One scheduled match slot of a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDay {
    /// 1-based position within the team.
    pub game_day: usize,
    /// ISO date, or empty when not scheduled yet.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub opponent: String,
    /// Attending players; membership only.
    #[serde(default)]
    pub players: BTreeSet<PlayerId>,
}

impl GameDay {
    /// Empty slot at the given 1-based position.
    pub fn new(game_day: usize) -> Self {
        Self {
            game_day,
            date: String::new(),
            location: Location::Home,
            opponent: String::new(),
            players: BTreeSet::new(),
        }
    }
}

/// Field edit applied to a single [`GameDay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameDayEdit {
    Date(String),
    Location(Location),
    Opponent(String),
}

impl GameDayEdit {
    /// Write the edit into the slot.
    pub fn apply_to(&self, day: &mut GameDay) {
        match self {
            GameDayEdit::Date(date) => day.date = date.clone(),
            GameDayEdit::Location(location) => day.location = *location,
            GameDayEdit::Opponent(opponent) => day.opponent = opponent.clone(),
        }
    }
}

/// Number of teams and the game-day count of each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    number_of_teams: usize,
    #[serde(default, deserialize_with = "deserialize_day_counts")]
    game_days_per_team: Vec<usize>,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            number_of_teams: DEFAULT_TEAMS,
            game_days_per_team: vec![DEFAULT_GAME_DAYS; DEFAULT_TEAMS],
        }
    }
}

impl TeamConfig {
    /// Build a configuration from raw per-team counts.
    pub fn new(number_of_teams: usize, game_days_per_team: Vec<usize>) -> Self {
        Self {
            number_of_teams,
            game_days_per_team,
        }
    }

    /// Effective team count, kept within `1..=MAX_TEAMS`.
    pub fn number_of_teams(&self) -> usize {
        self.number_of_teams.clamp(1, MAX_TEAMS)
    }

    /// Raw per-team counts as stored.
    pub fn game_days_per_team(&self) -> &[usize] {
        &self.game_days_per_team
    }

    /// Effective game-day count of the 1-based `team`; missing or zero entries
    /// fall back to [`DEFAULT_GAME_DAYS`].
    pub fn game_days_for(&self, team: usize) -> usize {
        team.checked_sub(1)
            .and_then(|index| self.game_days_per_team.get(index))
            .copied()
            .filter(|days| *days > 0)
            .map(|days| days.min(MAX_GAME_DAYS))
            .unwrap_or(DEFAULT_GAME_DAYS)
    }

    /// Copy with a new team count; every team goes back to
    /// [`DEFAULT_GAME_DAYS`].
    pub fn with_number_of_teams(&self, number_of_teams: usize) -> Self {
        let number_of_teams = number_of_teams.clamp(1, MAX_TEAMS);
        Self {
            number_of_teams,
            game_days_per_team: vec![DEFAULT_GAME_DAYS; number_of_teams],
        }
    }

    /// Copy with the 1-based `team` set to `days`, extending the sequence when
    /// the team has no entry yet.
    pub fn with_game_days(&self, team: usize, days: usize) -> Self {
        let mut next = self.clone();
        let Some(index) = team.checked_sub(1) else {
            return next;
        };
        if next.game_days_per_team.len() <= index {
            next.game_days_per_team.resize(index + 1, 0);
        }
        next.game_days_per_team[index] = days.min(MAX_GAME_DAYS);
        next
    }
}

fn deserialize_day_counts<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Option<usize>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|days| days.unwrap_or(0)).collect())
}

/// Wire key of the 1-based `team`.
pub fn team_key(team: usize) -> String {
    format!("team{team}")
}

/// Human-readable title of the 1-based `team`.
pub fn team_title(team: usize) -> String {
    format!("Team {team}")
}

/// Game-day schedules keyed by 1-based team number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamsState {
    teams: BTreeMap<usize, Vec<GameDay>>,
}

impl TeamsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Schedule of the 1-based `team`, if present.
    pub fn team(&self, team: usize) -> Option<&[GameDay]> {
        self.teams.get(&team).map(Vec::as_slice)
    }

    pub fn team_mut(&mut self, team: usize) -> Option<&mut Vec<GameDay>> {
        self.teams.get_mut(&team)
    }

    pub fn insert(&mut self, team: usize, schedule: Vec<GameDay>) {
        self.teams.insert(team, schedule);
    }

    /// Team numbers in ascending order.
    pub fn team_numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.teams.keys().copied()
    }

    /// `(team number, schedule)` pairs in ascending team order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[GameDay])> {
        self.teams
            .iter()
            .map(|(team, schedule)| (*team, schedule.as_slice()))
    }

    /// Every game day of every team.
    pub fn game_days(&self) -> impl Iterator<Item = &GameDay> {
        self.teams.values().flatten()
    }

    pub fn game_days_mut(&mut self) -> impl Iterator<Item = &mut GameDay> {
        self.teams.values_mut().flatten()
    }
}

impl Serialize for TeamsState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.teams.len()))?;
        for (team, schedule) in &self.teams {
            map.serialize_entry(&team_key(*team), schedule)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TeamsState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<String, Vec<GameDay>> = BTreeMap::deserialize(deserializer)?;
        let mut teams = BTreeMap::new();
        for (key, schedule) in raw {
            let team = key
                .strip_prefix("team")
                .and_then(|number| number.parse::<usize>().ok())
                .filter(|number| *number > 0)
                .ok_or_else(|| de::Error::custom(format!("invalid team key '{key}'")))?;
            teams.insert(team, schedule);
        }
        Ok(Self { teams })
    }
}
