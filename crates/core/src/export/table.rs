//! Tabular views of the tracker used by every export format.

use crate::{
    models::{team_title, GameDay, Player},
    participation::participation_summary,
    state::TrackerState,
};

/// Placeholder for an opponent or date that has not been entered.
pub const TBD: &str = "TBD";
/// Marker for a game day nobody is attending.
pub const NO_PLAYERS: &str = "No players";
/// Listing value for a game day without a date.
pub const DATE_NOT_SET: &str = "Not set";

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(usize),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Cell content as it would be printed.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(value) => value.clone(),
            Cell::Count(value) => value.to_string(),
        }
    }
}

/// A named grid of cells; the leading rows/columns are headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    pub header_rows: usize,
    pub header_columns: usize,
}

impl Sheet {
    /// Whether the cell at `row`/`column` belongs to a header.
    pub fn is_header(&self, row: usize, column: usize) -> bool {
        row < self.header_rows || column < self.header_columns
    }

    /// Number of columns of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// How each team is laid out in the combined spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeamSheetLayout {
    /// One row per game day.
    #[default]
    Listing,
    /// One column per game day, one row per attending player.
    Preview,
}

/// Roster with each player's total participation.
pub fn players_sheet(state: &TrackerState) -> Sheet {
    let mut rows = vec![vec![
        Cell::text("First Name"),
        Cell::text("Last Name"),
        Cell::text("Total Game Days"),
    ]];
    rows.extend(
        participation_summary(&state.players, &state.teams)
            .into_iter()
            .map(|(player, count)| {
                vec![
                    Cell::text(player.first_name.as_str()),
                    Cell::text(player.last_name.as_str()),
                    Cell::Count(count),
                ]
            }),
    );
    Sheet {
        name: "Players".to_string(),
        rows,
        header_rows: 1,
        header_columns: 0,
    }
}

/// One row per game day of `team`.
pub fn team_listing_sheet(state: &TrackerState, team: usize) -> Sheet {
    let mut rows = vec![vec![
        Cell::text("Game Day"),
        Cell::text("Date"),
        Cell::text("Location"),
        Cell::text("Opponent"),
        Cell::text("Players"),
    ]];
    for day in state.teams.team(team).unwrap_or_default() {
        let names = attendees(&state.players, day)
            .iter()
            .map(|player| player.full_name())
            .collect::<Vec<_>>()
            .join(", ");
        let date = if day.date.is_empty() {
            DATE_NOT_SET
        } else {
            day.date.as_str()
        };
        rows.push(vec![
            Cell::text(format!("Game Day {}", day.game_day)),
            Cell::text(date),
            Cell::text(day.location.label()),
            Cell::text(day.opponent.as_str()),
            Cell::text(names),
        ]);
    }
    Sheet {
        name: team_title(team),
        rows,
        header_rows: 1,
        header_columns: 0,
    }
}

/// Transposed view of `team`: labels down the first column, one column per
/// game day, and one row per attending player.
pub fn team_preview_sheet(state: &TrackerState, team: usize) -> Sheet {
    let schedule = state.teams.team(team).unwrap_or_default();
    let lineups: Vec<Vec<String>> = schedule
        .iter()
        .map(|day| {
            attendees(&state.players, day)
                .iter()
                .map(|player| player.full_name())
                .collect()
        })
        .collect();
    let player_rows = lineups.iter().map(Vec::len).max().unwrap_or(0).max(1);

    let mut matchday = vec![Cell::text("Matchday")];
    let mut opponent = vec![Cell::text("Opponent")];
    let mut date = vec![Cell::text("Date")];
    let mut location = vec![Cell::text("Location")];
    for day in schedule {
        matchday.push(Cell::text(format!("Matchday {}", day.game_day)));
        opponent.push(Cell::text(or_tbd(&day.opponent)));
        date.push(Cell::text(or_tbd(&day.date)));
        location.push(Cell::text(day.location.label()));
    }

    let mut rows = vec![matchday, opponent, date, location];
    for slot in 0..player_rows {
        let label = if slot == 0 { "Players" } else { "" };
        let mut row = vec![Cell::text(label)];
        for lineup in &lineups {
            let value = match lineup.get(slot) {
                Some(name) => name.as_str(),
                None if slot == 0 && lineup.is_empty() => NO_PLAYERS,
                None => "",
            };
            row.push(Cell::text(value));
        }
        rows.push(row);
    }

    Sheet {
        name: team_title(team),
        rows,
        header_rows: 1,
        header_columns: 1,
    }
}

/// The full combined workbook: roster first, then one sheet per team.
pub fn workbook_sheets(state: &TrackerState, layout: TeamSheetLayout) -> Vec<Sheet> {
    let mut sheets = vec![players_sheet(state)];
    sheets.extend(state.teams.team_numbers().map(|team| match layout {
        TeamSheetLayout::Listing => team_listing_sheet(state, team),
        TeamSheetLayout::Preview => team_preview_sheet(state, team),
    }));
    sheets
}

/// Attending players in roster order.
fn attendees<'a>(players: &'a [Player], day: &GameDay) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|player| day.players.contains(&player.id))
        .collect()
}

fn or_tbd(value: &str) -> &str {
    if value.trim().is_empty() {
        TBD
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{GameDayEdit, Location, PlayerField},
        state::Mutation,
    };

    fn texts(row: &[Cell]) -> Vec<String> {
        row.iter().map(Cell::display).collect()
    }

    fn sample_state() -> TrackerState {
        let mutations = [
            Mutation::UpdatePlayer {
                id: 1,
                field: PlayerField::FirstName,
                value: "Ana".to_string(),
            },
            Mutation::UpdatePlayer {
                id: 1,
                field: PlayerField::LastName,
                value: "Silva".to_string(),
            },
            Mutation::AddPlayer { id: 2 },
            Mutation::UpdatePlayer {
                id: 2,
                field: PlayerField::FirstName,
                value: "Ben".to_string(),
            },
            Mutation::UpdatePlayer {
                id: 2,
                field: PlayerField::LastName,
                value: "Cole".to_string(),
            },
            Mutation::SetGameDays { team: 1, days: 3 },
            Mutation::UpdateGameDay {
                team: 1,
                index: 0,
                edit: GameDayEdit::Opponent("Rovers".to_string()),
            },
            Mutation::UpdateGameDay {
                team: 1,
                index: 0,
                edit: GameDayEdit::Date("2024-09-01".to_string()),
            },
            Mutation::UpdateGameDay {
                team: 1,
                index: 1,
                edit: GameDayEdit::Location(Location::Away),
            },
            Mutation::TogglePlayer {
                team: 1,
                index: 0,
                player: 2,
            },
            Mutation::TogglePlayer {
                team: 1,
                index: 0,
                player: 1,
            },
            Mutation::TogglePlayer {
                team: 1,
                index: 1,
                player: 2,
            },
        ];
        mutations
            .iter()
            .fold(TrackerState::default(), |state, mutation| {
                state.apply(mutation).unwrap_or(state)
            })
    }

    #[test]
    fn players_sheet_counts_participation() {
        let sheet = players_sheet(&sample_state());
        assert_eq!(sheet.name, "Players");
        assert_eq!(
            texts(&sheet.rows[0]),
            vec!["First Name", "Last Name", "Total Game Days"]
        );
        assert_eq!(sheet.rows[1][2], Cell::Count(1));
        assert_eq!(sheet.rows[2][2], Cell::Count(2));
    }

    #[test]
    fn listing_joins_names_in_roster_order() {
        let sheet = team_listing_sheet(&sample_state(), 1);
        assert_eq!(sheet.name, "Team 1");
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(
            texts(&sheet.rows[1]),
            vec!["Game Day 1", "2024-09-01", "Home", "Rovers", "Ana Silva, Ben Cole"]
        );
        assert_eq!(
            texts(&sheet.rows[3]),
            vec!["Game Day 3", "Not set", "Home", "", ""]
        );
    }

    #[test]
    fn preview_transposes_and_marks_gaps() {
        let sheet = team_preview_sheet(&sample_state(), 1);
        assert_eq!(
            texts(&sheet.rows[0]),
            vec!["Matchday", "Matchday 1", "Matchday 2", "Matchday 3"]
        );
        assert_eq!(texts(&sheet.rows[1]), vec!["Opponent", "Rovers", "TBD", "TBD"]);
        assert_eq!(texts(&sheet.rows[2]), vec!["Date", "2024-09-01", "TBD", "TBD"]);
        assert_eq!(texts(&sheet.rows[3]), vec!["Location", "Home", "Away", "Home"]);
        assert_eq!(
            texts(&sheet.rows[4]),
            vec!["Players", "Ana Silva", "Ben Cole", "No players"]
        );
        assert_eq!(texts(&sheet.rows[5]), vec!["", "Ben Cole", "", ""]);
        assert_eq!(sheet.rows.len(), 6);
        assert!(sheet.is_header(0, 2));
        assert!(sheet.is_header(4, 0));
        assert!(!sheet.is_header(4, 1));
    }

    #[test]
    fn preview_without_attendance_has_single_player_row() {
        let state = TrackerState::default();
        let sheet = team_preview_sheet(&state, 2);
        assert_eq!(sheet.rows.len(), 5);
        assert!(sheet.rows[4][1..]
            .iter()
            .all(|cell| cell.display() == NO_PLAYERS));
    }

    #[test]
    fn workbook_has_players_then_each_team() {
        let names: Vec<_> = workbook_sheets(&sample_state(), TeamSheetLayout::Listing)
            .into_iter()
            .map(|sheet| sheet.name)
            .collect();
        assert_eq!(names, vec!["Players", "Team 1", "Team 2"]);
    }
}
