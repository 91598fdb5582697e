use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gameday_core::{
    calculate_participation,
    models::{team_title, MAX_GAME_DAYS},
    Exporter, GameDayEdit, KeyValueStore, Mutation, PlayerField, PlayerId, Store, TrackerState,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::theme::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_INPUT_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Roster,
    Team(usize),
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeamFocus {
    Days,
    Players,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptTarget {
    Player { id: PlayerId, field: PlayerField },
    Date { team: usize, index: usize },
    Opponent { team: usize, index: usize },
}

impl PromptTarget {
    fn title(&self) -> &'static str {
        match self {
            PromptTarget::Player {
                field: PlayerField::FirstName,
                ..
            } => "First Name",
            PromptTarget::Player {
                field: PlayerField::LastName,
                ..
            } => "Last Name",
            PromptTarget::Date { .. } => "Date (YYYY-MM-DD)",
            PromptTarget::Opponent { .. } => "Opponent",
        }
    }

    fn into_mutation(self, value: String) -> Mutation {
        match self {
            PromptTarget::Player { id, field } => Mutation::UpdatePlayer { id, field, value },
            PromptTarget::Date { team, index } => Mutation::UpdateGameDay {
                team,
                index,
                edit: GameDayEdit::Date(value),
            },
            PromptTarget::Opponent { team, index } => Mutation::UpdateGameDay {
                team,
                index,
                edit: GameDayEdit::Opponent(value),
            },
        }
    }
}

/// Single-line text input shown as a modal.
#[derive(Debug, Clone)]
struct TextPrompt {
    input: String,
    cursor: usize,
    target: PromptTarget,
}

impl TextPrompt {
    fn new(target: PromptTarget, initial: &str) -> Self {
        Self {
            input: initial.to_string(),
            cursor: initial.chars().count(),
            target,
        }
    }

    fn len(&self) -> usize {
        self.input.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.input.len())
    }

    fn move_cursor(&mut self, delta: isize) {
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, self.len() as isize) as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.len();
    }

    fn insert(&mut self, ch: char) {
        if self.len() >= MAX_INPUT_LEN || ch.is_control() {
            return;
        }
        let index = self.byte_index();
        self.input.insert(index, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index();
            self.input.remove(index);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.len() {
            let index = self.byte_index();
            self.input.remove(index);
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal frontend over a tracker [`Store`].
pub struct TrackerApp<B: KeyValueStore> {
    store: Store<B>,
    snapshot: watch::Receiver<Arc<TrackerState>>,
    exporter: Exporter,
    screen: Screen,
    roster_cursor: usize,
    day_cursor: usize,
    player_cursor: usize,
    settings_cursor: usize,
    team_focus: TeamFocus,
    prompt: Option<TextPrompt>,
    confirm_clear: bool,
    status: String,
    should_quit: bool,
}

impl<B: KeyValueStore> TrackerApp<B> {
    pub fn new(store: Store<B>, exporter: Exporter) -> Self {
        let snapshot = store.subscribe();
        Self {
            store,
            snapshot,
            exporter,
            screen: Screen::Roster,
            roster_cursor: 0,
            day_cursor: 0,
            player_cursor: 0,
            settings_cursor: 0,
            team_focus: TeamFocus::Days,
            prompt: None,
            confirm_clear: false,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => {
                    if let Err(err) = self.handle_input(event) {
                        error!(?err, "Action failed");
                        self.set_status(format!("Error: {err}"));
                    }
                }
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        self.store.close();
        info!("Tracker closed");
        Ok(())
    }

    fn state(&self) -> Arc<TrackerState> {
        Arc::clone(&self.snapshot.borrow())
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn screens(state: &TrackerState) -> Vec<Screen> {
        let mut screens = vec![Screen::Roster];
        screens.extend(state.teams.team_numbers().map(Screen::Team));
        screens.push(Screen::Settings);
        screens
    }

    fn switch_screen(&mut self, delta: isize) {
        let screens = Self::screens(&self.state());
        let current = screens
            .iter()
            .position(|screen| *screen == self.screen)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(screens.len() as isize) as usize;
        self.screen = screens[next];
        self.day_cursor = 0;
        self.player_cursor = 0;
        self.team_focus = TeamFocus::Days;
    }

    /// Keep cursors and the active screen inside the current snapshot.
    fn clamp_to_state(&mut self) {
        let state = self.state();
        if let Screen::Team(team) = self.screen {
            if state.teams.team(team).is_none() {
                self.screen = Screen::Settings;
            }
        }
        self.roster_cursor = self.roster_cursor.min(state.players.len().saturating_sub(1));
        self.player_cursor = self.player_cursor.min(state.players.len().saturating_sub(1));
        if let Screen::Team(team) = self.screen {
            let days = state.teams.team(team).map(<[_]>::len).unwrap_or(0);
            self.day_cursor = self.day_cursor.min(days.saturating_sub(1));
        }
        self.settings_cursor = self
            .settings_cursor
            .min(state.config.number_of_teams());
    }

    fn dispatch(&mut self, mutation: Mutation) -> bool {
        let applied = self.store.dispatch(mutation);
        self.clamp_to_state();
        applied
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return Ok(());
        }
        if self.confirm_clear {
            self.handle_confirm_key(key);
            return Ok(());
        }
        if self.handle_global_shortcut(&key)? {
            return Ok(());
        }
        match self.screen {
            Screen::Roster => self.handle_roster_key(key),
            Screen::Team(team) => self.handle_team_key(team, key)?,
            Screen::Settings => self.handle_settings_key(key),
        }
        Ok(())
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> Result<bool> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(true);
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.switch_screen(1),
            KeyCode::BackTab => self.switch_screen(-1),
            KeyCode::Char('T') => {
                self.dispatch(Mutation::ToggleTheme);
                let mode = if self.state().dark_mode { "dark" } else { "light" };
                self.set_status(format!("Switched to {mode} mode"));
            }
            KeyCode::Char('x') => {
                let path = self.exporter.export_workbook(&self.state())?;
                self.set_status(format!("Exported {}", path.display()));
            }
            KeyCode::Char('C') => {
                self.confirm_clear = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.clear_all();
                self.screen = Screen::Roster;
                self.clamp_to_state();
                self.set_status("All data cleared");
            }
            _ => self.set_status("Clear cancelled"),
        }
        self.confirm_clear = false;
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.set_status("Edit cancelled");
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    let title = prompt.target.title();
                    if self.dispatch(prompt.target.into_mutation(prompt.input)) {
                        self.set_status(format!("{title} updated"));
                    }
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => prompt.insert(ch),
            _ => {}
        }
    }

    fn handle_roster_key(&mut self, key: KeyEvent) {
        let state = self.state();
        let selected = state.players.get(self.roster_cursor).map(|player| player.id);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.roster_cursor =
                    (self.roster_cursor + 1).min(state.players.len().saturating_sub(1));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.roster_cursor = self.roster_cursor.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.store.add_player();
                self.roster_cursor = self.state().players.len().saturating_sub(1);
                self.set_status("Player added");
            }
            KeyCode::Char('f') | KeyCode::Char('l') | KeyCode::Enter => {
                if let Some(player) = state.players.get(self.roster_cursor) {
                    let (field, value) = if key.code == KeyCode::Char('l') {
                        (PlayerField::LastName, &player.last_name)
                    } else {
                        (PlayerField::FirstName, &player.first_name)
                    };
                    self.prompt = Some(TextPrompt::new(
                        PromptTarget::Player {
                            id: player.id,
                            field,
                        },
                        value,
                    ));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected {
                    if self.dispatch(Mutation::DeletePlayer { id }) {
                        self.set_status("Player removed");
                    }
                }
            }
            KeyCode::Char('K') => {
                if let (Some(from), Some(to)) = (
                    selected,
                    self.roster_cursor
                        .checked_sub(1)
                        .and_then(|index| state.players.get(index))
                        .map(|player| player.id),
                ) {
                    if self.dispatch(Mutation::ReorderPlayers { from, to }) {
                        self.roster_cursor -= 1;
                    }
                }
            }
            KeyCode::Char('J') => {
                if let (Some(from), Some(to)) = (
                    selected,
                    state.players.get(self.roster_cursor + 1).map(|player| player.id),
                ) {
                    if self.dispatch(Mutation::ReorderPlayers { from, to }) {
                        self.roster_cursor += 1;
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_team_key(&mut self, team: usize, key: KeyEvent) -> Result<()> {
        let state = self.state();
        let days = state.teams.team(team).unwrap_or_default();
        match self.team_focus {
            TeamFocus::Days => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.day_cursor = (self.day_cursor + 1).min(days.len().saturating_sub(1));
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.day_cursor = self.day_cursor.saturating_sub(1);
                }
                KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                    if !state.players.is_empty() {
                        self.team_focus = TeamFocus::Players;
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(day) = days.get(self.day_cursor) {
                        self.prompt = Some(TextPrompt::new(
                            PromptTarget::Date {
                                team,
                                index: self.day_cursor,
                            },
                            &day.date,
                        ));
                    }
                }
                KeyCode::Char('o') => {
                    if let Some(day) = days.get(self.day_cursor) {
                        self.prompt = Some(TextPrompt::new(
                            PromptTarget::Opponent {
                                team,
                                index: self.day_cursor,
                            },
                            &day.opponent,
                        ));
                    }
                }
                KeyCode::Char('v') => {
                    if let Some(day) = days.get(self.day_cursor) {
                        self.dispatch(Mutation::UpdateGameDay {
                            team,
                            index: self.day_cursor,
                            edit: GameDayEdit::Location(day.location.toggled()),
                        });
                    }
                }
                KeyCode::Char('p') => {
                    let path = self.exporter.export_team_preview(&state, team)?;
                    self.set_status(format!("Exported {}", path.display()));
                }
                KeyCode::Char('P') => match self.exporter.export_team_document(&state, team)? {
                    Some(path) => self.set_status(format!("Exported {}", path.display())),
                    None => self.set_status("Nothing to export"),
                },
                _ => {}
            },
            TeamFocus::Players => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.player_cursor =
                        (self.player_cursor + 1).min(state.players.len().saturating_sub(1));
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.player_cursor = self.player_cursor.saturating_sub(1);
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(player) = state.players.get(self.player_cursor) {
                        self.dispatch(Mutation::TogglePlayer {
                            team,
                            index: self.day_cursor,
                            player: player.id,
                        });
                    }
                }
                KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
                    self.team_focus = TeamFocus::Days;
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let state = self.state();
        let teams = state.config.number_of_teams();
        let delta: isize = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.settings_cursor = (self.settings_cursor + 1).min(teams);
                return;
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.settings_cursor = self.settings_cursor.saturating_sub(1);
                return;
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right | KeyCode::Char('l') => 1,
            KeyCode::Char('-') | KeyCode::Left | KeyCode::Char('h') => -1,
            _ => return,
        };

        let mutation = if self.settings_cursor == 0 {
            let next = teams as isize + delta;
            if next < 1 {
                return;
            }
            Mutation::SetNumberOfTeams(next as usize)
        } else {
            let team = self.settings_cursor;
            let next = state.config.game_days_for(team) as isize + delta;
            if next < 1 || next > MAX_GAME_DAYS as isize {
                return;
            }
            Mutation::SetGameDays {
                team,
                days: next as usize,
            }
        };
        if self.dispatch(mutation) {
            self.set_status("Configuration updated");
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let state = self.state();
        let theme = Theme::for_mode(state.dark_mode);
        let area = frame.size();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.primary_bg).fg(theme.primary_fg)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_tabs(frame, chunks[0], &state, &theme);
        match self.screen {
            Screen::Roster => self.render_roster(frame, chunks[1], &state, &theme),
            Screen::Team(team) => self.render_team(frame, chunks[1], &state, &theme, team),
            Screen::Settings => self.render_settings(frame, chunks[1], &state, &theme),
        }
        self.render_status(frame, chunks[2], &theme);

        if let Some(prompt) = &self.prompt {
            render_prompt(frame, prompt, &theme);
        }
        if self.confirm_clear {
            render_confirm(frame, &theme);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, state: &TrackerState, theme: &Theme) {
        let screens = Self::screens(state);
        let titles: Vec<String> = screens
            .iter()
            .map(|screen| match screen {
                Screen::Roster => "Players Roster".to_string(),
                Screen::Team(team) => team_title(*team),
                Screen::Settings => "Configuration".to_string(),
            })
            .collect();
        let selected = screens
            .iter()
            .position(|screen| *screen == self.screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .select(selected)
            .block(bordered(theme, "Player Game Day Tracker"))
            .style(Style::default().fg(theme.muted))
            .highlight_style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, area);
    }

    fn render_roster(&self, frame: &mut Frame, area: Rect, state: &TrackerState, theme: &Theme) {
        let items: Vec<ListItem> = state
            .players
            .iter()
            .map(|player| {
                let count = calculate_participation(&state.teams, player.id);
                let first = placeholder(&player.first_name, "First");
                let last = placeholder(&player.last_name, "Last");
                let name_style = if player.first_name.is_empty() && player.last_name.is_empty() {
                    Style::default().fg(theme.muted)
                } else {
                    Style::default().fg(theme.primary_fg)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{first:<20} {last:<20}"), name_style),
                    Span::styled(
                        format!("{count:>3} game days"),
                        Style::default().fg(theme.accent),
                    ),
                ]))
            })
            .collect();
        let title = format!("Players Roster ({})", state.players.len());
        let list = List::new(items)
            .block(bordered(theme, &title))
            .highlight_style(selection(theme))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(
            (!state.players.is_empty()).then_some(self.roster_cursor),
        );
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_team(
        &self,
        frame: &mut Frame,
        area: Rect,
        state: &TrackerState,
        theme: &Theme,
        team: usize,
    ) {
        let days = state.teams.team(team).unwrap_or_default();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let items: Vec<ListItem> = days
            .iter()
            .map(|day| {
                let date = placeholder(&day.date, "no date");
                let opponent = placeholder(&day.opponent, "TBD");
                ListItem::new(format!(
                    "Game Day {:<2} {:<10} {:<4} vs {:<16} {} players",
                    day.game_day,
                    date,
                    day.location.label(),
                    opponent,
                    day.players.len()
                ))
            })
            .collect();
        let days_title = format!("{} · Game Days", team_title(team));
        let mut days_block = bordered(theme, &days_title);
        if self.team_focus == TeamFocus::Days {
            days_block = days_block.border_style(Style::default().fg(theme.accent));
        }
        let list = List::new(items)
            .block(days_block)
            .highlight_style(selection(theme))
            .highlight_symbol("▶ ");
        let mut list_state =
            ListState::default().with_selected((!days.is_empty()).then_some(self.day_cursor));
        frame.render_stateful_widget(list, columns[0], &mut list_state);

        let Some(day) = days.get(self.day_cursor) else {
            return;
        };
        let detail_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(columns[1]);

        let details = vec![
            Line::from(format!("Date:     {}", placeholder(&day.date, "Not set"))),
            Line::from(format!("Location: {}", day.location.label())),
            Line::from(format!("Opponent: {}", placeholder(&day.opponent, "TBD"))),
        ];
        let details_title = format!("Game Day {}", day.game_day);
        frame.render_widget(
            Paragraph::new(details)
                .block(bordered(theme, &details_title))
                .wrap(Wrap { trim: true }),
            detail_chunks[0],
        );

        let attendance: Vec<ListItem> = state
            .players
            .iter()
            .map(|player| {
                let present = day.players.contains(&player.id);
                let (mark, color) = if present {
                    ("[x]", theme.success)
                } else {
                    ("[ ]", theme.muted)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{mark} "), Style::default().fg(color)),
                    Span::raw(player.display_name()),
                ]))
            })
            .collect();
        let mut players_block = bordered(theme, "Select Players");
        if self.team_focus == TeamFocus::Players {
            players_block = players_block.border_style(Style::default().fg(theme.accent));
        }
        let list = List::new(attendance)
            .block(players_block)
            .highlight_style(selection(theme))
            .highlight_symbol("▶ ");
        let selected = (self.team_focus == TeamFocus::Players && !state.players.is_empty())
            .then_some(self.player_cursor);
        let mut list_state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, detail_chunks[1], &mut list_state);
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect, state: &TrackerState, theme: &Theme) {
        let mut items = vec![ListItem::new(format!(
            "Number of teams      {}",
            state.config.number_of_teams()
        ))];
        items.extend((1..=state.config.number_of_teams()).map(|team| {
            ListItem::new(format!(
                "{} game days    {} days",
                team_title(team),
                state.config.game_days_for(team)
            ))
        }));
        let list = List::new(items)
            .block(bordered(theme, "Team Configuration"))
            .highlight_style(selection(theme))
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default().with_selected(Some(self.settings_cursor));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let help = match (self.screen, self.team_focus) {
            (Screen::Roster, _) => {
                "a add · f/l edit first/last · d delete · J/K move · x export · T theme · C clear · q quit"
            }
            (Screen::Team(_), TeamFocus::Days) => {
                "enter select players · d date · o opponent · v home/away · p preview xlsx · P preview pdf"
            }
            (Screen::Team(_), TeamFocus::Players) => "space toggle attendance · esc back to game days",
            (Screen::Settings, _) => "j/k select · +/- adjust · tab switch screen",
        };
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(help, Style::default().fg(theme.muted))),
        ])
        .block(bordered(theme, "Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn render_prompt(frame: &mut Frame, prompt: &TextPrompt, theme: &Theme) {
    let area = centered_rect(60, 5, frame.size());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(prompt.input.clone()),
        Line::from(Span::styled(
            "enter save · esc cancel",
            Style::default().fg(theme.muted),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(bordered(theme, prompt.target.title()))
        .style(Style::default().bg(theme.primary_bg).fg(theme.primary_fg));
    frame.render_widget(paragraph, area);
    let cursor_x = area.x + 1 + prompt.cursor.min(area.width.saturating_sub(3) as usize) as u16;
    frame.set_cursor(cursor_x, area.y + 1);
}

fn render_confirm(frame: &mut Frame, theme: &Theme) {
    let area = centered_rect(56, 5, frame.size());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(Span::styled(
            "Are you sure you want to clear all data?",
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )),
        Line::from("This action cannot be undone. (y/n)"),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(bordered(theme, "Clear All Data"))
        .style(Style::default().bg(theme.primary_bg).fg(theme.primary_fg));
    frame.render_widget(paragraph, area);
}

fn bordered<'a>(theme: &Theme, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title)
}

fn selection(theme: &Theme) -> Style {
    Style::default()
        .bg(theme.selection_bg)
        .fg(theme.selection_fg)
        .add_modifier(Modifier::BOLD)
}

fn placeholder<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameday_core::MemoryStore;
    use tempfile::tempdir;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut TrackerApp<MemoryStore>, text: &str) -> Result<()> {
        for ch in text.chars() {
            app.handle_input(press(KeyCode::Char(ch)))?;
        }
        Ok(())
    }

    fn app_in(dir: &std::path::Path) -> TrackerApp<MemoryStore> {
        TrackerApp::new(Store::open(MemoryStore::new()), Exporter::new(dir))
    }

    #[test]
    fn prompt_edits_player_names() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::Char('f')))?;
        type_text(&mut app, "Zoë")?;
        app.handle_input(press(KeyCode::Backspace))?;
        app.handle_input(press(KeyCode::Char('e')))?;
        app.handle_input(press(KeyCode::Enter))?;
        assert_eq!(app.state().players[0].first_name, "Zoe");
        assert!(app.prompt.is_none());
        Ok(())
    }

    #[test]
    fn attendance_toggles_from_team_screen() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::Tab))?;
        assert_eq!(app.screen, Screen::Team(1));
        app.handle_input(press(KeyCode::Char('j')))?;
        app.handle_input(press(KeyCode::Enter))?;
        app.handle_input(press(KeyCode::Char(' ')))?;

        let state = app.state();
        assert!(state.teams.team(1).unwrap_or_default()[1].players.contains(&1));
        assert_eq!(calculate_participation(&state.teams, 1), 1);
        Ok(())
    }

    #[test]
    fn settings_adjust_team_count() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::BackTab))?;
        assert_eq!(app.screen, Screen::Settings);
        app.handle_input(press(KeyCode::Char('+')))?;
        assert_eq!(app.state().teams.len(), 3);

        app.handle_input(press(KeyCode::Char('j')))?;
        app.handle_input(press(KeyCode::Char('-')))?;
        assert_eq!(app.state().config.game_days_for(1), 4);
        Ok(())
    }

    #[test]
    fn team_count_stops_at_maximum() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::BackTab))?;
        app.handle_input(press(KeyCode::Char('+')))?;
        app.handle_input(press(KeyCode::Char('+')))?;
        assert_eq!(app.state().config.number_of_teams(), 4);

        app.set_status("Ready");
        let before = app.state();
        app.handle_input(press(KeyCode::Char('+')))?;
        assert_eq!(app.status, "Ready");
        assert!(Arc::ptr_eq(&before, &app.state()));
        Ok(())
    }

    #[test]
    fn clear_requires_confirmation() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::Char('a')))?;
        assert_eq!(app.state().players.len(), 2);

        app.handle_input(press(KeyCode::Char('C')))?;
        app.handle_input(press(KeyCode::Char('n')))?;
        assert_eq!(app.state().players.len(), 2);

        app.handle_input(press(KeyCode::Char('C')))?;
        app.handle_input(press(KeyCode::Char('y')))?;
        assert_eq!(*app.state(), TrackerState::default());
        Ok(())
    }

    #[test]
    fn reorder_keys_move_selected_player() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::Char('a')))?;
        let added = app.state().players[1].id;
        app.handle_input(press(KeyCode::Char('K')))?;
        assert_eq!(app.state().players[0].id, added);
        assert_eq!(app.roster_cursor, 0);
        Ok(())
    }

    #[test]
    fn export_shortcut_writes_workbook() -> Result<()> {
        let dir = tempdir()?;
        let mut app = app_in(dir.path());
        app.handle_input(press(KeyCode::Char('x')))?;
        assert!(dir.path().join("player_gameday_tracker.xlsx").exists());
        Ok(())
    }
}
