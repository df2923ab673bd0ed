use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use kitakitar::{LeaderboardEntry, Session, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    History,
    Leaderboard,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::History => Page::Leaderboard,
            Page::Leaderboard => Page::History,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::History => "History",
            Page::Leaderboard => "Leaderboard",
        }
    }
}

pub struct App {
    pub session: Session,
    pub board: Vec<LeaderboardEntry>,
    pub current_page: Page,
    pub history_state: TableState,
    pub board_state: TableState,
}

impl App {
    pub fn new(session: Session, board: Vec<LeaderboardEntry>) -> Self {
        let mut history_state = TableState::default();
        if !session.history().is_empty() {
            history_state.select(Some(0));
        }

        let mut board_state = TableState::default();
        if !board.is_empty() {
            board_state.select(Some(0));
        }

        Self {
            session,
            board,
            current_page: Page::History,
            history_state,
            board_state,
        }
    }

    fn page_len(&self) -> usize {
        match self.current_page {
            Page::History => self.session.history().len(),
            Page::Leaderboard => self.board.len(),
        }
    }

    fn page_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::History => &mut self.history_state,
            Page::Leaderboard => &mut self.board_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let state = self.page_state();
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let state = self.page_state();
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => app.page_state().select(Some(0)),
                KeyCode::End => {
                    let len = app.page_len();
                    if len > 0 {
                        app.page_state().select(Some(len - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::History => render_history(f, chunks[1], app),
        Page::Leaderboard => render_leaderboard(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::History, Page::Leaderboard];

    let mut tab_spans = vec![Span::styled(
        format!(" ♻ {} ", app.session.user.center_name),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    for page in &pages {
        tab_spans.push(Span::raw(" │ "));
        if *page == app.current_page {
            tab_spans.push(Span::styled(
                page.title(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            tab_spans.push(Span::raw(page.title()));
        }
    }

    let header = Paragraph::new(Line::from(tab_spans))
        .block(Block::default().borders(Borders::ALL).title("Kitakitar"));
    f.render_widget(header, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Items"),
        Cell::from("Weight"),
        Cell::from("Points"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .session
        .history()
        .iter()
        .map(|tx| {
            Row::new(vec![
                Cell::from(tx.recorded_at.format("%Y-%m-%d %H:%M").to_string()),
                Cell::from(tx.summary.clone()),
                Cell::from(format!("{:.1} kg", tx.total_weight)),
                Cell::from(Span::styled(
                    format!("+{:.2}", tx.points),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
            ])
        })
        .collect();

    let (total_weight, total_points) = app.session.history_totals();
    let title = if rows.is_empty() {
        "History - No transactions yet. Start recycling!".to_string()
    } else {
        format!(
            "History - {} transactions, {:.1} kg, +{:.2} points",
            rows.len(),
            total_weight,
            total_points
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Min(30),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(table, area, &mut app.history_state);
}

fn tier_style(tier: Option<Tier>) -> Style {
    match tier {
        Some(Tier::Gold) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Some(Tier::Silver) => Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        Some(Tier::Bronze) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        None => Style::default(),
    }
}

fn render_leaderboard(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec![
        Cell::from("Rank"),
        Cell::from("Center"),
        Cell::from("Points"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .board
        .iter()
        .map(|entry| {
            let name = if entry.is_you {
                format!("{} (You)", entry.center_name)
            } else {
                entry.center_name.clone()
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    format!("#{}", entry.rank),
                    tier_style(entry.tier),
                )),
                Cell::from(name),
                Cell::from(format!("{:.2} pts", entry.points)),
            ])
        })
        .collect();

    let title = if rows.is_empty() {
        "Leaderboard - No centers registered yet."
    } else {
        "Leaderboard"
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(30),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray));

    f.render_stateful_widget(table, area, &mut app.board_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, _app: &App) {
    let status = Paragraph::new("Tab: switch page │ ↑/↓ or j/k: navigate │ q: quit")
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}
