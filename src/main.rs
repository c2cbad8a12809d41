use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use predictions_terminal::calendar::{WEEKDAY_LABELS, long_date_label, month_title};
use predictions_terminal::config::AppConfig;
use predictions_terminal::filter::EmptyState;
use predictions_terminal::fixtures::Fixture;
use predictions_terminal::outcome::{Probabilities, classify, outcome_label};
use predictions_terminal::provider::{source_from_config, spawn_provider};
use predictions_terminal::state::{
    AppState, Delta, FetchMode, InputMode, ProviderCommand, apply_delta, fetch_mode_label,
    route_label,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn flush_commands(&mut self) {
        let commands = self.state.take_commands();
        if commands.is_empty() {
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Fixture fetch unavailable");
            return;
        };
        for cmd in commands {
            if tx.send(cmd).is_err() {
                self.state.push_log("[WARN] Fixture request failed");
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.state.input_mode {
            InputMode::Filter => self.on_filter_key(key),
            InputMode::NameSearch => self.on_name_key(key),
            InputMode::Normal if self.state.calendar_open => self.on_calendar_key(key),
            InputMode::Normal => self.on_list_key(key),
        }
        self.flush_commands();
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        if self.state.details_open {
            match key.code {
                KeyCode::Char('b') | KeyCode::Esc | KeyCode::Enter | KeyCode::Char('d') => {
                    self.state.close_details()
                }
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => self.state.toggle_calendar(),
            KeyCode::Char('t') => self.state.calendar_today(),
            KeyCode::Char('/') => self.state.input_mode = InputMode::Filter,
            KeyCode::Char('n') => {
                self.state.name_query.clear();
                self.state.input_mode = InputMode::NameSearch;
            }
            KeyCode::Char('x') => self.state.set_search_text(""),
            KeyCode::Char('f') => self.state.cycle_category_next(),
            KeyCode::Char('F') => self.state.cycle_category_prev(),
            KeyCode::Char('r') => self.state.refresh(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('d') | KeyCode::Enter => self.state.open_details(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') => self.state.calendar_open = false,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') | KeyCode::Left => self.state.move_calendar_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => self.state.move_calendar_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_calendar_cursor(-7),
            KeyCode::Char('j') | KeyCode::Down => self.state.move_calendar_cursor(7),
            KeyCode::Char('[') | KeyCode::PageUp => self.state.calendar_prev_month(),
            KeyCode::Char(']') | KeyCode::PageDown => self.state.calendar_next_month(),
            KeyCode::Enter => self.state.calendar_confirm(),
            KeyCode::Char('t') => self.state.calendar_today(),
            _ => {}
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.state.input_mode = InputMode::Normal,
            KeyCode::Backspace => self.state.pop_search_char(),
            KeyCode::Char(c) => self.state.push_search_char(c),
            _ => {}
        }
    }

    fn on_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.name_query.clear();
                self.state.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let name = std::mem::take(&mut self.state.name_query);
                self.state.input_mode = InputMode::Normal;
                self.state.request_name_search(&name);
            }
            KeyCode::Backspace => {
                self.state.name_query.pop();
            }
            KeyCode::Char(c) => self.state.name_query.push(c),
            _ => {}
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn main() -> io::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = AppConfig::load(&args);

    let mut state = AppState::with_route(cfg.date.as_deref(), today());
    if let Some(search) = cfg.search.as_deref() {
        state.request_name_search(search);
    }
    let source = match source_from_config(&cfg) {
        Ok(source) => Some(source),
        Err(err) => {
            state.push_log(format!("[WARN] {err:#}"));
            None
        }
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(source, tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx));
    app.flush_commands();
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.state.set_today(today());
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_fixtures(frame, chunks[1], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.calendar_open {
        render_calendar(frame, chunks[1], state);
    }
    if state.details_open {
        if let Some(fixture) = state.selected_fixture() {
            render_details(frame, frame.size(), fixture);
        }
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let search = match state.input_mode {
        InputMode::Filter => format!("Search: {}_", state.search_text),
        _ if state.search_text.is_empty() => "Search: -".to_string(),
        _ => format!("Search: {}", state.search_text),
    };
    let line1 = format!(
        "PREDICTIONS | {} | {} | Filter: {} | {}",
        long_date_label(state.nav.selected_date()),
        fetch_mode_label(state.mode),
        state.category.label(),
        search
    );
    let line2 = match state.input_mode {
        InputMode::NameSearch => format!("Find fixtures by name: {}_", state.name_query),
        _ => route_label(state),
    };
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.calendar_open {
        return "←/→ Day | ↑/↓ Week | [/] Month | Enter Select | t Today | Esc Close".to_string();
    }
    match state.input_mode {
        InputMode::Filter => "Type to filter | Backspace Delete | Enter/Esc Done".to_string(),
        InputMode::NameSearch => "Type a team or league | Enter Search | Esc Cancel".to_string(),
        InputMode::Normal => {
            "c Calendar | t Today | / Filter | n Name search | f/F Category | j/k Move | Enter Details | r Refresh | ? Help | q Quit"
                .to_string()
        }
    }
}

fn render_fixtures(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut banners: Vec<Line> = Vec::new();
    if let Some(notice) = &state.date_notice {
        banners.push(Line::styled(notice.clone(), Style::default().fg(Color::Yellow)));
    }
    if let Some(error) = &state.fetch.error {
        banners.push(Line::styled(
            format!("Error fetching fixtures {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    if state.fetch.is_fetching {
        banners.push(Line::styled(
            "Loading fixtures...",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ));
    } else if state.is_stale_view() {
        if let Some(key) = &state.fetch.data_key {
            banners.push(Line::styled(
                format!("Showing previous results for {}", key.label()),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banners.len() as u16),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);
    frame.render_widget(Paragraph::new(banners), sections[0]);

    let widths = fixture_columns();
    render_fixture_header(frame, sections[1], &widths);

    let list_area = sections[2];
    if state.fetch.data_key.is_none() && state.fetch.is_fetching {
        return;
    }
    if let Some(empty) = state.empty_state() {
        let detail = match empty {
            EmptyState::NoFixtures => format!(
                "{}\nThere are no fixtures scheduled for this {}.",
                empty.message(),
                match state.mode {
                    FetchMode::Date => "date",
                    FetchMode::Search => "search",
                }
            ),
            EmptyState::NoMatches => format!(
                "{}\nTry another category or clear the search (x).",
                empty.message()
            ),
        };
        let empty = Paragraph::new(detail).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    const ROW_HEIGHT: u16 = 2;
    if list_area.height < ROW_HEIGHT {
        return;
    }
    let fixtures = state.visible_fixtures();
    let visible = (list_area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, fixtures.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * ROW_HEIGHT,
            width: list_area.width,
            height: ROW_HEIGHT,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let f = &fixtures[idx];
        let match_name = format!("{} vs {}", f.home_label(), f.away_label());
        render_cell_text(frame, cols[0], &f.kickoff_time(), row_style);
        render_cell_text(frame, cols[1], f.league_label(), row_style);
        render_cell_text(frame, cols[2], &match_name, row_style);
        match f.first_prediction() {
            Some(p) => {
                let hda = format!("H{:.0} D{:.0} A{:.0}", p.home, p.draw, p.away);
                render_cell_text(frame, cols[3], &hda, row_style);
                frame.render_widget(win_bar_chart(p, selected), cols[4]);
                render_cell_text(frame, cols[5], outcome_label(classify(p)), row_style);
            }
            None => render_cell_text(frame, cols[3], "No prediction", row_style),
        }
    }
}

fn fixture_columns() -> [Constraint; 6] {
    [
        Constraint::Length(7),
        Constraint::Length(22),
        Constraint::Min(24),
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Length(6),
    ]
}

fn render_fixture_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Time", style);
    render_cell_text(frame, cols[1], "League", style);
    render_cell_text(frame, cols[2], "Match", style);
    render_cell_text(frame, cols[3], "H/D/A", style);
    render_cell_text(frame, cols[4], "Win% Bar", style);
    render_cell_text(frame, cols[5], "Pick", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text.to_string()).style(style);
    frame.render_widget(paragraph, text_area);
}

fn win_bar_chart(p: &Probabilities, selected: bool) -> BarChart<'static> {
    let base_bg = if selected { Some(Color::DarkGray) } else { None };

    let mut home_style = Style::default().fg(Color::Green);
    let mut draw_style = Style::default().fg(Color::Gray);
    let mut away_style = Style::default().fg(Color::Red);
    if let Some(bg) = base_bg {
        home_style = home_style.bg(bg);
        draw_style = draw_style.bg(bg);
        away_style = away_style.bg(bg);
    }

    let home = Bar::default()
        .value(p.home.max(0.0).round() as u64)
        .text_value(String::new())
        .style(home_style);
    let draw = Bar::default()
        .value(p.draw.max(0.0).round() as u64)
        .text_value(String::new())
        .style(draw_style);
    let away = Bar::default()
        .value(p.away.max(0.0).round() as u64)
        .text_value(String::new())
        .style(away_style);

    BarChart::default()
        .data(BarGroup::default().bars(&[home, draw, away]))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .group_gap(0)
        .max(100)
}

fn percent_bar(p: &Probabilities, width: usize) -> Line<'static> {
    let cells = |v: f32| ((v.clamp(0.0, 100.0) / 100.0) * width as f32).round() as usize;
    let home = cells(p.home);
    let draw = cells(p.draw).min(width.saturating_sub(home));
    let away = cells(p.away).min(width.saturating_sub(home + draw));
    Line::from(vec![
        Span::styled("█".repeat(home), Style::default().fg(Color::Green)),
        Span::styled("█".repeat(draw), Style::default().fg(Color::Gray)),
        Span::styled("█".repeat(away), Style::default().fg(Color::Red)),
    ])
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_calendar(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = Rect {
        x: area.x + 1,
        y: area.y,
        width: 34.min(area.width.saturating_sub(1)),
        height: 14.min(area.height),
    };
    frame.render_widget(Clear, popup);

    let grid = state.calendar_grid();
    let mut lines: Vec<Line> = Vec::with_capacity(12);
    lines.push(Line::from(Span::styled(
        format!("  <  {:^20}  >", month_title(grid.month_anchor())),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(
        WEEKDAY_LABELS
            .iter()
            .map(|label| {
                Span::styled(
                    format!("{label:>4}"),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
                )
            })
            .collect::<Vec<_>>(),
    ));
    for week in grid.weeks() {
        let spans = week
            .iter()
            .map(|day| {
                let mut style = if day.in_current_month {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                if day.is_today {
                    style = style.fg(Color::White).bg(Color::Blue);
                } else if day.is_selected {
                    style = style.fg(Color::White).bg(Color::Green);
                }
                if day.date == state.calendar_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(format!("{:>4}", day.date.day()), style)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Selected: {}",
        long_date_label(state.nav.selected_date())
    )));
    lines.push(Line::styled(
        "[t] Today",
        Style::default().fg(Color::Cyan),
    ));

    let calendar = Paragraph::new(lines)
        .block(Block::default().title("Calendar").borders(Borders::ALL));
    frame.render_widget(calendar, popup);
}

fn render_details(frame: &mut Frame, area: Rect, fixture: &Fixture) {
    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::styled(fixture.league_label().to_string(), bold),
        Line::from(fixture.kickoff_long()),
        Line::from(""),
        Line::from(vec![
            Span::styled(fixture.home_label().to_string(), bold),
            Span::styled("  VS  ", Style::default().fg(Color::DarkGray)),
            Span::styled(fixture.away_label().to_string(), bold),
        ]),
        Line::from(""),
    ];

    let records = fixture.prediction_records();
    if !records.is_empty() {
        lines.push(Line::styled("Match Predictions", bold));
        for record in records {
            let p = &record.predictions;
            lines.push(Line::from(format!(
                "{}  Home Win: {}%  Draw: {}%  Away Win: {}%",
                record.type_label(),
                p.home,
                p.draw,
                p.away
            )));
            lines.push(percent_bar(p, 40));
        }
        lines.push(Line::from(""));
    }

    let country = if fixture.league.country.name.is_empty() {
        "-"
    } else {
        fixture.league.country.name.as_str()
    };
    lines.push(Line::from(format!("League:   {}", fixture.league_label())));
    lines.push(Line::from(format!("Country:  {country}")));
    lines.push(Line::from(format!("Match ID: {}", fixture.id)));
    lines.push(Line::from(format!("Status:   {}", fixture.status_label())));
    if let Some(info) = fixture.result_info.as_deref().filter(|s| !s.is_empty()) {
        lines.push(Line::from(format!("Result:   {info}")));
    }

    let details = Paragraph::new(lines)
        .block(Block::default().title("Match Details").borders(Borders::ALL));
    frame.render_widget(details, popup_area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Predictions - Help",
        "",
        "Fixtures:",
        "  j/k or ↑/↓   Move",
        "  Enter / d    Match details",
        "  /            Filter by team or league",
        "  x            Clear filter text",
        "  f / F        Next / previous category",
        "  n            Fetch fixtures by name",
        "  r            Refresh",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Calendar (c):",
        "  ←/→ ↑/↓      Move day / week",
        "  [ / ]        Previous / next month",
        "  Enter        Select day",
        "  t            Today",
        "  Esc          Close",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
