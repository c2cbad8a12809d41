use std::collections::VecDeque;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

use crate::calendar::{CalendarGrid, last_day_of_month, same_month, shift_month};
use crate::filter::{CategoryFilter, EmptyState, FilterMemo, empty_state};
use crate::fixtures::Fixture;
use crate::navigator::{DateSource, NavCommand, NavigationSink, NavigatorState, run_effects};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    Date,
    Search,
}

/// Identifies one logical request: `(mode, selected date | search text)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub mode: FetchMode,
    pub value: String,
}

impl FetchKey {
    pub fn date(date: impl Into<String>) -> Self {
        Self {
            mode: FetchMode::Date,
            value: date.into(),
        }
    }

    pub fn search(name: impl Into<String>) -> Self {
        Self {
            mode: FetchMode::Search,
            value: name.into(),
        }
    }

    pub fn label(&self) -> String {
        match self.mode {
            FetchMode::Date => format!("date {}", self.value),
            FetchMode::Search => format!("search \"{}\"", self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchByDate { date: String },
    FetchByName { name: String },
}

impl ProviderCommand {
    pub fn key(&self) -> FetchKey {
        match self {
            ProviderCommand::FetchByDate { date } => FetchKey::date(date.clone()),
            ProviderCommand::FetchByName { name } => FetchKey::search(name.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    FixturesLoaded { key: FetchKey, fixtures: Vec<Fixture> },
    FetchFailed { key: FetchKey, error: String },
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    NameSearch,
}

#[derive(Debug, Clone, Default)]
pub struct FetchStatus {
    pub current: Option<FetchKey>,
    pub data_key: Option<FetchKey>,
    pub is_fetching: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub today: NaiveDate,
    pub nav: NavigatorState,
    pub route_date: String,
    pub date_notice: Option<String>,
    pub mode: FetchMode,
    pub input_mode: InputMode,
    pub search_text: String,
    pub name_query: String,
    pub category: CategoryFilter,
    pub calendar_open: bool,
    pub calendar_cursor: NaiveDate,
    pub fetch: FetchStatus,
    pub fixtures: Vec<Fixture>,
    fixtures_generation: u64,
    memo: FilterMemo,
    pub selected: usize,
    pub details_open: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    outbox: Vec<ProviderCommand>,
}

impl AppState {
    pub fn with_route(raw_date: Option<&str>, today: NaiveDate) -> Self {
        let (nav, source) = NavigatorState::from_query(raw_date, today);
        let route_date = nav.selected_date_string();
        let mut state = Self {
            today,
            nav,
            route_date: route_date.clone(),
            date_notice: source.notice(),
            mode: FetchMode::Date,
            input_mode: InputMode::Normal,
            search_text: String::new(),
            name_query: String::new(),
            category: CategoryFilter::All,
            calendar_open: false,
            calendar_cursor: nav.selected_date(),
            fetch: FetchStatus::default(),
            fixtures: Vec::new(),
            fixtures_generation: 0,
            memo: FilterMemo::new(),
            selected: 0,
            details_open: false,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
            outbox: Vec::new(),
        };
        match source {
            DateSource::Query => {}
            DateSource::Missing => {
                state.push_log(format!("[INFO] No date given, using today ({route_date})"))
            }
            DateSource::Invalid(raw) => state.push_log(format!(
                "[WARN] Invalid date \"{raw}\", using today ({route_date})"
            )),
        }
        state.request_date_fetch(&route_date);
        state.refresh_filtered();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn take_commands(&mut self) -> Vec<ProviderCommand> {
        std::mem::take(&mut self.outbox)
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn request_date_fetch(&mut self, date: &str) {
        self.mode = FetchMode::Date;
        self.begin_fetch(ProviderCommand::FetchByDate {
            date: date.to_string(),
        });
    }

    pub fn request_name_search(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.push_log("[INFO] Empty name search ignored");
            return;
        }
        self.mode = FetchMode::Search;
        self.begin_fetch(ProviderCommand::FetchByName {
            name: name.to_string(),
        });
    }

    pub fn refresh(&mut self) {
        let Some(key) = self.fetch.current.clone() else {
            let date = self.route_date.clone();
            self.request_date_fetch(&date);
            return;
        };
        let cmd = match key.mode {
            FetchMode::Date => ProviderCommand::FetchByDate { date: key.value },
            FetchMode::Search => ProviderCommand::FetchByName { name: key.value },
        };
        self.begin_fetch(cmd);
    }

    fn begin_fetch(&mut self, cmd: ProviderCommand) {
        let key = cmd.key();
        self.push_log(format!("[INFO] Fetching {}", key.label()));
        self.fetch.current = Some(key);
        self.fetch.is_fetching = true;
        self.outbox.push(cmd);
    }

    pub fn is_stale_view(&self) -> bool {
        self.fetch.data_key.is_some() && self.fetch.data_key != self.fetch.current
    }

    pub fn visible_fixtures(&self) -> &[Fixture] {
        self.memo.cached()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        empty_state(self.fixtures.len(), self.visible_fixtures().len())
    }

    pub fn refresh_filtered(&mut self) {
        self.memo.get(
            self.fixtures_generation,
            &self.fixtures,
            &self.search_text,
            self.category,
        );
        self.clamp_selection();
    }

    pub fn set_fixtures(&mut self, fixtures: Vec<Fixture>) {
        self.fixtures = fixtures;
        self.fixtures_generation = self.fixtures_generation.wrapping_add(1);
        self.selected = 0;
        self.details_open = false;
        self.refresh_filtered();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.selected = 0;
        self.refresh_filtered();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_text.push(c);
        self.selected = 0;
        self.refresh_filtered();
    }

    pub fn pop_search_char(&mut self) {
        self.search_text.pop();
        self.selected = 0;
        self.refresh_filtered();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if self.category == category {
            return;
        }
        self.category = category;
        self.selected = 0;
        self.refresh_filtered();
        self.push_log(format!("[INFO] Filter: {}", category.label()));
    }

    pub fn cycle_category_next(&mut self) {
        self.set_category(self.category.next());
    }

    pub fn cycle_category_prev(&mut self) {
        self.set_category(self.category.prev());
    }

    pub fn select_next(&mut self) {
        let total = self.visible_fixtures().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible_fixtures().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible_fixtures().len();
        if total == 0 {
            self.selected = 0;
            self.details_open = false;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn selected_fixture(&self) -> Option<&Fixture> {
        self.visible_fixtures().get(self.selected)
    }

    pub fn open_details(&mut self) {
        self.details_open = self.selected_fixture().is_some();
    }

    pub fn close_details(&mut self) {
        self.details_open = false;
    }

    pub fn calendar_grid(&self) -> CalendarGrid {
        self.nav.grid(self.today)
    }

    pub fn open_calendar(&mut self) {
        self.calendar_open = true;
        self.calendar_cursor = self.nav.selected_date();
        if !same_month(self.calendar_cursor, self.nav.month_anchor()) {
            self.calendar_cursor = self.nav.month_anchor();
        }
    }

    pub fn toggle_calendar(&mut self) {
        if self.calendar_open {
            self.calendar_open = false;
        } else {
            self.open_calendar();
        }
    }

    pub fn dispatch_nav(&mut self, cmd: NavCommand) {
        let transition = self.nav.reduce(cmd, self.today);
        self.nav = transition.state;
        run_effects(&transition.effects, self);
    }

    pub fn calendar_prev_month(&mut self) {
        self.dispatch_nav(NavCommand::PrevMonth);
        self.calendar_cursor =
            clamp_into_month(shift_month(self.calendar_cursor, -1), self.calendar_cursor);
    }

    pub fn calendar_next_month(&mut self) {
        self.dispatch_nav(NavCommand::NextMonth);
        self.calendar_cursor =
            clamp_into_month(shift_month(self.calendar_cursor, 1), self.calendar_cursor);
    }

    pub fn move_calendar_cursor(&mut self, days: i64) {
        let Some(next) = self
            .calendar_cursor
            .checked_add_signed(ChronoDuration::days(days))
        else {
            return;
        };
        let anchor = self.nav.month_anchor();
        if next < anchor {
            self.dispatch_nav(NavCommand::PrevMonth);
        } else if !same_month(next, anchor) {
            self.dispatch_nav(NavCommand::NextMonth);
        }
        self.calendar_cursor = next;
    }

    pub fn calendar_confirm(&mut self) {
        self.dispatch_nav(NavCommand::SelectDay(self.calendar_cursor));
    }

    pub fn calendar_today(&mut self) {
        self.dispatch_nav(NavCommand::SelectToday);
        self.calendar_cursor = self.today;
    }
}

impl NavigationSink for AppState {
    fn publish_selected_date(&mut self, date: &str) {
        self.route_date = date.to_string();
        self.date_notice = None;
        self.request_date_fetch(date);
    }

    fn request_close(&mut self) {
        self.calendar_open = false;
    }
}

fn clamp_into_month(month_start: NaiveDate, from: NaiveDate) -> NaiveDate {
    let last = last_day_of_month(month_start);
    let day = from.day().min(last.day());
    month_start.with_day(day).unwrap_or(month_start)
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::FixturesLoaded { key, fixtures } => {
            if state.fetch.current.as_ref() != Some(&key) {
                state.push_log(format!("[INFO] Discarded stale result for {}", key.label()));
                return;
            }
            let count = fixtures.len();
            state.fetch.is_fetching = false;
            state.fetch.error = None;
            state.fetch.data_key = Some(key.clone());
            state.set_fixtures(fixtures);
            state.push_log(format!("[INFO] {count} fixtures for {}", key.label()));
        }
        Delta::FetchFailed { key, error } => {
            if state.fetch.current.as_ref() != Some(&key) {
                state.push_log(format!(
                    "[INFO] Discarded stale error for {}: {error}",
                    key.label()
                ));
                return;
            }
            // Previous fixtures stay on screen.
            state.fetch.is_fetching = false;
            state.push_log(format!("[WARN] Fetch failed for {}: {error}", key.label()));
            state.fetch.error = Some(error);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn fetch_mode_label(mode: FetchMode) -> &'static str {
    match mode {
        FetchMode::Date => "DATE",
        FetchMode::Search => "SEARCH",
    }
}

pub fn route_label(state: &AppState) -> String {
    match state.mode {
        FetchMode::Date => format!("/predictions?date={}", state.route_date),
        FetchMode::Search => match &state.fetch.current {
            Some(key) => format!("/search?name={}", key.value),
            None => "/search".to_string(),
        },
    }
}
