use chrono::NaiveDate;

use crate::calendar::{
    CalendarGrid, build_grid, first_day_of_month, format_calendar_date, parse_calendar_date,
    same_month, shift_month,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    PrevMonth,
    NextMonth,
    SelectDay(NaiveDate),
    SelectToday,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    PublishSelectedDate(String),
    RequestClose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    Query,
    Missing,
    Invalid(String),
}

impl DateSource {
    pub fn notice(&self) -> Option<String> {
        match self {
            DateSource::Invalid(_) => Some(
                "The date provided is not valid. Showing fixtures for today's date instead."
                    .to_string(),
            ),
            DateSource::Query | DateSource::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorState {
    month_anchor: NaiveDate,
    selected_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: NavigatorState,
    pub effects: Vec<NavEffect>,
}

impl NavigatorState {
    pub fn new(selected_date: NaiveDate) -> Self {
        Self {
            month_anchor: first_day_of_month(selected_date),
            selected_date,
        }
    }

    pub fn from_query(raw: Option<&str>, today: NaiveDate) -> (Self, DateSource) {
        let Some(raw) = raw else {
            return (Self::new(today), DateSource::Missing);
        };
        match parse_calendar_date(raw) {
            Some(date) => (Self::new(date), DateSource::Query),
            None => (Self::new(today), DateSource::Invalid(raw.to_string())),
        }
    }

    pub fn month_anchor(&self) -> NaiveDate {
        self.month_anchor
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_date_string(&self) -> String {
        format_calendar_date(self.selected_date)
    }

    pub fn grid(&self, today: NaiveDate) -> CalendarGrid {
        build_grid(self.month_anchor, today, self.selected_date)
    }

    pub fn reduce(&self, cmd: NavCommand, today: NaiveDate) -> Transition {
        match cmd {
            NavCommand::PrevMonth => Transition {
                state: Self {
                    month_anchor: shift_month(self.month_anchor, -1),
                    ..*self
                },
                effects: Vec::new(),
            },
            NavCommand::NextMonth => Transition {
                state: Self {
                    month_anchor: shift_month(self.month_anchor, 1),
                    ..*self
                },
                effects: Vec::new(),
            },
            NavCommand::SelectDay(day) => self.select(day),
            NavCommand::SelectToday => self.select(today),
        }
    }

    fn select(&self, day: NaiveDate) -> Transition {
        let month_anchor = if same_month(day, self.month_anchor) {
            self.month_anchor
        } else {
            first_day_of_month(day)
        };
        Transition {
            state: Self {
                month_anchor,
                selected_date: day,
            },
            effects: vec![
                NavEffect::PublishSelectedDate(format_calendar_date(day)),
                NavEffect::RequestClose,
            ],
        }
    }
}

/// Receives the side effects of a selection: the routing update and the
/// overlay close.
pub trait NavigationSink {
    fn publish_selected_date(&mut self, date: &str);
    fn request_close(&mut self);
}

pub fn run_effects<S: NavigationSink + ?Sized>(effects: &[NavEffect], sink: &mut S) {
    for effect in effects {
        match effect {
            NavEffect::PublishSelectedDate(date) => sink.publish_selected_date(date),
            NavEffect::RequestClose => sink.request_close(),
        }
    }
}

pub struct DateNavigator<S> {
    state: NavigatorState,
    sink: S,
}

impl<S: NavigationSink> DateNavigator<S> {
    pub fn new(state: NavigatorState, sink: S) -> Self {
        Self { state, sink }
    }

    pub fn state(&self) -> NavigatorState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn dispatch(&mut self, cmd: NavCommand, today: NaiveDate) -> NavigatorState {
        let transition = self.state.reduce(cmd, today);
        self.state = transition.state;
        run_effects(&transition.effects, &mut self.sink);
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_shifts_emit_nothing() {
        let state = NavigatorState::new(ymd(2024, 3, 9));
        let next = state.reduce(NavCommand::NextMonth, ymd(2024, 3, 9));
        assert!(next.effects.is_empty());
        assert_eq!(next.state.month_anchor(), ymd(2024, 4, 1));
        assert_eq!(next.state.selected_date(), ymd(2024, 3, 9));
    }

    #[test]
    fn select_today_in_other_year_same_month_moves_anchor() {
        let state = NavigatorState::new(ymd(2023, 3, 9));
        let next = state.reduce(NavCommand::SelectToday, ymd(2024, 3, 20));
        assert_eq!(next.state.month_anchor(), ymd(2024, 3, 1));
        assert_eq!(next.state.selected_date(), ymd(2024, 3, 20));
    }

    #[test]
    fn invalid_query_has_notice() {
        let (state, source) = NavigatorState::from_query(Some("2023-02-30"), ymd(2024, 1, 5));
        assert_eq!(state.selected_date(), ymd(2024, 1, 5));
        assert!(source.notice().is_some());
        let (_, missing) = NavigatorState::from_query(None, ymd(2024, 1, 5));
        assert_eq!(missing, DateSource::Missing);
        assert!(missing.notice().is_none());
    }
}
