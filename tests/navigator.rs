use chrono::NaiveDate;

use predictions_terminal::navigator::{
    DateNavigator, DateSource, NavCommand, NavEffect, NavigationSink, NavigatorState,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[derive(Debug, Default)]
struct RecordingSink {
    published: Vec<String>,
    closes: usize,
    order: Vec<&'static str>,
}

impl NavigationSink for RecordingSink {
    fn publish_selected_date(&mut self, date: &str) {
        self.published.push(date.to_string());
        self.order.push("publish");
    }

    fn request_close(&mut self) {
        self.closes += 1;
        self.order.push("close");
    }
}

#[test]
fn select_day_within_month_keeps_anchor() {
    let today = ymd(2024, 3, 15);
    let state = NavigatorState::new(ymd(2024, 3, 9));
    let next = state.reduce(NavCommand::SelectDay(ymd(2024, 3, 22)), today);

    assert_eq!(next.state.selected_date(), ymd(2024, 3, 22));
    assert_eq!(next.state.month_anchor(), ymd(2024, 3, 1));
    assert_eq!(
        next.effects,
        vec![
            NavEffect::PublishSelectedDate("2024-03-22".to_string()),
            NavEffect::RequestClose,
        ]
    );
}

#[test]
fn select_day_in_other_month_moves_anchor() {
    let today = ymd(2024, 3, 15);
    let state = NavigatorState::new(ymd(2024, 3, 9));
    // A trailing cell of the March grid.
    let next = state.reduce(NavCommand::SelectDay(ymd(2024, 4, 2)), today);
    assert_eq!(next.state.selected_date(), ymd(2024, 4, 2));
    assert_eq!(next.state.month_anchor(), ymd(2024, 4, 1));
}

#[test]
fn paging_months_keeps_selection_and_wraps_years() {
    let today = ymd(2024, 1, 10);
    let mut state = NavigatorState::new(ymd(2024, 1, 10));
    state = state.reduce(NavCommand::PrevMonth, today).state;
    assert_eq!(state.month_anchor(), ymd(2023, 12, 1));
    state = state.reduce(NavCommand::NextMonth, today).state;
    state = state.reduce(NavCommand::NextMonth, today).state;
    assert_eq!(state.month_anchor(), ymd(2024, 2, 1));
    assert_eq!(state.selected_date(), ymd(2024, 1, 10));

    let grid = state.grid(today);
    assert_eq!(grid.month_anchor(), ymd(2024, 2, 1));
    // The January selection is not in the February grid.
    assert!(grid.selected().is_none());
}

#[test]
fn navigator_runs_effects_in_order() {
    let today = ymd(2024, 3, 15);
    let mut nav = DateNavigator::new(NavigatorState::new(ymd(2024, 1, 5)), RecordingSink::default());

    nav.dispatch(NavCommand::NextMonth, today);
    assert!(nav.sink().published.is_empty());
    assert_eq!(nav.sink().closes, 0);

    let state = nav.dispatch(NavCommand::SelectToday, today);
    assert_eq!(state.selected_date(), today);
    assert_eq!(state.month_anchor(), ymd(2024, 3, 1));
    assert_eq!(nav.sink().published, vec!["2024-03-15".to_string()]);
    assert_eq!(nav.sink().order, vec!["publish", "close"]);
}

#[test]
fn reselecting_same_day_still_publishes() {
    let today = ymd(2024, 3, 15);
    let mut nav = DateNavigator::new(NavigatorState::new(today), RecordingSink::default());
    nav.dispatch(NavCommand::SelectDay(today), today);
    nav.dispatch(NavCommand::SelectDay(today), today);
    assert_eq!(nav.sink().published.len(), 2);
    assert_eq!(nav.sink().closes, 2);
}

#[test]
fn initial_state_from_query() {
    let today = ymd(2024, 5, 1);

    let (state, source) = NavigatorState::from_query(Some("2024-02-29"), today);
    assert_eq!(source, DateSource::Query);
    assert_eq!(state.selected_date(), ymd(2024, 2, 29));
    assert_eq!(state.month_anchor(), ymd(2024, 2, 1));

    let (state, source) = NavigatorState::from_query(Some("not-a-date"), today);
    assert_eq!(source, DateSource::Invalid("not-a-date".to_string()));
    assert_eq!(state.selected_date(), today);
    assert_eq!(
        source.notice().as_deref(),
        Some("The date provided is not valid. Showing fixtures for today's date instead.")
    );

    let (state, source) = NavigatorState::from_query(None, today);
    assert_eq!(source, DateSource::Missing);
    assert_eq!(state.selected_date_string(), "2024-05-01");
}
