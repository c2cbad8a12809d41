use chrono::{Datelike, NaiveDate, Weekday};

use predictions_terminal::calendar::{
    build_grid, first_day_of_month, format_calendar_date, is_valid_calendar_date,
    last_day_of_month, long_date_label, month_title, shift_month,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

#[test]
fn validator_accepts_real_dates_only() {
    for ok in ["2024-03-09", "2023-02-28", "2024-02-29", "2000-02-29", "1999-12-31"] {
        assert!(is_valid_calendar_date(ok), "{ok} should be valid");
    }
    for bad in [
        "2023-02-30",
        "2023-13-01",
        "23-1-1",
        "2023-02-29",
        "1900-02-29",
        "2024-13-01",
        "2024-00-10",
        "2024-04-31",
        "2024-3-9",
        "2024/03/09",
        " 2024-03-09",
        "2024-03-09T00:00",
        "abcd-ef-gh",
        "",
    ] {
        assert!(!is_valid_calendar_date(bad), "{bad:?} should be rejected");
    }
}

#[test]
fn march_2024_grid() {
    let today = ymd(2024, 3, 15);
    let selected = ymd(2024, 3, 9);
    let grid = build_grid(ymd(2024, 3, 1), today, selected);

    assert_eq!(grid.first_day(), Some(ymd(2024, 2, 25)));
    assert_eq!(grid.last_day(), Some(ymd(2024, 4, 6)));
    assert_eq!(grid.cell_count(), 42);
    assert_eq!(grid.row_count(), 6);

    let in_month = grid.days().filter(|d| d.in_current_month).count();
    assert_eq!(in_month, 31);
    assert_eq!(grid.today_count(), 1);
    assert_eq!(grid.selected().map(|d| d.date), Some(selected));

    let leading = grid.weeks()[0]
        .iter()
        .take_while(|d| !d.in_current_month)
        .count();
    assert_eq!(leading, 5);
}

#[test]
fn grid_uses_anchor_month_even_mid_month() {
    let grid = build_grid(ymd(2024, 3, 20), ymd(2024, 3, 20), ymd(2024, 3, 20));
    assert_eq!(grid.month_anchor(), ymd(2024, 3, 1));
    assert_eq!(grid.first_day(), Some(ymd(2024, 2, 25)));
}

#[test]
fn four_row_month() {
    // February 2015 starts on a Sunday and has 28 days.
    let grid = build_grid(ymd(2015, 2, 1), ymd(2015, 2, 1), ymd(2015, 2, 1));
    assert_eq!(grid.row_count(), 4);
    assert!(grid.days().all(|d| d.in_current_month));
}

#[test]
fn grid_shape_holds_for_every_month() {
    let mut anchor = ymd(1999, 1, 1);
    let outside = ymd(1990, 1, 1);
    while anchor <= ymd(2031, 12, 1) {
        let grid = build_grid(anchor, outside, outside);
        let days = grid.days().collect::<Vec<_>>();

        assert_eq!(days.len() % 7, 0, "{anchor}");
        assert!((4..=6).contains(&grid.row_count()), "{anchor}");
        assert_eq!(days[0].date.weekday(), Weekday::Sun, "{anchor}");
        assert_eq!(days[days.len() - 1].date.weekday(), Weekday::Sat, "{anchor}");
        for pair in days.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date), "{anchor}");
        }

        let month_len = last_day_of_month(anchor).day() as usize;
        assert_eq!(days.iter().filter(|d| d.in_current_month).count(), month_len);
        assert!(grid.contains(first_day_of_month(anchor)));
        assert!(grid.contains(last_day_of_month(anchor)));
        assert_eq!(grid.today_count(), 0);
        assert!(grid.selected().is_none());

        anchor = shift_month(anchor, 1);
    }
}

#[test]
fn today_marked_in_trailing_cells() {
    // April 6 2024 sits in the trailing week of the March grid.
    let grid = build_grid(ymd(2024, 3, 1), ymd(2024, 4, 6), ymd(2024, 3, 9));
    assert_eq!(grid.today_count(), 1);
    let today = grid.days().find(|d| d.is_today).expect("today present");
    assert!(!today.in_current_month);
}

#[test]
fn labels_and_formatting() {
    assert_eq!(format_calendar_date(ymd(2024, 3, 9)), "2024-03-09");
    assert_eq!(month_title(ymd(2024, 12, 1)), "December 2024");
    assert_eq!(long_date_label(ymd(2024, 3, 9)), "March 9, 2024");
    assert_eq!(shift_month(ymd(2024, 1, 31), -1), ymd(2023, 12, 1));
    assert_eq!(shift_month(ymd(2024, 12, 15), 1), ymd(2025, 1, 1));
    assert_eq!(last_day_of_month(ymd(2024, 2, 10)), ymd(2024, 2, 29));
}
