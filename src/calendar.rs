use chrono::{Datelike, Duration as ChronoDuration, Months, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    month_anchor: NaiveDate,
    weeks: Vec<[CalendarDay; 7]>,
}

impl CalendarGrid {
    pub fn month_anchor(&self) -> NaiveDate {
        self.month_anchor
    }

    pub fn weeks(&self) -> &[[CalendarDay; 7]] {
        &self.weeks
    }

    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> + '_ {
        self.weeks.iter().flat_map(|week| week.iter())
    }

    pub fn row_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn cell_count(&self) -> usize {
        self.weeks.len() * 7
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|week| week[0].date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|week| week[6].date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => first <= date && date <= last,
            _ => false,
        }
    }

    pub fn today_count(&self) -> usize {
        self.days().filter(|day| day.is_today).count()
    }

    pub fn selected(&self) -> Option<&CalendarDay> {
        self.days().find(|day| day.is_selected)
    }
}

/// Strict `yyyy-MM-dd` check that also rejects overflowing components such as
/// `2023-02-30` or `2023-13-01`.
pub fn is_valid_calendar_date(raw: &str) -> bool {
    parse_calendar_date(raw).is_some()
}

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != 4 && *idx != 7)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let year = raw[0..4].parse::<i32>().ok()?;
    let month = raw[5..7].parse::<u32>().ok()?;
    let day = raw[8..10].parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    // Reconstruction must give back exactly what was asked for.
    if date.year() != year || date.month() != month || date.day() != day {
        return None;
    }
    Some(date)
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    first_day_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

pub fn shift_month(anchor: NaiveDate, delta: i32) -> NaiveDate {
    let start = first_day_of_month(anchor);
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn month_title(anchor: NaiveDate) -> String {
    let name = MONTH_NAMES[anchor.month0() as usize];
    format!("{name} {}", anchor.year())
}

pub fn long_date_label(date: NaiveDate) -> String {
    let name = MONTH_NAMES[date.month0() as usize];
    format!("{name} {}, {}", date.day(), date.year())
}

pub fn build_grid(month_anchor: NaiveDate, today: NaiveDate, selected_date: NaiveDate) -> CalendarGrid {
    let month_start = first_day_of_month(month_anchor);
    let month_end = last_day_of_month(month_anchor);

    let lead = month_start.weekday().num_days_from_sunday() as i64;
    let trail = 6 - month_end.weekday().num_days_from_sunday() as i64;
    let grid_start = month_start
        .checked_sub_signed(ChronoDuration::days(lead))
        .unwrap_or(month_start);
    let grid_end = month_end
        .checked_add_signed(ChronoDuration::days(trail))
        .unwrap_or(month_end);

    let mut weeks = Vec::with_capacity(6);
    let mut week_start = grid_start;
    while week_start <= grid_end {
        let week: [CalendarDay; 7] = std::array::from_fn(|offset| {
            let date = week_start
                .checked_add_signed(ChronoDuration::days(offset as i64))
                .unwrap_or(grid_end);
            CalendarDay {
                date,
                in_current_month: same_month(date, month_start),
                is_today: date == today,
                is_selected: date == selected_date,
            }
        });
        weeks.push(week);
        match week_start.checked_add_signed(ChronoDuration::days(7)) {
            Some(next) => week_start = next,
            None => break,
        }
    }

    CalendarGrid {
        month_anchor: month_start,
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_rejects_loose_shapes() {
        assert!(parse_calendar_date("2024-3-09").is_none());
        assert!(parse_calendar_date("2024/03/09").is_none());
        assert!(parse_calendar_date(" 2024-03-09").is_none());
        assert!(parse_calendar_date("2024-03-0a").is_none());
        assert!(parse_calendar_date("").is_none());
        assert_eq!(parse_calendar_date("2024-02-29"), Some(ymd(2024, 2, 29)));
    }

    #[test]
    fn month_edges() {
        assert_eq!(first_day_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 1));
        assert_eq!(last_day_of_month(ymd(2024, 2, 17)), ymd(2024, 2, 29));
        assert_eq!(last_day_of_month(ymd(2023, 2, 1)), ymd(2023, 2, 28));
        assert_eq!(last_day_of_month(ymd(2023, 12, 31)), ymd(2023, 12, 31));
    }

    #[test]
    fn shift_month_crosses_years() {
        assert_eq!(shift_month(ymd(2024, 1, 31), -1), ymd(2023, 12, 1));
        assert_eq!(shift_month(ymd(2023, 12, 15), 1), ymd(2024, 1, 1));
        assert_eq!(shift_month(ymd(2024, 5, 1), 0), ymd(2024, 5, 1));
    }

    #[test]
    fn labels() {
        assert_eq!(month_title(ymd(2024, 3, 1)), "March 2024");
        assert_eq!(long_date_label(ymd(2024, 3, 9)), "March 9, 2024");
        assert_eq!(format_calendar_date(ymd(2024, 3, 9)), "2024-03-09");
    }

    #[test]
    fn february_starting_sunday_fits_four_rows() {
        // 2015-02-01 is a Sunday and 2015 is not a leap year.
        let grid = build_grid(ymd(2015, 2, 1), ymd(2015, 2, 10), ymd(2015, 2, 10));
        assert_eq!(grid.row_count(), 4);
        assert!(grid.days().all(|d| d.in_current_month));
    }
}
