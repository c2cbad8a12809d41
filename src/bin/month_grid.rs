use anyhow::{Context, anyhow};
use chrono::{Datelike, Local, NaiveDate};
use predictions_terminal::calendar::{
    WEEKDAY_LABELS, build_grid, first_day_of_month, month_title, parse_calendar_date,
};
use predictions_terminal::config::flag_value;

fn parse_date_arg(args: &[String], name: &str) -> anyhow::Result<Option<NaiveDate>> {
    let Some(raw) = flag_value(args, name) else {
        return Ok(None);
    };
    // `--month 2024-03` is accepted as the first of that month.
    let full = if raw.len() == 7 { format!("{raw}-01") } else { raw.clone() };
    parse_calendar_date(&full)
        .map(Some)
        .ok_or_else(|| anyhow!("{name} expects YYYY-MM-DD, got {raw}"))
}

fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let today = parse_date_arg(&args, "--today")
        .context("parse --today")?
        .unwrap_or_else(|| Local::now().date_naive());
    let selected = parse_date_arg(&args, "--selected")
        .context("parse --selected")?
        .unwrap_or(today);
    let month = parse_date_arg(&args, "--month")
        .context("parse --month")?
        .unwrap_or(selected);

    let grid = build_grid(first_day_of_month(month), today, selected);
    println!("{}", month_title(grid.month_anchor()));
    println!(
        "{}",
        WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{label:>4}"))
            .collect::<String>()
    );
    for week in grid.weeks() {
        let row = week
            .iter()
            .map(|day| {
                let marker = if day.is_today {
                    '*'
                } else if day.is_selected {
                    '>'
                } else if !day.in_current_month {
                    '.'
                } else {
                    ' '
                };
                format!("{marker}{:>3}", day.date.day())
            })
            .collect::<String>();
        println!("{row}");
    }
    println!(
        "{} rows, {} cells (* today, > selected, . outside month)",
        grid.row_count(),
        grid.cell_count()
    );
    Ok(())
}
