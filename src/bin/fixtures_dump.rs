use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use predictions_terminal::config::flag_value;
use predictions_terminal::filter::{CategoryFilter, empty_state, filter_fixtures};
use predictions_terminal::fixtures::fixtures_from_response_json;
use predictions_terminal::outcome::{classify, outcome_label};

fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = args
        .first()
        .filter(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/predictions_response.json"));
    let search = flag_value(&args, "--search").unwrap_or_default();
    let category = flag_value(&args, "--category")
        .map(|raw| CategoryFilter::from_label(&raw))
        .unwrap_or_default();

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read response file {}", path.display()))?;
    let fixtures = fixtures_from_response_json(&raw)?;
    let visible = filter_fixtures(&fixtures, &search, category);

    println!(
        "{} | filter {} | search \"{}\" | {} of {} fixtures",
        path.display(),
        category.label(),
        search,
        visible.len(),
        fixtures.len()
    );
    if let Some(empty) = empty_state(fixtures.len(), visible.len()) {
        println!("{}", empty.message());
        return Ok(());
    }

    for f in &visible {
        let pick = match f.first_prediction() {
            Some(p) => format!(
                "H{:>5.1} D{:>5.1} A{:>5.1}  {}",
                p.home,
                p.draw,
                p.away,
                outcome_label(classify(p))
            ),
            None => "no prediction".to_string(),
        };
        println!(
            "{:>6}  {:<5}  {:<22}  {} vs {}  {}",
            f.league_id,
            f.kickoff_time(),
            f.league_label(),
            f.home_label(),
            f.away_label(),
            pick
        );
    }
    Ok(())
}
