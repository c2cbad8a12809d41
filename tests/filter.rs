use std::fs;
use std::path::PathBuf;

use predictions_terminal::filter::{
    CategoryFilter, EmptyState, FilterMemo, empty_state, filter_fixtures,
};
use predictions_terminal::fixtures::{Fixture, fixtures_from_response_json};
use predictions_terminal::outcome::{OutcomeTag, Probabilities, classify};

fn load_fixtures() -> Vec<Fixture> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("predictions_response.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    fixtures_from_response_json(&raw).expect("fixture should parse")
}

fn ids(fixtures: &[Fixture]) -> Vec<u64> {
    fixtures.iter().map(|f| f.id).collect()
}

#[test]
fn all_sorts_by_league_and_keeps_source_order() {
    let fixtures = load_fixtures();
    let out = filter_fixtures(&fixtures, "", CategoryFilter::All);
    assert_eq!(ids(&out), vec![1003, 1001, 1002, 1006, 1005, 1004, 1007]);
    assert!(out.windows(2).all(|w| w[0].league_id <= w[1].league_id));
}

#[test]
fn search_matches_teams_and_league_case_insensitively() {
    let fixtures = load_fixtures();
    assert_eq!(
        ids(&filter_fixtures(&fixtures, "united", CategoryFilter::All)),
        vec![1001, 1006, 1005]
    );
    assert_eq!(
        ids(&filter_fixtures(&fixtures, "  UNITED ", CategoryFilter::All)),
        vec![1001, 1006, 1005]
    );
    assert_eq!(
        ids(&filter_fixtures(&fixtures, "liga", CategoryFilter::All)),
        vec![1004, 1007]
    );
    assert!(filter_fixtures(&fixtures, "zzz", CategoryFilter::All).is_empty());
}

#[test]
fn categories_use_first_prediction_only() {
    let fixtures = load_fixtures();
    let pick = |c| ids(&filter_fixtures(&fixtures, "", c));

    assert_eq!(pick(CategoryFilter::HomeWin), vec![1001, 1002]);
    assert_eq!(pick(CategoryFilter::Draw), vec![1006]);
    assert_eq!(pick(CategoryFilter::AwayWin), vec![1004, 1007]);
    // 1007 has a 60% home record, but only as its second prediction.
    assert_eq!(pick(CategoryFilter::HomeOver50), vec![1002]);
    // Exactly 50 is not over 50.
    assert_eq!(pick(CategoryFilter::AwayOver50), vec![1004]);
}

#[test]
fn ties_and_missing_predictions_fall_out_of_categories() {
    let fixtures = load_fixtures();
    for category in CategoryFilter::ALL_FILTERS {
        let out = filter_fixtures(&fixtures, "", category);
        let has_tie = out.iter().any(|f| f.id == 1003);
        let has_missing = out.iter().any(|f| f.id == 1005);
        let is_all = category == CategoryFilter::All;
        assert_eq!(has_tie, is_all, "{category:?}");
        assert_eq!(has_missing, is_all, "{category:?}");
    }
    assert_eq!(classify(&Probabilities::new(40.0, 40.0, 20.0)), OutcomeTag::None);
}

#[test]
fn search_and_category_combine() {
    let fixtures = load_fixtures();
    let out = filter_fixtures(&fixtures, "united", CategoryFilter::HomeWin);
    assert_eq!(ids(&out), vec![1001]);
}

#[test]
fn filtering_is_idempotent_and_leaves_input_alone() {
    let fixtures = load_fixtures();
    let before = fixtures.clone();
    for category in CategoryFilter::ALL_FILTERS {
        let once = filter_fixtures(&fixtures, "a", category);
        let twice = filter_fixtures(&once, "a", category);
        assert_eq!(ids(&once), ids(&twice), "{category:?}");
    }
    assert_eq!(fixtures, before);
}

#[test]
fn category_labels_round_trip() {
    for category in CategoryFilter::ALL_FILTERS {
        assert_eq!(CategoryFilter::from_label(category.label()), category);
    }
    assert_eq!(CategoryFilter::from_label("home over 50"), CategoryFilter::HomeOver50);
    assert_eq!(CategoryFilter::from_label("nonsense"), CategoryFilter::All);
    assert_eq!(CategoryFilter::AwayOver50.next(), CategoryFilter::All);
    assert_eq!(CategoryFilter::All.prev(), CategoryFilter::AwayOver50);
}

#[test]
fn empty_states() {
    assert_eq!(empty_state(0, 0), Some(EmptyState::NoFixtures));
    assert_eq!(empty_state(7, 0), Some(EmptyState::NoMatches));
    assert_eq!(empty_state(7, 3), None);
    assert_eq!(EmptyState::NoFixtures.message(), "No Fixtures Available");
}

#[test]
fn memo_recomputes_only_when_inputs_change() {
    let fixtures = load_fixtures();
    let mut memo = FilterMemo::new();

    assert_eq!(memo.get(1, &fixtures, "", CategoryFilter::All).len(), 7);
    // Same generation: the cached pass is returned even for a different slice.
    assert_eq!(memo.get(1, &[], "", CategoryFilter::All).len(), 7);
    assert_eq!(memo.get(2, &[], "", CategoryFilter::All).len(), 0);
    assert_eq!(memo.get(3, &fixtures, "united", CategoryFilter::All).len(), 3);
    assert_eq!(memo.get(3, &fixtures, "united", CategoryFilter::Draw).len(), 1);
    assert_eq!(memo.cached().len(), 1);
}
