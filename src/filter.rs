use crate::fixtures::Fixture;
use crate::outcome::{OutcomeTag, Probabilities, away_over_50, classify, home_over_50};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    HomeWin,
    Draw,
    AwayWin,
    HomeOver50,
    AwayOver50,
}

impl CategoryFilter {
    pub const ALL_FILTERS: [CategoryFilter; 6] = [
        CategoryFilter::All,
        CategoryFilter::HomeWin,
        CategoryFilter::Draw,
        CategoryFilter::AwayWin,
        CategoryFilter::HomeOver50,
        CategoryFilter::AwayOver50,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::HomeWin => "Home Win",
            CategoryFilter::Draw => "Draw",
            CategoryFilter::AwayWin => "Away Win",
            CategoryFilter::HomeOver50 => "Home Over 50%",
            CategoryFilter::AwayOver50 => "Away Over 50%",
        }
    }

    pub fn from_label(raw: &str) -> Self {
        let wanted = normalize_label(raw);
        Self::ALL_FILTERS
            .into_iter()
            .find(|f| normalize_label(f.label()) == wanted)
            .unwrap_or(CategoryFilter::All)
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL_FILTERS[(idx + 1) % Self::ALL_FILTERS.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        let len = Self::ALL_FILTERS.len();
        Self::ALL_FILTERS[(idx + len - 1) % len]
    }

    fn index(self) -> usize {
        Self::ALL_FILTERS
            .iter()
            .position(|f| *f == self)
            .unwrap_or(0)
    }

    pub fn accepts(self, p: &Probabilities) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::HomeWin => classify(p) == OutcomeTag::HomeWin,
            CategoryFilter::Draw => classify(p) == OutcomeTag::Draw,
            CategoryFilter::AwayWin => classify(p) == OutcomeTag::AwayWin,
            CategoryFilter::HomeOver50 => home_over_50(p),
            CategoryFilter::AwayOver50 => away_over_50(p),
        }
    }
}

fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

pub fn matches_search(fixture: &Fixture, query_lower: &str) -> bool {
    fixture.home_name().to_lowercase().contains(query_lower)
        || fixture.away_name().to_lowercase().contains(query_lower)
        || fixture.league.name.to_lowercase().contains(query_lower)
}

pub fn matches_category(fixture: &Fixture, category: CategoryFilter) -> bool {
    if category == CategoryFilter::All {
        return true;
    }
    fixture
        .first_prediction()
        .is_some_and(|p| category.accepts(p))
}

/// Search, then category, then a stable sort by league id.
pub fn filter_fixtures(fixtures: &[Fixture], search_text: &str, category: CategoryFilter) -> Vec<Fixture> {
    let query = search_text.trim().to_lowercase();
    let has_query = !query.is_empty();

    let mut out: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| !has_query || matches_search(f, &query))
        .filter(|f| matches_category(f, category))
        .cloned()
        .collect();
    out.sort_by_key(|f| f.league_id);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoFixtures,
    NoMatches,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoFixtures => "No Fixtures Available",
            EmptyState::NoMatches => "No fixtures match this filter or search",
        }
    }
}

pub fn empty_state(raw_len: usize, filtered_len: usize) -> Option<EmptyState> {
    if raw_len == 0 {
        Some(EmptyState::NoFixtures)
    } else if filtered_len == 0 {
        Some(EmptyState::NoMatches)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterMemo {
    key: Option<(u64, String, CategoryFilter)>,
    result: Vec<Fixture>,
}

impl FilterMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `generation` must change whenever `fixtures` does.
    pub fn get(
        &mut self,
        generation: u64,
        fixtures: &[Fixture],
        search_text: &str,
        category: CategoryFilter,
    ) -> &[Fixture] {
        let fresh = match &self.key {
            Some((g, s, c)) => *g == generation && s == search_text && *c == category,
            None => false,
        };
        if !fresh {
            self.result = filter_fixtures(fixtures, search_text, category);
            self.key = Some((generation, search_text.to_string(), category));
        }
        &self.result
    }

    pub fn cached(&self) -> &[Fixture] {
        &self.result
    }
}
