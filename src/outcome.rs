use serde::{Deserialize, Serialize};

use crate::fixtures::null_default;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Probabilities {
    #[serde(default, deserialize_with = "null_default")]
    pub home: f32,
    #[serde(default, deserialize_with = "null_default")]
    pub draw: f32,
    #[serde(default, deserialize_with = "null_default")]
    pub away: f32,
}

impl Probabilities {
    pub fn new(home: f32, draw: f32, away: f32) -> Self {
        Self { home, draw, away }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeTag {
    HomeWin,
    Draw,
    AwayWin,
    None,
}

/// Strict majority: a tie for the top value never classifies.
pub fn classify(p: &Probabilities) -> OutcomeTag {
    if p.home > p.draw && p.home > p.away {
        OutcomeTag::HomeWin
    } else if p.draw > p.home && p.draw > p.away {
        OutcomeTag::Draw
    } else if p.away > p.home && p.away > p.draw {
        OutcomeTag::AwayWin
    } else {
        OutcomeTag::None
    }
}

pub fn home_over_50(p: &Probabilities) -> bool {
    p.home > 50.0
}

pub fn away_over_50(p: &Probabilities) -> bool {
    p.away > 50.0
}

pub fn outcome_label(tag: OutcomeTag) -> &'static str {
    match tag {
        OutcomeTag::HomeWin => "HOME",
        OutcomeTag::Draw => "DRAW",
        OutcomeTag::AwayWin => "AWAY",
        OutcomeTag::None => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_majority() {
        assert_eq!(classify(&Probabilities::new(60.0, 20.0, 20.0)), OutcomeTag::HomeWin);
        assert_eq!(classify(&Probabilities::new(25.0, 50.0, 25.0)), OutcomeTag::Draw);
        assert_eq!(classify(&Probabilities::new(10.0, 30.0, 60.0)), OutcomeTag::AwayWin);
        assert_eq!(classify(&Probabilities::new(40.0, 40.0, 20.0)), OutcomeTag::None);
        assert_eq!(classify(&Probabilities::new(20.0, 40.0, 40.0)), OutcomeTag::None);
        assert_eq!(classify(&Probabilities::new(33.0, 33.0, 33.0)), OutcomeTag::None);
    }

    #[test]
    fn over_50_is_strict() {
        assert!(home_over_50(&Probabilities::new(55.0, 30.0, 15.0)));
        assert!(!home_over_50(&Probabilities::new(50.0, 30.0, 20.0)));
        assert!(away_over_50(&Probabilities::new(10.0, 20.0, 70.0)));
        assert!(!away_over_50(&Probabilities::new(10.0, 40.0, 50.0)));
    }

    #[test]
    fn sums_are_not_validated() {
        assert_eq!(classify(&Probabilities::new(90.0, 80.0, 70.0)), OutcomeTag::HomeWin);
    }
}
