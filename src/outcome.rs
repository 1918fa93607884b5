use serde::{Deserialize, Serialize};

use crate::dataset::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
    Unknown,
}

impl MatchResult {
    pub fn label(self) -> &'static str {
        match self {
            MatchResult::Win => "Win",
            MatchResult::Loss => "Loss",
            MatchResult::Draw => "Draw",
            MatchResult::Unknown => "N/A",
        }
    }

    pub fn is_win(self) -> bool {
        self == MatchResult::Win
    }
}

/// Which side of the fixture the target team played on, by team name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

pub fn target_side(row: &Observation, target_team: &str) -> Option<Side> {
    if row.home_team == target_team {
        Some(Side::Home)
    } else if row.away_team == target_team {
        Some(Side::Away)
    } else {
        None
    }
}

pub fn classify(own: u16, other: u16) -> MatchResult {
    if own > other {
        MatchResult::Win
    } else if own < other {
        MatchResult::Loss
    } else {
        MatchResult::Draw
    }
}

pub fn derive_result(row: &Observation, target_team: &str) -> MatchResult {
    let Some(side) = target_side(row, target_team) else {
        return MatchResult::Unknown;
    };
    let (Some(home), Some(away)) = (row.home_score, row.away_score) else {
        return MatchResult::Unknown;
    };
    match side {
        Side::Home => classify(home, away),
        Side::Away => classify(away, home),
    }
}

pub fn opponent<'a>(row: &'a Observation, target_team: &str) -> &'a str {
    if row.home_team == target_team {
        &row.away_team
    } else {
        &row.home_team
    }
}
