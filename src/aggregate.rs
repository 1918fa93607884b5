use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dataset::{Observation, Venue};
use crate::outcome::{MatchResult, derive_result, opponent};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub index: usize,
    pub game: u32,
    pub result: MatchResult,
    pub win_rate_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueSplit {
    pub venue: Venue,
    pub matches: usize,
    pub wins: usize,
    /// NaN when no matches were played at this venue.
    pub win_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentGame {
    pub number_in_tournament: usize,
    pub game: u32,
    pub opponent: String,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub result: MatchResult,
    pub team_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentPerformance {
    pub tournament: String,
    pub games: Vec<TournamentGame>,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub mean_rating: Option<f64>,
}

/// First row of each game, in file order.
pub fn unique_matches(rows: &[Observation]) -> Vec<&Observation> {
    let mut seen = HashSet::new();
    rows.iter().filter(|row| seen.insert(row.game)).collect()
}

/// Like `unique_matches` but ordered by game number.
pub fn matches_by_game(rows: &[Observation]) -> Vec<&Observation> {
    let mut matches = unique_matches(rows);
    matches.sort_by_key(|row| row.game);
    matches
}

pub fn cumulative_win_rate(rows: &[Observation], target_team: &str) -> Vec<CumulativePoint> {
    let mut wins = 0usize;
    matches_by_game(rows)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let result = derive_result(row, target_team);
            if result.is_win() {
                wins += 1;
            }
            let played = idx + 1;
            CumulativePoint {
                index: played,
                game: row.game,
                result,
                win_rate_pct: wins as f64 / played as f64 * 100.0,
            }
        })
        .collect()
}

pub fn venue_split(rows: &[Observation], target_team: &str) -> Vec<VenueSplit> {
    let matches = unique_matches(rows);
    [Venue::Home, Venue::Away]
        .into_iter()
        .map(|venue| {
            let at_venue = matches
                .iter()
                .filter(|row| row.venue == Some(venue))
                .collect::<Vec<_>>();
            let wins = at_venue
                .iter()
                .filter(|row| derive_result(row, target_team).is_win())
                .count();
            let played = at_venue.len();
            VenueSplit {
                venue,
                matches: played,
                wins,
                win_pct: percentage(wins, played),
            }
        })
        .collect()
}

pub fn tournament_performance(
    rows: &[Observation],
    target_team: &str,
    min_matches: usize,
) -> Vec<TournamentPerformance> {
    let mut by_tournament: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for row in matches_by_game(rows) {
        let Some(tournament) = row.tournament.as_deref() else {
            continue;
        };
        by_tournament.entry(tournament).or_default().push(row);
    }

    by_tournament
        .into_iter()
        .filter(|(_, games)| games.len() >= min_matches)
        .map(|(tournament, games)| {
            let games = games
                .into_iter()
                .enumerate()
                .map(|(idx, row)| TournamentGame {
                    number_in_tournament: idx + 1,
                    game: row.game,
                    opponent: opponent(row, target_team).to_string(),
                    home_score: row.home_score,
                    away_score: row.away_score,
                    result: derive_result(row, target_team),
                    team_rating: game_mean_rating(rows, row.game),
                })
                .collect::<Vec<_>>();
            summarize_tournament(tournament, games)
        })
        .collect()
}

fn summarize_tournament(tournament: &str, games: Vec<TournamentGame>) -> TournamentPerformance {
    let count = |want: MatchResult| games.iter().filter(|g| g.result == want).count();
    let ratings = games.iter().filter_map(|g| g.team_rating).collect::<Vec<_>>();
    let mean_rating = (!ratings.is_empty()).then(|| ratings.iter().sum::<f64>() / ratings.len() as f64);
    TournamentPerformance {
        tournament: tournament.to_string(),
        wins: count(MatchResult::Win),
        draws: count(MatchResult::Draw),
        losses: count(MatchResult::Loss),
        mean_rating,
        games,
    }
}

/// Mean of every non-missing rating recorded for one game.
pub fn game_mean_rating(rows: &[Observation], game: u32) -> Option<f64> {
    let ratings = rows
        .iter()
        .filter(|row| row.game == game)
        .filter_map(Observation::rating)
        .collect::<Vec<_>>();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return f64::NAN;
    }
    part as f64 / whole as f64 * 100.0
}
