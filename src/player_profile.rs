use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dataset::{Observation, Position, STAT_PREFIX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLine {
    pub column: String,
    pub name: String,
    pub total: f64,
    /// Mean over the rows where the statistic is present; NaN when none are.
    pub per_game: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player: String,
    pub position: Option<Position>,
    pub games: usize,
    pub substitute_appearances: usize,
    pub captaincies: usize,
    pub stats: Vec<StatLine>,
}

pub fn player_names(rows: &[Observation]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.player_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// `statistics_total_pass` -> `Total Pass`
pub fn display_name(column: &str) -> String {
    column
        .strip_prefix(STAT_PREFIX)
        .unwrap_or(column)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn player_profile(rows: &[Observation], stat_columns: &[String], player: &str) -> Option<PlayerProfile> {
    let player_rows = rows
        .iter()
        .filter(|row| row.player_name.as_deref() == Some(player))
        .collect::<Vec<_>>();
    if player_rows.is_empty() {
        return None;
    }

    let games = player_rows.iter().map(|row| row.game).collect::<BTreeSet<_>>().len();
    let position = player_rows.iter().rev().find_map(|row| row.position.clone());

    let stats = stat_columns
        .iter()
        .map(|column| {
            let values = player_rows
                .iter()
                .filter_map(|row| row.stat(column))
                .collect::<Vec<_>>();
            let total = values.iter().sum::<f64>();
            let per_game = if values.is_empty() {
                f64::NAN
            } else {
                total / values.len() as f64
            };
            StatLine {
                column: column.clone(),
                name: display_name(column),
                total,
                per_game,
            }
        })
        .collect();

    Some(PlayerProfile {
        player: player.to_string(),
        position,
        games,
        substitute_appearances: player_rows.iter().filter(|r| r.player_sub == Some(true)).count(),
        captaincies: player_rows.iter().filter(|r| r.player_captain == Some(true)).count(),
        stats,
    })
}
