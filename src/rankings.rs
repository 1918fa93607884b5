use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Observation, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Goals,
    Passes,
    Saves,
    ShotsOnTarget,
    Tackles,
    MinutesPlayed,
    Rating,
    AccuratePasses,
    DuelsWon,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::Goals,
        Metric::Passes,
        Metric::Saves,
        Metric::ShotsOnTarget,
        Metric::Tackles,
        Metric::MinutesPlayed,
        Metric::Rating,
        Metric::AccuratePasses,
        Metric::DuelsWon,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Metric::Goals => "statistics_goals",
            Metric::Passes => "statistics_total_pass",
            Metric::Saves => "statistics_saves",
            Metric::ShotsOnTarget => "statistics_on_target_scoring_attempt",
            Metric::Tackles => "statistics_total_tackle",
            Metric::MinutesPlayed => "statistics_minutes_played",
            Metric::Rating => "statistics_rating",
            Metric::AccuratePasses => "statistics_accurate_pass",
            Metric::DuelsWon => "statistics_duel_won",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Goals => "Goals",
            Metric::Passes => "Passes",
            Metric::Saves => "Saves",
            Metric::ShotsOnTarget => "Shots on Target",
            Metric::Tackles => "Tackles",
            Metric::MinutesPlayed => "Minutes Played",
            Metric::Rating => "Rating",
            Metric::AccuratePasses => "Accurate Passes",
            Metric::DuelsWon => "Duels Won",
        }
    }

    /// Matches a label, a column name, or a snake_case key such as `shots_on_target`.
    pub fn from_key(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Metric::ALL.into_iter().find(|m| {
            m.column() == key
                || m.label().to_ascii_lowercase().replace(' ', "_") == key
                || m.column().trim_start_matches("statistics_") == key
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aggregation {
    #[default]
    Total,
    PerGame,
}

impl Aggregation {
    pub fn label(self) -> &'static str {
        match self {
            Aggregation::Total => "Total",
            Aggregation::PerGame => "Per Game",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankingKind {
    #[default]
    Best,
    Worst,
}

impl RankingKind {
    pub fn label(self) -> &'static str {
        match self {
            RankingKind::Best => "Top Best",
            RankingKind::Worst => "Top Worst",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub metric: Option<Metric>,
    pub position: Option<Position>,
    pub year: Option<i32>,
    pub aggregation: Aggregation,
    pub kind: RankingKind,
    pub limit: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            metric: Some(Metric::Goals),
            position: None,
            year: None,
            aggregation: Aggregation::Total,
            kind: RankingKind::Best,
            limit: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player: String,
    pub value: f64,
    pub games: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub metric: Option<Metric>,
    pub aggregation: Aggregation,
    pub kind: RankingKind,
    pub entries: Vec<RankingEntry>,
    pub warning: Option<String>,
}

/// Ranks players of the given rows. `columns` is the dataset header, used to
/// tell an absent metric column apart from one that is merely empty.
pub fn rank_players(rows: &[Observation], columns: &[String], query: &RankingQuery) -> RankingOutcome {
    let mut out = RankingOutcome {
        metric: query.metric,
        aggregation: query.aggregation,
        kind: query.kind,
        ..RankingOutcome::default()
    };
    let Some(metric) = query.metric else {
        out.warning = Some("no metric selected for the player ranking".to_string());
        return out;
    };
    let column = metric.column();
    if !columns.iter().any(|c| c == column) {
        out.warning = Some(format!(
            "metric '{}' (column '{column}') was not found in the dataset",
            metric.label()
        ));
        return out;
    }

    let mut totals: BTreeMap<&str, (f64, BTreeSet<u32>)> = BTreeMap::new();
    for row in rows {
        if query.year.is_some() && row.year != query.year {
            continue;
        }
        if query.position.is_some() && row.position != query.position {
            continue;
        }
        let Some(player) = row.player_name.as_deref() else {
            continue;
        };
        let slot = totals.entry(player).or_default();
        slot.0 += row.stat(column).unwrap_or(0.0);
        slot.1.insert(row.game);
    }

    let mut entries = totals
        .into_iter()
        .map(|(player, (sum, games))| {
            let value = match query.aggregation {
                Aggregation::Total => sum,
                Aggregation::PerGame => sum / games.len() as f64,
            };
            RankingEntry {
                player: player.to_string(),
                value,
                games: games.len(),
            }
        })
        .collect::<Vec<_>>();

    match query.kind {
        RankingKind::Best => {
            entries.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.player.cmp(&b.player)));
        }
        RankingKind::Worst => {
            entries.retain(|e| e.value > 0.0);
            entries.sort_by(|a, b| a.value.total_cmp(&b.value).then_with(|| a.player.cmp(&b.player)));
        }
    }
    entries.truncate(query.limit);
    out.entries = entries;
    out
}

pub fn rank_dataset(dataset: &Dataset, target_team: &str, query: &RankingQuery) -> RankingOutcome {
    rank_players(&dataset.team_rows(target_team), &dataset.columns, query)
}

/// Distinct positions present in the rows, sorted.
pub fn available_positions(rows: &[Observation]) -> Vec<Position> {
    rows.iter()
        .filter_map(|row| row.position.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn available_years(rows: &[Observation]) -> Vec<i32> {
    rows.iter()
        .filter_map(|row| row.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_keys_resolve() {
        assert_eq!(Metric::from_key("goals"), Some(Metric::Goals));
        assert_eq!(Metric::from_key("Shots on Target"), Some(Metric::ShotsOnTarget));
        assert_eq!(Metric::from_key("statistics_total_pass"), Some(Metric::Passes));
        assert_eq!(Metric::from_key("duel_won"), Some(Metric::DuelsWon));
        assert_eq!(Metric::from_key("corners"), None);
    }

    #[test]
    fn unselected_metric_warns() {
        let query = RankingQuery {
            metric: None,
            ..RankingQuery::default()
        };
        let out = rank_players(&[], &[], &query);
        assert!(out.entries.is_empty());
        assert!(out.warning.is_some());
    }
}
