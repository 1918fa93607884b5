use std::collections::VecDeque;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::dataset::{self, Dataset, Observation, Position};
use crate::rankings::{Aggregation, Metric, RankingKind, RankingQuery};

const MAX_LOGS: usize = 200;

/// The filter choices one report is built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub metric: Option<Metric>,
    pub position: Option<Position>,
    pub year: Option<i32>,
    pub aggregation: Aggregation,
    pub ranking: RankingKind,
    pub player: Option<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            metric: Some(Metric::Goals),
            position: None,
            year: None,
            aggregation: Aggregation::Total,
            ranking: RankingKind::Best,
            player: None,
        }
    }
}

impl Selection {
    pub fn ranking_query(&self, limit: usize) -> RankingQuery {
        RankingQuery {
            metric: self.metric,
            position: self.position.clone(),
            year: self.year,
            aggregation: self.aggregation,
            kind: self.ranking,
            limit,
        }
    }
}

/// `config` and `dataset` stay private so the cached team rows can only be
/// rebuilt through `set_target_team`.
pub struct DashboardState {
    config: DashboardConfig,
    dataset: Dataset,
    pub selection: Selection,
    pub logs: VecDeque<String>,
    team_rows: Vec<Observation>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig, dataset: Dataset) -> Self {
        let team_rows = dataset.team_rows(&config.target_team);
        let mut state = Self {
            config,
            dataset,
            selection: Selection::default(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            team_rows,
        };
        state.push_log(format!(
            "[INFO] Loaded {} rows ({} for {})",
            state.dataset.rows.len(),
            state.team_rows.len(),
            state.config.target_team
        ));
        for skipped in state.dataset.skipped.clone() {
            state.push_log(format!("[WARN] Skipped row {skipped}"));
        }
        if state.team_rows.is_empty() {
            let msg = format!(
                "[WARN] No rows with time_alvo = '{}'",
                state.config.target_team
            );
            state.push_log(msg);
        }
        state
    }

    pub fn load(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        let dataset = dataset::load_dataset(&config.dataset_path)?;
        Ok(Self::new(config, dataset))
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Switches the analysed team and rebuilds its row cache.
    pub fn set_target_team(&mut self, team: impl Into<String>) {
        let team = team.into();
        if team == self.config.target_team {
            return;
        }
        self.team_rows = self.dataset.team_rows(&team);
        self.push_log(format!(
            "[INFO] Target team set to {team} ({} rows)",
            self.team_rows.len()
        ));
        if self.team_rows.is_empty() {
            self.push_log(format!("[WARN] No rows with time_alvo = '{team}'"));
        }
        self.config.target_team = team;
    }

    pub fn team_rows(&self) -> &[Observation] {
        &self.team_rows
    }

    pub fn ranking_query(&self) -> RankingQuery {
        self.selection.ranking_query(self.config.ranking_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut state = DashboardState::new(DashboardConfig::default(), Dataset::default());
        for i in 0..(MAX_LOGS + 25) {
            state.push_log(format!("[INFO] line {i}"));
        }
        assert_eq!(state.logs.len(), MAX_LOGS);
        assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 224"));
    }

    #[test]
    fn empty_team_is_logged_as_warning() {
        let state = DashboardState::new(DashboardConfig::default(), Dataset::default());
        assert!(state.logs.iter().any(|l| l.starts_with("[WARN] No rows")));
    }

    #[test]
    fn switching_team_rebuilds_rows() {
        let raw = "time_alvo,jogo,home_team,away_team,home_score,away_score,home_or_away,player_name\n\
                   Ituano,1,Ituano,Santos,1,0,home,Ana\n\
                   Santos,2,Santos,Ituano,2,2,home,Rui\n\
                   Santos,3,Ituano,Santos,0,1,away,Rui\n";
        let dataset = dataset::parse_dataset_csv(raw).unwrap();
        let cfg = DashboardConfig {
            target_team: "Ituano".to_string(),
            ..DashboardConfig::default()
        };
        let mut state = DashboardState::new(cfg, dataset);
        assert_eq!(state.team_rows().len(), 1);

        state.set_target_team("Santos");
        assert_eq!(state.config().target_team, "Santos");
        assert_eq!(state.team_rows().len(), 2);
        assert!(state.team_rows().iter().all(|r| r.target_team == "Santos"));
        assert!(state.logs.back().unwrap().contains("Santos (2 rows)"));
    }
}
