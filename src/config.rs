use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATASET: &str = "dados-completos-Ituano.csv";
pub const DEFAULT_TARGET_TEAM: &str = "Ituano";
pub const DEFAULT_MIN_TOURNAMENT_MATCHES: usize = 5;
pub const DEFAULT_RANKING_LIMIT: usize = 5;
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub target_team: String,
    pub min_tournament_matches: usize,
    pub ranking_limit: usize,
    pub confidence_level: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            target_team: DEFAULT_TARGET_TEAM.to_string(),
            min_tournament_matches: DEFAULT_MIN_TOURNAMENT_MATCHES,
            ranking_limit: DEFAULT_RANKING_LIMIT,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl DashboardConfig {
    /// Reads `CLUB_*` variables. Call `load_env_files` first to pick up `.env` files.
    pub fn from_env() -> Result<Self> {
        let dataset_path = env::var("CLUB_DATASET")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET));
        let target_team = env::var("CLUB_TARGET_TEAM")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TARGET_TEAM.to_string());
        let min_tournament_matches = env::var("CLUB_MIN_TOURNAMENT_MATCHES")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_TOURNAMENT_MATCHES)
            .max(1);
        let ranking_limit = env::var("CLUB_RANKING_LIMIT")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .clamp(1, 50);
        let confidence_level = env::var("CLUB_CONFIDENCE_LEVEL")
            .ok()
            .and_then(|val| val.trim().parse::<f64>().ok())
            .unwrap_or(DEFAULT_CONFIDENCE_LEVEL);

        let cfg = Self {
            dataset_path,
            target_team,
            min_tournament_matches,
            ranking_limit,
            confidence_level,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(anyhow!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            ));
        }
        if self.target_team.trim().is_empty() {
            return Err(anyhow!("target team must not be empty"));
        }
        Ok(())
    }
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}
