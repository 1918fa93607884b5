use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::config::DashboardConfig;
use crate::dataset::Position;
use crate::rankings::{Aggregation, Metric, RankingKind};
use crate::state::Selection;

/// Value of `--name=value` or `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

pub fn path_arg(args: &[String], name: &str) -> Option<PathBuf> {
    arg_value(args, name).map(PathBuf::from)
}

pub fn apply_config_args(args: &[String], cfg: &mut DashboardConfig) -> Result<()> {
    if let Some(path) = path_arg(args, "--data") {
        cfg.dataset_path = path;
    }
    if let Some(team) = arg_value(args, "--team") {
        cfg.target_team = team;
    }
    if let Some(raw) = arg_value(args, "--min-tournament-matches") {
        cfg.min_tournament_matches = raw
            .parse::<usize>()
            .map_err(|_| anyhow!("invalid --min-tournament-matches '{raw}'"))?
            .max(1);
    }
    if let Some(raw) = arg_value(args, "--limit") {
        cfg.ranking_limit = raw
            .parse::<usize>()
            .map_err(|_| anyhow!("invalid --limit '{raw}'"))?
            .clamp(1, 50);
    }
    if let Some(raw) = arg_value(args, "--confidence") {
        cfg.confidence_level = raw
            .parse::<f64>()
            .map_err(|_| anyhow!("invalid --confidence '{raw}'"))?;
    }
    cfg.validate()
}

/// Builds the selection from flags. Unknown metrics become an unselected
/// metric so the ranking reports a warning instead of aborting the run.
pub fn selection_from_args(args: &[String]) -> Result<Selection> {
    let mut selection = Selection::default();
    if let Some(raw) = arg_value(args, "--metric") {
        selection.metric = Metric::from_key(&raw);
    }
    if let Some(raw) = arg_value(args, "--position")
        && !raw.eq_ignore_ascii_case("all")
    {
        selection.position = Position::from_user_input(&raw);
    }
    if let Some(raw) = arg_value(args, "--year")
        && !raw.eq_ignore_ascii_case("all")
    {
        let year = raw
            .parse::<i32>()
            .map_err(|_| anyhow!("invalid --year '{raw}'"))?;
        selection.year = Some(year);
    }
    if has_flag(args, "--per-game") {
        selection.aggregation = Aggregation::PerGame;
    }
    if has_flag(args, "--worst") {
        selection.ranking = RankingKind::Worst;
    }
    selection.player = arg_value(args, "--player");
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn both_flag_spellings_are_read() {
        let a = args(&["--data=games.csv", "--team", "Santos"]);
        assert_eq!(arg_value(&a, "--data").as_deref(), Some("games.csv"));
        assert_eq!(arg_value(&a, "--team").as_deref(), Some("Santos"));
        assert_eq!(arg_value(&a, "--json"), None);
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let a = args(&["--player", "--worst"]);
        assert_eq!(arg_value(&a, "--player"), None);
        assert!(has_flag(&a, "--worst"));
    }

    #[test]
    fn selection_reads_filters() {
        let a = args(&["--metric=passes", "--position=M", "--year=2023", "--per-game", "--worst"]);
        let sel = selection_from_args(&a).unwrap();
        assert_eq!(sel.metric, Some(Metric::Passes));
        assert_eq!(sel.position, Some(Position::Midfielder));
        assert_eq!(sel.year, Some(2023));
        assert_eq!(sel.aggregation, Aggregation::PerGame);
        assert_eq!(sel.ranking, RankingKind::Worst);
    }

    #[test]
    fn unknown_metric_is_unselected() {
        let sel = selection_from_args(&args(&["--metric=corners"])).unwrap();
        assert_eq!(sel.metric, None);
    }
}
