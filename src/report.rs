use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, CumulativePoint, TournamentPerformance, VenueSplit};
use crate::dataset::Position;
use crate::inference::{self, HomeAwayInference};
use crate::player_profile::{self, PlayerProfile};
use crate::rankings::{self, RankingOutcome};
use crate::state::{DashboardState, Selection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: String,
    pub source: Option<String>,
    pub target_team: String,
    pub total_rows: usize,
    pub team_rows: usize,
    pub matches: usize,
    pub selection: Selection,
    pub positions: Vec<Position>,
    pub years: Vec<i32>,
    pub win_rate: Vec<CumulativePoint>,
    pub final_win_rate_pct: Option<f64>,
    pub ranking: RankingOutcome,
    pub tournaments: Vec<TournamentPerformance>,
    pub venues: Vec<VenueSplit>,
    pub inference: HomeAwayInference,
    pub players: Vec<String>,
    pub player: Option<PlayerProfile>,
    pub warnings: Vec<String>,
    pub logs: Vec<String>,
}

pub fn build_report(state: &mut DashboardState) -> Result<DashboardReport> {
    let target = state.config().target_team.clone();
    let rows = state.team_rows();
    let mut warnings = Vec::new();

    let win_rate = aggregate::cumulative_win_rate(rows, &target);
    let final_win_rate_pct = win_rate.last().map(|p| p.win_rate_pct);
    let matches = win_rate.len();

    let ranking = rankings::rank_players(rows, &state.dataset().columns, &state.ranking_query());
    if let Some(warning) = &ranking.warning {
        warnings.push(warning.clone());
    }

    let tournaments =
        aggregate::tournament_performance(rows, &target, state.config().min_tournament_matches);
    let venues = aggregate::venue_split(rows, &target);
    for split in venues.iter().filter(|v| v.matches == 0) {
        warnings.push(format!(
            "no {} matches: win percentage is undefined",
            split.venue.label()
        ));
    }

    let inference = inference::home_away_ratings(rows, state.config().confidence_level)?;
    if inference.test.p_value.is_nan() {
        warnings.push("home/away rating test is undefined for these samples".to_string());
    }

    let players = player_profile::player_names(rows);
    let player = match state.selection.player.as_deref() {
        Some(name) => {
            let profile =
                player_profile::player_profile(rows, &state.dataset().stat_columns, name);
            if profile.is_none() {
                warnings.push(format!("player '{name}' was not found"));
            }
            profile
        }
        None => None,
    };

    let positions = rankings::available_positions(rows);
    let years = rankings::available_years(rows);
    if let Some(position) = &state.selection.position
        && !positions.contains(position)
    {
        warnings.push(format!(
            "position '{}' has no players in the dataset",
            position.label()
        ));
    }
    if let Some(year) = state.selection.year
        && !years.contains(&year)
    {
        warnings.push(format!("year {year} has no matches in the dataset"));
    }
    let team_rows = rows.len();

    for warning in &warnings {
        state.push_log(format!("[WARN] {warning}"));
    }
    state.push_log(format!(
        "[INFO] Report built: {matches} matches, {} tournaments shown",
        tournaments.len()
    ));

    Ok(DashboardReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        source: state
            .dataset()
            .source
            .as_ref()
            .map(|p| p.display().to_string()),
        target_team: target,
        total_rows: state.dataset().rows.len(),
        team_rows,
        matches,
        selection: state.selection.clone(),
        positions,
        years,
        win_rate,
        final_win_rate_pct,
        ranking,
        tournaments,
        venues,
        inference,
        players,
        player,
        warnings,
        logs: state.logs.iter().cloned().collect(),
    })
}

pub fn report_to_json(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn fmt_value(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        "n/a".to_string()
    }
}

/// Plain-text summary printed by the binaries.
pub fn summary_lines(report: &DashboardReport) -> Vec<String> {
    let mut out = Vec::new();
    out.push(format!(
        "{} | rows {} ({} team) | matches {}",
        report.target_team, report.total_rows, report.team_rows, report.matches
    ));
    out.push(format!(
        "Cumulative win rate: {}%",
        fmt_value(report.final_win_rate_pct.unwrap_or(f64::NAN), 1)
    ));

    if let Some(metric) = report.ranking.metric {
        out.push(format!(
            "{} in {} ({})",
            report.ranking.kind.label(),
            metric.label(),
            report.ranking.aggregation.label()
        ));
        for (idx, entry) in report.ranking.entries.iter().enumerate() {
            out.push(format!(
                "  {}. {} {} ({} games)",
                idx + 1,
                entry.player,
                fmt_value(entry.value, 2),
                entry.games
            ));
        }
    }

    for t in &report.tournaments {
        out.push(format!(
            "{}: {} games W{} D{} L{} rating {}",
            t.tournament,
            t.games.len(),
            t.wins,
            t.draws,
            t.losses,
            t.mean_rating.map(|r| fmt_value(r, 2)).unwrap_or_else(|| "n/a".to_string())
        ));
    }

    for v in &report.venues {
        out.push(format!(
            "{}: {}/{} wins ({}%)",
            v.venue.label(),
            v.wins,
            v.matches,
            fmt_value(v.win_pct, 1)
        ));
    }

    let inf = &report.inference;
    out.push(format!(
        "Rating home {} vs away {} | t {} p {}{}",
        fmt_value(inf.home.mean, 2),
        fmt_value(inf.away.mean, 2),
        fmt_value(inf.test.t_statistic, 2),
        fmt_value(inf.test.p_value, 10),
        if inf.significant { " (significant)" } else { "" }
    ));
    out.push(format!(
        "{:.0}% CI home ({}, {}) away ({}, {})",
        inf.home_interval.level * 100.0,
        fmt_value(inf.home_interval.lower, 2),
        fmt_value(inf.home_interval.upper, 2),
        fmt_value(inf.away_interval.lower, 2),
        fmt_value(inf.away_interval.upper, 2)
    ));

    if let Some(profile) = &report.player {
        out.push(format!("Player {} ({} games)", profile.player, profile.games));
        for line in &profile.stats {
            out.push(format!(
                "  {}: total {} per game {}",
                line.name,
                fmt_value(line.total, 2),
                fmt_value(line.per_game, 2)
            ));
        }
    }

    out
}
