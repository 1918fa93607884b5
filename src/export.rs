use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::TournamentPerformance;
use crate::report::{DashboardReport, fmt_value, report_to_json};

pub struct ExportReport {
    pub win_rate_rows: usize,
    pub ranking_rows: usize,
    pub venue_rows: usize,
    pub tournament_rows: usize,
    pub inference_rows: usize,
    pub player_rows: usize,
}

pub fn export_json(path: &Path, report: &DashboardReport) -> Result<()> {
    let json = report_to_json(report).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write report json {}", path.display()))?;
    Ok(())
}

pub fn export_xlsx(path: &Path, report: &DashboardReport) -> Result<ExportReport> {
    let mut win_rate_rows = vec![vec![
        "Match #".to_string(),
        "Game".to_string(),
        "Result".to_string(),
        "Win Rate (%)".to_string(),
    ]];
    win_rate_rows.extend(report.win_rate.iter().map(|p| {
        vec![
            p.index.to_string(),
            p.game.to_string(),
            p.result.label().to_string(),
            fmt_value(p.win_rate_pct, 2),
        ]
    }));

    let value_header = report
        .ranking
        .metric
        .map(|m| format!("{} ({})", m.label(), report.ranking.aggregation.label()))
        .unwrap_or_else(|| "Value".to_string());
    let mut ranking_rows = vec![vec![
        "Rank".to_string(),
        "Player".to_string(),
        value_header,
        "Games".to_string(),
    ]];
    ranking_rows.extend(report.ranking.entries.iter().enumerate().map(|(idx, e)| {
        vec![
            (idx + 1).to_string(),
            e.player.clone(),
            fmt_value(e.value, 2),
            e.games.to_string(),
        ]
    }));

    let mut venue_rows = vec![vec![
        "Venue".to_string(),
        "Matches".to_string(),
        "Wins".to_string(),
        "Win %".to_string(),
    ]];
    venue_rows.extend(report.venues.iter().map(|v| {
        vec![
            v.venue.label().to_string(),
            v.matches.to_string(),
            v.wins.to_string(),
            fmt_value(v.win_pct, 2),
        ]
    }));

    let mut tournament_rows = vec![vec![
        "Tournament".to_string(),
        "Match #".to_string(),
        "Game".to_string(),
        "Opponent".to_string(),
        "Home Score".to_string(),
        "Away Score".to_string(),
        "Result".to_string(),
        "Team Rating".to_string(),
    ]];
    for t in &report.tournaments {
        tournament_rows.extend(tournament_game_rows(t));
    }

    let inf = &report.inference;
    let inference_rows = vec![
        vec![
            "Group".to_string(),
            "N".to_string(),
            "Mean".to_string(),
            "Std Dev".to_string(),
            "CI Lower".to_string(),
            "CI Upper".to_string(),
        ],
        vec![
            "Home".to_string(),
            inf.home.n.to_string(),
            fmt_value(inf.home.mean, 4),
            fmt_value(inf.home.std_dev, 4),
            fmt_value(inf.home_interval.lower, 4),
            fmt_value(inf.home_interval.upper, 4),
        ],
        vec![
            "Away".to_string(),
            inf.away.n.to_string(),
            fmt_value(inf.away.mean, 4),
            fmt_value(inf.away.std_dev, 4),
            fmt_value(inf.away_interval.lower, 4),
            fmt_value(inf.away_interval.upper, 4),
        ],
        vec![
            "Welch t".to_string(),
            fmt_value(inf.test.t_statistic, 4),
            "df".to_string(),
            fmt_value(inf.test.degrees_of_freedom, 4),
            "p-value".to_string(),
            fmt_value(inf.test.p_value, 10),
        ],
    ];

    let mut player_rows = vec![vec![
        "Statistic".to_string(),
        "Total".to_string(),
        "Per Game".to_string(),
    ]];
    if let Some(profile) = &report.player {
        player_rows.extend(profile.stats.iter().map(|line| {
            vec![
                line.name.clone(),
                fmt_value(line.total, 2),
                fmt_value(line.per_game, 2),
            ]
        }));
    }

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("WinRate", &win_rate_rows),
        ("Ranking", &ranking_rows),
        ("Venues", &venue_rows),
        ("Tournaments", &tournament_rows),
        ("Inference", &inference_rows),
        ("Player", &player_rows),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        win_rate_rows: win_rate_rows.len().saturating_sub(1),
        ranking_rows: ranking_rows.len().saturating_sub(1),
        venue_rows: venue_rows.len().saturating_sub(1),
        tournament_rows: tournament_rows.len().saturating_sub(1),
        inference_rows: inference_rows.len().saturating_sub(1),
        player_rows: player_rows.len().saturating_sub(1),
    })
}

fn tournament_game_rows(t: &TournamentPerformance) -> Vec<Vec<String>> {
    t.games
        .iter()
        .map(|g| {
            vec![
                t.tournament.clone(),
                g.number_in_tournament.to_string(),
                g.game.to_string(),
                g.opponent.clone(),
                opt_to_string(g.home_score),
                opt_to_string(g.away_score),
                g.result.label().to_string(),
                g.team_rating.map(|r| fmt_value(r, 2)).unwrap_or_default(),
            ]
        })
        .collect()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
