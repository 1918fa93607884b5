use std::path::PathBuf;

use club_dashboard::config::DashboardConfig;
use club_dashboard::dataset::Position;
use club_dashboard::export::{export_json, export_xlsx};
use club_dashboard::fake_dataset::{DEMO_TEAM, synthetic_dataset};
use club_dashboard::outcome::MatchResult;
use club_dashboard::rankings::Metric;
use club_dashboard::report::{build_report, report_to_json, summary_lines};
use club_dashboard::state::DashboardState;

fn fixture_state() -> DashboardState {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("club_matches.csv");
    let cfg = DashboardConfig {
        dataset_path: path,
        ..DashboardConfig::default()
    };
    DashboardState::load(cfg).expect("fixture should load")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("club_dashboard_{}_{name}", std::process::id()))
}

#[test]
fn report_collects_every_section() {
    let mut state = fixture_state();
    state.selection.player = Some("Ana Silva".to_string());
    let report = build_report(&mut state).expect("report should build");

    assert_eq!(report.target_team, "Ituano");
    assert_eq!(report.total_rows, 22);
    assert_eq!(report.team_rows, 21);
    assert_eq!(report.matches, 7);
    assert!((report.final_win_rate_pct.unwrap() - 300.0 / 7.0).abs() < 1e-9);
    assert_eq!(report.ranking.entries[0].player, "Ana Silva");
    assert_eq!(report.tournaments.len(), 1);
    assert_eq!(report.venues.len(), 2);
    assert_eq!(report.years, vec![2023, 2024]);
    assert_eq!(report.players.len(), 4);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let profile = report.player.expect("profile expected");
    assert_eq!(profile.games, 7);
    let goals = profile
        .stats
        .iter()
        .find(|line| line.name == "Goals")
        .expect("goals line");
    assert_eq!(goals.total, 4.0);
}

#[test]
fn skipped_rows_show_up_in_the_log() {
    let mut state = fixture_state();
    let report = build_report(&mut state).unwrap();
    assert!(report.logs.iter().any(|l| l.starts_with("[WARN] Skipped row")));
    assert!(report.logs.iter().any(|l| l.starts_with("[INFO] Report built")));
}

#[test]
fn soft_failures_become_warnings() {
    let mut state = fixture_state();
    state.selection.metric = Some(Metric::DuelsWon);
    state.selection.player = Some("Nobody".to_string());
    let report = build_report(&mut state).unwrap();

    assert!(report.ranking.entries.is_empty());
    assert!(report.player.is_none());
    assert_eq!(report.warnings.len(), 2);
    assert!(report.logs.iter().any(|l| l.contains("Nobody")));
}

#[test]
fn switching_target_team_rebuilds_the_report() {
    let mut state = fixture_state();
    build_report(&mut state).unwrap();

    state.set_target_team("Outro");
    let report = build_report(&mut state).unwrap();
    assert_eq!(report.target_team, "Outro");
    assert_eq!(report.team_rows, 1);
    assert_eq!(report.matches, 1);
    assert_eq!(report.win_rate[0].game, 99);
    assert_eq!(report.win_rate[0].result, MatchResult::Win);
    assert_eq!(report.players, vec!["Zeca".to_string()]);
}

#[test]
fn unknown_position_and_year_are_warned() {
    let mut state = fixture_state();
    state.selection.position = Some(Position::Other("ATACANTE".to_string()));
    state.selection.year = Some(1999);
    let report = build_report(&mut state).unwrap();

    assert!(report.ranking.entries.is_empty());
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("position 'ATACANTE'")),
        "{:?}",
        report.warnings
    );
    assert!(report.warnings.iter().any(|w| w.contains("year 1999")));
    assert!(report.logs.iter().any(|l| l.starts_with("[WARN] position")));
}

#[test]
fn json_export_writes_nan_as_null() {
    let mut state = fixture_state();
    state.selection.player = Some("Dani Rocha".to_string());
    let report = build_report(&mut state).unwrap();

    let json = report_to_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["target_team"], "Ituano");
    let rating = value["player"]["stats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|line| line["name"] == "Rating")
        .unwrap();
    assert!(rating["per_game"].is_null());

    let path = temp_path("report.json");
    export_json(&path, &report).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().contains("generated_at"));
    let _ = std::fs::remove_file(path);
}

#[test]
fn xlsx_export_counts_rows() {
    let mut state = fixture_state();
    state.selection.player = Some("Bruno Costa".to_string());
    let report = build_report(&mut state).unwrap();

    let path = temp_path("report.xlsx");
    let summary = export_xlsx(&path, &report).expect("workbook should save");
    assert_eq!(summary.win_rate_rows, 7);
    assert_eq!(summary.ranking_rows, 4);
    assert_eq!(summary.venue_rows, 2);
    assert_eq!(summary.tournament_rows, 5);
    assert_eq!(summary.inference_rows, 3);
    assert_eq!(summary.player_rows, 5);
    assert!(path.exists());
    let _ = std::fs::remove_file(path);
}

#[test]
fn demo_dataset_builds_a_full_report() {
    let dataset = synthetic_dataset(11, 40, 14).unwrap();
    let cfg = DashboardConfig {
        target_team: DEMO_TEAM.to_string(),
        ..DashboardConfig::default()
    };
    let mut state = DashboardState::new(cfg, dataset);
    let report = build_report(&mut state).unwrap();

    assert_eq!(report.matches, 40);
    assert_eq!(report.ranking.entries.len(), 5);
    assert!(report.win_rate.iter().all(|p| (0.0..=100.0).contains(&p.win_rate_pct)));
    assert!(report.inference.test.p_value.is_finite());
    assert!(!summary_lines(&report).is_empty());
}
