use std::path::PathBuf;

use club_dashboard::aggregate::{
    cumulative_win_rate, matches_by_game, tournament_performance, unique_matches, venue_split,
};
use club_dashboard::dataset::{Observation, Venue, load_dataset, parse_dataset_csv};
use club_dashboard::outcome::{MatchResult, derive_result};

const TEAM: &str = "Ituano";

fn team_rows() -> Vec<Observation> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("club_matches.csv");
    load_dataset(&path)
        .expect("fixture should load")
        .team_rows(TEAM)
}

#[test]
fn dedup_keeps_one_row_per_game() {
    let rows = team_rows();
    let matches = unique_matches(&rows);
    assert_eq!(matches.len(), 7);
    let games = matches_by_game(&rows).iter().map(|r| r.game).collect::<Vec<_>>();
    assert_eq!(games, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn win_rate_series_follows_game_number_not_file_order() {
    let raw = "time_alvo,jogo,home_team,away_team,home_score,away_score,home_or_away,player_name\n\
               Ituano,3,Ituano,Santos,0,1,home,Ana\n\
               Ituano,1,Ituano,Santos,2,0,home,Ana\n\
               Ituano,3,Ituano,Santos,0,1,home,Rui\n\
               Ituano,2,Santos,Ituano,1,1,away,Ana\n";
    let rows = parse_dataset_csv(raw)
        .expect("inline csv should parse")
        .team_rows(TEAM);
    let series = cumulative_win_rate(&rows, TEAM);

    let games = series.iter().map(|p| p.game).collect::<Vec<_>>();
    assert_eq!(games, vec![1, 2, 3]);
    let results = series.iter().map(|p| p.result).collect::<Vec<_>>();
    assert_eq!(
        results,
        vec![MatchResult::Win, MatchResult::Draw, MatchResult::Loss]
    );
    assert_eq!(series[0].win_rate_pct, 100.0);
    assert_eq!(series[1].win_rate_pct, 50.0);
    assert!((series[2].win_rate_pct - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn results_follow_the_target_side() {
    let rows = team_rows();
    let results = matches_by_game(&rows)
        .into_iter()
        .map(|r| derive_result(r, TEAM))
        .collect::<Vec<_>>();
    assert_eq!(
        results,
        vec![
            MatchResult::Win,
            MatchResult::Draw,
            MatchResult::Loss,
            MatchResult::Win,
            MatchResult::Loss,
            MatchResult::Win,
            MatchResult::Draw,
        ]
    );
}

#[test]
fn cumulative_win_rate_is_a_running_mean() {
    let rows = team_rows();
    let points = cumulative_win_rate(&rows, TEAM);
    assert_eq!(points.len(), 7);
    let expected = [100.0, 50.0, 100.0 / 3.0, 50.0, 40.0, 50.0, 300.0 / 7.0];
    for (point, want) in points.iter().zip(expected) {
        assert!((point.win_rate_pct - want).abs() < 1e-9, "{point:?} vs {want}");
        assert!((0.0..=100.0).contains(&point.win_rate_pct));
    }
    assert_eq!(points[0].index, 1);
    assert_eq!(points[6].game, 7);
}

#[test]
fn venue_split_counts_matches_not_rows() {
    let rows = team_rows();
    let splits = venue_split(&rows, TEAM);
    assert_eq!(splits.len(), 2);

    let home = splits.iter().find(|s| s.venue == Venue::Home).unwrap();
    assert_eq!(home.matches, 4);
    assert_eq!(home.wins, 2);
    assert!((home.win_pct - 50.0).abs() < 1e-9);

    let away = splits.iter().find(|s| s.venue == Venue::Away).unwrap();
    assert_eq!(away.matches, 3);
    assert_eq!(away.wins, 1);
    assert!((away.win_pct - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn venue_without_matches_is_nan() {
    let rows = team_rows()
        .into_iter()
        .filter(|r| r.venue == Some(Venue::Home))
        .collect::<Vec<_>>();
    let splits = venue_split(&rows, TEAM);
    let away = splits.iter().find(|s| s.venue == Venue::Away).unwrap();
    assert_eq!(away.matches, 0);
    assert!(away.win_pct.is_nan());
}

#[test]
fn tournaments_below_threshold_are_hidden() {
    let rows = team_rows();
    let shown = tournament_performance(&rows, TEAM, 5);
    assert_eq!(shown.len(), 1);

    let paulista = &shown[0];
    assert_eq!(paulista.tournament, "Paulista");
    assert_eq!(paulista.games.len(), 5);
    assert_eq!((paulista.wins, paulista.draws, paulista.losses), (2, 1, 2));
    let opponents = paulista
        .games
        .iter()
        .map(|g| g.opponent.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        opponents,
        vec!["Santos", "Guarani", "Ponte Preta", "Novorizontino", "Mirassol"]
    );
    assert_eq!(paulista.games[3].number_in_tournament, 4);
    // Game 4 has one unrated row; the mean uses the two rated players.
    let rating = paulista.games[3].team_rating.unwrap();
    assert!((rating - 7.45).abs() < 1e-9);

    let all = tournament_performance(&rows, TEAM, 1);
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].tournament, "Serie B");
}
