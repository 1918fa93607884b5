use anyhow::{Context, Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{self, Dataset};

pub const DEMO_TEAM: &str = "Demo FC";

const OPPONENTS: &[&str] = &[
    "Rio Branco", "Vila Nova", "Ponte Norte", "Guarani Sul", "Botafogo Leste", "Juventus Oeste",
    "Atletico Serra", "Sampaio Mar",
];
const TOURNAMENTS: &[&str] = &["State League", "Serie B", "National Cup"];
const SQUAD: &[(&str, &str)] = &[
    ("Aldo Keeper", "G"),
    ("Bruno Wall", "D"),
    ("Caio Stone", "D"),
    ("Davi Rock", "D"),
    ("Enzo Line", "D"),
    ("Fabio Link", "M"),
    ("Gil Motor", "M"),
    ("Heitor Vision", "M"),
    ("Igor Pace", "F"),
    ("Joao Finisher", "F"),
    ("Kaue Spark", "F"),
    ("Luan Bench", "M"),
    ("Mateus Reserve", "D"),
    ("Nico Spare", "F"),
];

const HEADER: &[&str] = &[
    "time_alvo",
    "ano",
    "jogo",
    "home_or_away",
    "home_team",
    "away_team",
    "stadium",
    "tournament",
    "home_score",
    "away_score",
    "home_manager",
    "away_manager",
    "player_name",
    "player_number",
    "player_position",
    "player_sub",
    "player_captain",
    "statistics_minutes_played",
    "statistics_rating",
    "statistics_goals",
    "statistics_total_pass",
    "statistics_accurate_pass",
    "statistics_saves",
    "statistics_on_target_scoring_attempt",
    "statistics_total_tackle",
    "statistics_duel_won",
];

/// Deterministic CSV in the dataset schema: `games` matches, each with up to
/// `squad` players (capped at the built-in squad list).
pub fn synthetic_csv(seed: u64, games: usize, squad: usize) -> Result<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let squad = &SQUAD[..squad.clamp(1, SQUAD.len())];
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).context("write synthetic header")?;

    for game in 1..=games {
        let year = 2022 + ((game - 1) * 3 / games.max(1)) as i32;
        let home = rng.gen_bool(0.5);
        let opponent = OPPONENTS[rng.gen_range(0..OPPONENTS.len())];
        let tournament = TOURNAMENTS[rng.gen_range(0..TOURNAMENTS.len())];
        let own_goals: u16 = rng.gen_range(0..4);
        let other_goals: u16 = rng.gen_range(0..3);
        let (home_team, away_team, home_score, away_score) = if home {
            (DEMO_TEAM, opponent, own_goals, other_goals)
        } else {
            (opponent, DEMO_TEAM, other_goals, own_goals)
        };
        let stadium = if home { "Demo Arena" } else { "Visitor Ground" };
        let captain = rng.gen_range(0..squad.len());
        let base_rating: f64 = if home { 6.9 } else { 6.6 };

        for (idx, (name, position)) in squad.iter().enumerate() {
            let sub = idx >= 11;
            let minutes: u32 = if sub { rng.gen_range(0..35) } else { rng.gen_range(60..=90) };
            // Unrated cameo appearances leave the cell empty.
            let rating = if minutes < 10 {
                String::new()
            } else {
                format!("{:.1}", base_rating + rng.gen_range(-1.2..1.5))
            };
            let is_keeper = *position == "G";
            let goals: u32 = if is_keeper { 0 } else { u32::from(rng.gen_bool(0.12)) };
            let passes: u32 = rng.gen_range(5..70);
            let accurate = (passes as f64 * rng.gen_range(0.6..0.95)).round() as u32;
            let saves: u32 = if is_keeper { rng.gen_range(0..7) } else { 0 };
            let shots: u32 = if *position == "F" { rng.gen_range(0..4) } else { rng.gen_range(0..2) };
            let tackles: u32 = rng.gen_range(0..6);
            let duels: u32 = rng.gen_range(0..10);

            let record = vec![
                DEMO_TEAM.to_string(),
                year.to_string(),
                game.to_string(),
                if home { "home" } else { "away" }.to_string(),
                home_team.to_string(),
                away_team.to_string(),
                stadium.to_string(),
                tournament.to_string(),
                home_score.to_string(),
                away_score.to_string(),
                "Demo Manager".to_string(),
                format!("{opponent} Manager"),
                name.to_string(),
                (idx + 1).to_string(),
                position.to_string(),
                if sub { "TRUE" } else { "FALSE" }.to_string(),
                if idx == captain { "TRUE" } else { "FALSE" }.to_string(),
                minutes.to_string(),
                rating,
                goals.to_string(),
                passes.to_string(),
                accurate.to_string(),
                saves.to_string(),
                shots.to_string(),
                tackles.to_string(),
                duels.to_string(),
            ];
            writer
                .write_record(&record)
                .with_context(|| format!("write synthetic row game={game} player={name}"))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("flush synthetic csv: {}", err.error()))?;
    String::from_utf8(bytes).context("synthetic csv is not utf-8")
}

pub fn synthetic_dataset(seed: u64, games: usize, squad: usize) -> Result<Dataset> {
    dataset::parse_dataset_csv(&synthetic_csv(seed, games, squad)?)
}
