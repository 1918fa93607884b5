use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};

pub const STAT_PREFIX: &str = "statistics_";
pub const RATING_COLUMN: &str = "statistics_rating";

const REQUIRED_COLUMNS: &[&str] = &[
    "time_alvo",
    "jogo",
    "home_team",
    "away_team",
    "home_score",
    "away_score",
    "home_or_away",
    "player_name",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" | "casa" => Some(Venue::Home),
            "away" | "fora" => Some(Venue::Away),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Venue::Home => "home",
            Venue::Away => "away",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
    Other(String),
}

impl Position {
    pub fn from_code(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return None;
        }
        Some(match code {
            "F" => Position::Forward,
            "M" => Position::Midfielder,
            "D" => Position::Defender,
            "G" => Position::Goalkeeper,
            other => Position::Other(other.to_string()),
        })
    }

    /// Accepts either the one-letter code or the long label (case-insensitive).
    pub fn from_user_input(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "forward" | "attacker" => Some(Position::Forward),
            "midfielder" => Some(Position::Midfielder),
            "defender" => Some(Position::Defender),
            "goalkeeper" | "keeper" => Some(Position::Goalkeeper),
            _ => Position::from_code(&raw.trim().to_ascii_uppercase()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Position::Forward => "Forward",
            Position::Midfielder => "Midfielder",
            Position::Defender => "Defender",
            Position::Goalkeeper => "Goalkeeper",
            Position::Other(code) => code,
        }
    }
}

/// One player's line for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub target_team: String,
    pub year: Option<i32>,
    pub game: u32,
    pub venue: Option<Venue>,
    pub home_team: String,
    pub away_team: String,
    pub stadium: Option<String>,
    pub tournament: Option<String>,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub home_manager: Option<String>,
    pub away_manager: Option<String>,
    pub player_name: Option<String>,
    pub player_number: Option<String>,
    pub position: Option<Position>,
    pub player_sub: Option<bool>,
    pub player_captain: Option<bool>,
    pub stats: BTreeMap<String, f64>,
}

impl Observation {
    pub fn stat(&self, column: &str) -> Option<f64> {
        self.stats.get(column).copied()
    }

    pub fn rating(&self) -> Option<f64> {
        self.stat(RATING_COLUMN)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub source: Option<PathBuf>,
    pub columns: Vec<String>,
    pub stat_columns: Vec<String>,
    pub rows: Vec<Observation>,
    pub skipped: Vec<String>,
}

impl Dataset {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Rows whose `time_alvo` matches the target team.
    pub fn team_rows(&self, target_team: &str) -> Vec<Observation> {
        self.rows
            .iter()
            .filter(|row| row.target_team == target_team)
            .cloned()
            .collect()
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = File::open(path).with_context(|| format!("open dataset {}", path.display()))?;
    let mut dataset =
        read_dataset(file).with_context(|| format!("read dataset {}", path.display()))?;
    dataset.source = Some(path.to_path_buf());
    Ok(dataset)
}

pub fn parse_dataset_csv(raw: &str) -> Result<Dataset> {
    read_dataset(raw.as_bytes())
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().context("read csv header")?.clone();
    let cols = ColumnIndices::from_headers(&headers)?;

    let columns = headers.iter().map(str::to_string).collect::<Vec<_>>();
    let stat_columns = cols.stats.iter().map(|(name, _)| name.clone()).collect();

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = record.with_context(|| format!("read csv record at line {line}"))?;
        match parse_row(&record, &cols) {
            Ok(row) => rows.push(row),
            Err(err) => skipped.push(format!("line {line}: {err}")),
        }
    }

    Ok(Dataset {
        source: None,
        columns,
        stat_columns,
        rows,
        skipped,
    })
}

struct ColumnIndices {
    target_team: usize,
    game: usize,
    home_team: usize,
    away_team: usize,
    home_score: usize,
    away_score: usize,
    venue: usize,
    player_name: usize,
    year: Option<usize>,
    stadium: Option<usize>,
    tournament: Option<usize>,
    home_manager: Option<usize>,
    away_manager: Option<usize>,
    player_number: Option<usize>,
    player_position: Option<usize>,
    player_sub: Option<usize>,
    player_captain: Option<usize>,
    stats: Vec<(String, usize)>,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !headers.iter().any(|h| h == **name))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(anyhow!("required column(s) missing: {}", missing.join(", ")));
        }

        let find_optional = |name: &str| headers.iter().position(|h| h == name);
        let find = |name: &str| -> Result<usize> {
            find_optional(name).ok_or_else(|| anyhow!("required column '{name}' not found"))
        };

        let stats = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(STAT_PREFIX))
            .map(|(idx, h)| (h.to_string(), idx))
            .collect();

        Ok(Self {
            target_team: find("time_alvo")?,
            game: find("jogo")?,
            home_team: find("home_team")?,
            away_team: find("away_team")?,
            home_score: find("home_score")?,
            away_score: find("away_score")?,
            venue: find("home_or_away")?,
            player_name: find("player_name")?,
            year: find_optional("ano"),
            stadium: find_optional("stadium"),
            tournament: find_optional("tournament"),
            home_manager: find_optional("home_manager"),
            away_manager: find_optional("away_manager"),
            player_number: find_optional("player_number"),
            player_position: find_optional("player_position"),
            player_sub: find_optional("player_sub"),
            player_captain: find_optional("player_captain"),
            stats,
        })
    }
}

fn parse_row(record: &StringRecord, cols: &ColumnIndices) -> Result<Observation> {
    let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
    let opt_cell = |idx: Option<usize>| idx.map(cell).and_then(non_empty);

    let game_raw = cell(cols.game);
    let game = parse_whole(game_raw)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| anyhow!("invalid game number '{game_raw}'"))?;

    let mut stats = BTreeMap::new();
    for (name, idx) in &cols.stats {
        if let Some(value) = parse_number(cell(*idx)) {
            stats.insert(name.clone(), value);
        }
    }

    Ok(Observation {
        target_team: cell(cols.target_team).to_string(),
        year: cols
            .year
            .and_then(|idx| parse_whole(cell(idx)))
            .and_then(|v| i32::try_from(v).ok()),
        game,
        venue: Venue::parse(cell(cols.venue)),
        home_team: cell(cols.home_team).to_string(),
        away_team: cell(cols.away_team).to_string(),
        stadium: opt_cell(cols.stadium),
        tournament: opt_cell(cols.tournament),
        home_score: parse_score(cell(cols.home_score)),
        away_score: parse_score(cell(cols.away_score)),
        home_manager: opt_cell(cols.home_manager),
        away_manager: opt_cell(cols.away_manager),
        player_name: non_empty(cell(cols.player_name)),
        player_number: opt_cell(cols.player_number).map(|s| normalize_shirt(&s)),
        position: cols
            .player_position
            .and_then(|idx| Position::from_code(cell(idx))),
        player_sub: cols.player_sub.and_then(|idx| parse_flag(cell(idx))),
        player_captain: cols.player_captain.and_then(|idx| parse_flag(cell(idx))),
        stats,
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parses counts written either as `2` or `2.0`.
fn parse_whole(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 {
        return None;
    }
    Some(value as i64)
}

fn parse_score(raw: &str) -> Option<u16> {
    parse_whole(raw).and_then(|v| u16::try_from(v).ok())
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" | "yes" => Some(true),
        "false" | "0" | "0.0" | "no" => Some(false),
        _ => None,
    }
}

fn normalize_shirt(raw: &str) -> String {
    match parse_whole(raw) {
        Some(n) => n.to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_accept_float_spelling() {
        assert_eq!(parse_whole("2.0"), Some(2));
        assert_eq!(parse_whole("3"), Some(3));
        assert_eq!(parse_whole("2.5"), None);
        assert_eq!(parse_whole(""), None);
    }

    #[test]
    fn flags_parse_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("False"), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn position_codes_map_to_labels() {
        assert_eq!(Position::from_code("F"), Some(Position::Forward));
        assert_eq!(Position::from_code("G").unwrap().label(), "Goalkeeper");
        assert_eq!(Position::from_code("X").unwrap().label(), "X");
        assert_eq!(Position::from_code(" "), None);
        assert_eq!(Position::from_user_input("defender"), Some(Position::Defender));
        assert_eq!(Position::from_user_input("m"), Some(Position::Midfielder));
    }

    #[test]
    fn nan_cells_are_missing() {
        assert_eq!(parse_number("nan"), None);
        assert_eq!(non_empty("NaN"), None);
        assert_eq!(parse_number("7.3"), Some(7.3));
    }
}
