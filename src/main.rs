use anyhow::{Context, Result};

use club_dashboard::cli;
use club_dashboard::config::{self, DashboardConfig};
use club_dashboard::export;
use club_dashboard::fake_dataset;
use club_dashboard::report;
use club_dashboard::state::DashboardState;

const DEMO_SEED: u64 = 2024;
const DEMO_GAMES: usize = 60;

fn main() -> Result<()> {
    config::load_env_files();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let mut cfg = DashboardConfig::from_env()?;
    let demo = cli::has_flag(&args, "--demo");
    if demo {
        cfg.target_team = fake_dataset::DEMO_TEAM.to_string();
    }
    cli::apply_config_args(&args, &mut cfg)?;

    let mut state = if demo {
        let dataset = fake_dataset::synthetic_dataset(DEMO_SEED, DEMO_GAMES, 14)
            .context("build demo dataset")?;
        DashboardState::new(cfg, dataset)
    } else {
        DashboardState::load(cfg)?
    };
    state.selection = cli::selection_from_args(&args)?;

    let report = report::build_report(&mut state)?;
    for line in report::summary_lines(&report) {
        println!("{line}");
    }

    if !report.warnings.is_empty() {
        eprintln!("warnings:");
        for warning in &report.warnings {
            eprintln!("   - {warning}");
        }
    }

    if let Some(path) = cli::path_arg(&args, "--json") {
        export::export_json(&path, &report)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}
