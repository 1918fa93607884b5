use anyhow::{Result, anyhow};

use club_dashboard::cli;
use club_dashboard::config::{self, DashboardConfig};
use club_dashboard::export;
use club_dashboard::report;
use club_dashboard::state::DashboardState;

fn main() -> Result<()> {
    config::load_env_files();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    let xlsx_path = cli::path_arg(&args, "--xlsx");
    let json_path = cli::path_arg(&args, "--json");
    if xlsx_path.is_none() && json_path.is_none() {
        return Err(anyhow!("nothing to export: pass --xlsx <path> and/or --json <path>"));
    }

    let mut cfg = DashboardConfig::from_env()?;
    cli::apply_config_args(&args, &mut cfg)?;
    let mut state = DashboardState::load(cfg)?;
    state.selection = cli::selection_from_args(&args)?;
    let report = report::build_report(&mut state)?;

    println!("Export for {}", report.target_team);
    println!("Source: {}", report.source.as_deref().unwrap_or("n/a"));
    println!("Matches: {}", report.matches);

    if let Some(path) = xlsx_path {
        let summary = export::export_xlsx(&path, &report)?;
        println!("Workbook: {}", path.display());
        println!(
            "  win rate {} | ranking {} | venues {} | tournaments {} | inference {} | player {}",
            summary.win_rate_rows,
            summary.ranking_rows,
            summary.venue_rows,
            summary.tournament_rows,
            summary.inference_rows,
            summary.player_rows
        );
    }

    if let Some(path) = json_path {
        export::export_json(&path, &report)?;
        println!("JSON: {}", path.display());
    }

    if !report.warnings.is_empty() {
        println!("  warnings: {}", report.warnings.len());
        for warning in report.warnings.iter().take(6) {
            println!("   - {warning}");
        }
    }

    Ok(())
}
