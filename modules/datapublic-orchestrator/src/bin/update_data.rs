use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use datapublic_common::load_or_default;
use datapublic_orchestrator::{telemetry, UpdateRunner};

#[derive(Parser)]
#[command(name = "update-data", about = "Refresh every upstream COVID data source, in order")]
struct Cli {
    /// Path to config TOML file (defaults to ./config/datapublic.toml, then built-ins)
    #[arg(long, env = "DATAPUBLIC_CONFIG")]
    config: Option<PathBuf>,

    /// Print the ordered step plan without running anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    telemetry::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_or_default(cli.config.as_deref())?;

    if cli.dry_run {
        for (i, step) in config.steps.iter().enumerate() {
            println!("{:>2}. {:<28} [{}] {}", i + 1, step.name, step.policy, step.command_line());
        }
        return Ok(());
    }

    let report = UpdateRunner::from_specs(&config.steps).execute().await;

    // Aborted runs are reported too, so the failing source is on record.
    if let Some(ref path) = config.report.path {
        if let Err(e) = report.write_json(path) {
            warn!(error = %format!("{e:#}"), "Failed to write run report");
        }
    }
    report.into_result()?;
    Ok(())
}
