use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use datapublic_common::{load_or_default, AppConfig};
use datapublic_orchestrator::{
    telemetry, ChangeDetector, CommandStep, DispatchBackend, GitHubBackend, NoopBackend,
};

#[derive(Parser)]
#[command(
    name = "dispatch-on-new-data",
    about = "Trigger the downstream build when NYTimes publishes new data"
)]
struct Cli {
    /// Path to config TOML file (defaults to ./config/datapublic.toml, then built-ins)
    #[arg(long, env = "DATAPUBLIC_CONFIG")]
    config: Option<PathBuf>,

    /// Run the probe but log the dispatch instead of sending it
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
    let credentials = AppConfig::from_env(&config.dispatch.token_env);

    let backend: Box<dyn DispatchBackend> = if cli.dry_run {
        Box::new(NoopBackend)
    } else {
        Box::new(GitHubBackend::new()?)
    };

    let detector = ChangeDetector::new(
        credentials,
        config.dispatch.target.clone(),
        Box::new(CommandStep::probe(&config.probe)),
        backend,
    );
    detector.run().await?;
    Ok(())
}
