use blog_planner::cli::{Cli, Cmd};
use blog_planner::commands;
use blog_planner::{AppConfig, BlogPlanner};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Cmd::Serve { .. }));

    if let Err(e) = run(cli).await {
        eprintln!("• {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(serving: bool) {
    let fallback = if serving { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = AppConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    let planner = BlogPlanner::from_config(config).map_err(|e| e.to_string())?;
    commands::dispatch(cli.command, &planner).await
}
