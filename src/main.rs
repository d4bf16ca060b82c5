use clap::Parser;
use tracing_subscriber::EnvFilter;

use webpilot_cli::cli::{detect, run, search, sites, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("default filter is valid");
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Run {
            ref plan,
            stealth,
            headed,
            format,
        } => run::execute(cli.config.as_deref(), plan, stealth, headed, format).await,
        Command::Search {
            ref query,
            ref url,
            limit,
            min_rating,
            max_price,
            stealth,
        } => {
            search::execute(
                cli.config.as_deref(),
                query,
                url,
                limit,
                min_rating,
                max_price,
                stealth,
            )
            .await
        }
        Command::Detect { ref url } => detect::execute(url),
        Command::Sites => sites::execute(),
    }
}
