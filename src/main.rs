use anyhow::Result;
use clap::Parser;
use tourbook::cli::Cli;
use tourbook::core::log::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = tourbook::run(cli).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
