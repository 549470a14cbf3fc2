//! degreemap CLI: scrape university catalog programs into structured records.
//!
//! Pulls degree programs from the catalog content API and writes one JSON
//! document of requirements, credit totals and semester templates.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
