mod cli;
mod commands;

use clap::Parser;
use sniff_config::init_tracing;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let cli = Cli::parse();
    let output = commands::run(cli.command, cli.raw).await?;
    println!("{output}");
    Ok(())
}
