mod classify;
mod cli;
mod complete;
mod config;
mod normalize;
mod pipeline;
mod schema;
mod sink;
mod workbook;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    cli::handle_load_command(cli).await
}
