//! `citymap` binary: runs the bot or one of the maintenance subcommands.

use anyhow::Result;
use citymap_bot::{load_config, run_bot, run_distance, run_seed, Cli, Commands};
use citymap_core::RenderOptions;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Seed { file } => run_seed(&file).await,
        Commands::Distance {
            city_a,
            city_b,
            output,
            color,
            fill,
            objects,
        } => {
            let options = RenderOptions {
                marker_color: color,
                fill_continents: fill,
                show_features: objects,
            };
            run_distance(&city_a, &city_b, &output, options).await
        }
    }
}
