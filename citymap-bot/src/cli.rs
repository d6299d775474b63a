//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use citymap_core::MarkerColor;
use std::path::PathBuf;

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "citymap")]
#[command(about = "City map Telegram bot: run, seed the city database, draw distance maps", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Load cities from a JSON array of {"city", "lat", "lng"} into DATABASE_URL. Existing names are kept.
    Seed {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Draw the great-circle path between two cities into a PNG.
    Distance {
        city_a: String,
        city_b: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = MarkerColor::default())]
        color: MarkerColor,
        /// Fill continents instead of the stock background.
        #[arg(long)]
        fill: bool,
        /// Draw borders, states, lakes and rivers.
        #[arg(long)]
        objects: bool,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}
