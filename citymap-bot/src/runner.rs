//! Entry points for the CLI subcommands: the bot REPL, database seeding and distance maps.

use anyhow::{Context, Result};
use citymap_core::{init_tracing, Bot as CoreBot, RenderOptions};
use map_renderer::DistanceOutcome;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::chain::HandlerChain;
use crate::components::{build_bot_components, build_handler_chain, build_renderer, open_store};
use crate::config::{BaseConfig, BotConfig, MapConfig};
use crate::telegram::run_repl;

/// Main entry: validate config, init logging, build components and handler chain, then run REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    info!(
        database_url = %config.database_url(),
        output_dir = %config.output_dir().display(),
        "Initializing bot"
    );

    let components = build_bot_components(&config, None).await?;
    let handler_chain = build_handler_chain(&config, &components);
    let teloxide_bot = components.teloxide_bot.clone();

    info!("Bot started successfully");

    run_repl(teloxide_bot, handler_chain, components.bot_username.clone()).await
}

/// Builds components and handler chain without starting the REPL. Used by integration tests that
/// inject a mock bot and drive the chain with fake messages.
#[instrument(skip(config, handler_bot_override))]
pub async fn build_handler_chain_only(
    config: &BotConfig,
    handler_bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<HandlerChain> {
    config.validate()?;
    let components = build_bot_components(config, handler_bot_override).await?;
    Ok(build_handler_chain(config, &components))
}

/// `seed` subcommand: loads a JSON city list into the database named by DATABASE_URL.
#[instrument]
pub async fn run_seed(file: &Path) -> Result<()> {
    init_tracing(&BaseConfig::log_file_from_env())?;
    let database_url = BaseConfig::database_url_from_env()?;
    let store = open_store(&database_url).await?;

    let inserted = store
        .seed_from_json(file)
        .await
        .with_context(|| format!("Failed to seed cities from {}", file.display()))?;

    info!(inserted, file = %file.display(), "Seed finished");
    println!("Inserted {inserted} cities from {}", file.display());
    Ok(())
}

/// `distance` subcommand: renders the great-circle map between two cities to `output`.
#[instrument(skip(options))]
pub async fn run_distance(
    city_a: &str,
    city_b: &str,
    output: &Path,
    options: RenderOptions,
) -> Result<()> {
    init_tracing(&BaseConfig::log_file_from_env())?;
    let database_url = BaseConfig::database_url_from_env()?;
    let map_config = MapConfig::from_env()?;
    map_config.validate()?;

    let store = open_store(&database_url).await?;
    let renderer = build_renderer(&map_config, &store)?;

    match renderer
        .render_distance(output, city_a, city_b, options)
        .await?
    {
        DistanceOutcome::Rendered => {
            println!("Distance map written to {}", output.display());
            Ok(())
        }
        DistanceOutcome::MissingCoordinates(missing) => {
            anyhow::bail!("No coordinates for: {}", missing.join(", "))
        }
    }
}
