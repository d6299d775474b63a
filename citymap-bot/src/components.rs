//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use anyhow::Result;
use city_store::CityStore;
use citymap_core::{Bot as CoreBot, CityLookup, TelegramBot};
use map_renderer::{load_font, Basemap, MapRenderer};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::chain::HandlerChain;
use crate::config::{BotConfig, MapConfig};
use crate::handlers::{CityMapHandler, LoggingHandler};

/// Core dependencies for run_bot; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    /// Outbound replies. Tests inject a recording bot here.
    pub handler_bot: Arc<dyn CoreBot>,
    pub store: CityStore,
    pub renderer: MapRenderer,
    /// This bot's username, written by `run_repl` once `get_me` answers.
    pub bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
}

/// Teloxide bot from config, with the custom API URL applied when set.
pub fn build_teloxide_bot(config: &BotConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url) => {
            let url = reqwest::Url::parse(url)?;
            info!(api_url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Opens the city database, creating its tables when missing.
#[instrument(skip(database_url))]
pub async fn open_store(database_url: &str) -> Result<CityStore> {
    CityStore::new(database_url).await.map_err(|e| {
        error!(error = %e, database_url = %database_url, "Failed to initialize city storage");
        anyhow::anyhow!("Failed to initialize city storage: {}", e)
    })
}

/// Renderer over `store` with the basemap and font from config.
/// Without a data directory or font path the built-in world and font are used;
/// an unreadable font path falls back to the built-in font.
#[instrument(skip(config, store))]
pub fn build_renderer(config: &MapConfig, store: &CityStore) -> Result<MapRenderer> {
    let basemap = match config.data_dir.as_deref() {
        Some(dir) => Basemap::load(dir)
            .map_err(|e| anyhow::anyhow!("Failed to load basemap from {}: {}", dir.display(), e))?,
        None => {
            info!("MAP_DATA_DIR not set, using built-in basemap");
            Basemap::builtin()
                .map_err(|e| anyhow::anyhow!("Failed to load built-in basemap: {}", e))?
        }
    };

    let lookup: Arc<dyn CityLookup> = Arc::new(store.clone());
    let renderer = MapRenderer::new(lookup, Arc::new(basemap));

    match config.font_path.as_deref() {
        Some(path) => match load_font(path) {
            Ok(font) => {
                info!(font_path = %path.display(), "Loaded map font");
                Ok(renderer.with_font(font))
            }
            Err(e) => {
                warn!(error = %e, font_path = %path.display(), "Failed to load map font, using built-in font");
                Ok(renderer)
            }
        },
        None => Ok(renderer),
    }
}

/// Builds BotComponents. When `handler_bot_override` is set it replaces the Telegram reply bot.
#[instrument(skip(config, handler_bot_override))]
pub async fn build_bot_components(
    config: &BotConfig,
    handler_bot_override: Option<Arc<dyn CoreBot>>,
) -> Result<BotComponents> {
    let teloxide_bot = build_teloxide_bot(config)?;
    let store = open_store(config.database_url()).await?;
    let renderer = build_renderer(config.map(), &store)?;

    let handler_bot = handler_bot_override
        .unwrap_or_else(|| Arc::new(TelegramBot::from_bot(teloxide_bot.clone())));

    Ok(BotComponents {
        teloxide_bot,
        handler_bot,
        store,
        renderer,
        bot_username: Arc::new(tokio::sync::RwLock::new(None)),
    })
}

/// Handler chain: logging first, then the city map commands.
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let city_map = CityMapHandler::new(
        components.handler_bot.clone(),
        components.store.clone(),
        components.renderer.clone(),
        config.output_dir(),
    )
    .with_bot_username(components.bot_username.clone());

    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(city_map))
}
