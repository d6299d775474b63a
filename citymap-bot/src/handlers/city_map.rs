//! City map command handler: dispatches chat commands to the city store and map renderer.
//!
//! Stateless per message. Every command body runs inside one error boundary: failures are logged
//! and answered with the command's generic failure text, and the chain always stops here.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use city_store::CityStore;
use citymap_core::{
    Bot as CoreBot, DbotError, Handler, HandlerResponse, MarkerColor, Message, RenderOptions,
    RenderRequest, Result,
};
use map_renderer::MapRenderer;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::command::{Command, CommandKind, ParsedArgs};
use crate::map_file::MapFile;

pub const MSG_START: &str =
    "Hi! I'm a bot that shows cities on a world map. Send /help for the list of commands.";
pub const MSG_HELP: &str = "Available commands:\n\
/start - Start working with the bot\n\
/help - Show the list of commands\n\
/show_city <city_name> [color:red/blue/green/yellow/black/purple/orange] [fill] [objects] - Show a city on the map\n\
/remember_city <city_name> - Remember a city\n\
/show_my_cities [color:red/blue/green/yellow/black/purple/orange] [fill] [objects] - Show my saved cities";
pub const MSG_GUIDE: &str = "HOW TO USE:\n\
Start the bot.\n\
Use /show_city and /show_my_cities with options. For example:\n\
/show_city London color:blue\n\
/show_city Paris fill objects\n\
/show_my_cities color:green fill\n\
/show_my_cities objects";
pub const MSG_SHOW_CITY_USAGE: &str = "Please specify a city name after /show_city";
pub const MSG_CITY_NAME_UNRECOGNIZED: &str = "Could not recognize the city name.";
pub const MSG_CITY_NOT_FOUND: &str =
    "Could not find coordinates for that city. Check the spelling of the city name.";
pub const MSG_REMEMBER_USAGE: &str = "Please specify a city name after /remember_city";
pub const MSG_UNKNOWN_CITY: &str = "I don't know that city. Make sure it is written in English!";
pub const MSG_NO_CITIES: &str = "You haven't saved any cities yet.";
pub const MSG_REQUEST_FAILED: &str = "An error occurred while processing your request.";
pub const MSG_REMEMBER_FAILED: &str = "An error occurred while saving the city.";
pub const MSG_SHOW_MY_CITIES_FAILED: &str = "An error occurred while showing your saved cities.";

/// Warning sent when `color:<value>` is not a known marker colour.
pub fn invalid_color_message() -> String {
    format!(
        "Invalid marker color, using {}. Available colors: {}",
        MarkerColor::default(),
        MarkerColor::names()
    )
}

pub fn remembered_message(city: &str) -> String {
    format!("City {city} saved successfully!")
}

fn failure_message(kind: CommandKind) -> &'static str {
    match kind {
        CommandKind::RememberCity => MSG_REMEMBER_FAILED,
        CommandKind::ShowMyCities => MSG_SHOW_MY_CITIES_FAILED,
        _ => MSG_REQUEST_FAILED,
    }
}

fn storage_error(e: city_store::StorageError) -> DbotError {
    DbotError::Database(e.to_string())
}

/// Terminal handler for the city map commands. Unrecognised text passes through with `Continue`.
#[derive(Clone)]
pub struct CityMapHandler {
    bot: Arc<dyn CoreBot>,
    store: CityStore,
    renderer: MapRenderer,
    output_dir: PathBuf,
    /// Filled by the runner from `get_me`; `None` until known.
    bot_username: Arc<RwLock<Option<String>>>,
}

impl CityMapHandler {
    pub fn new(
        bot: Arc<dyn CoreBot>,
        store: CityStore,
        renderer: MapRenderer,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bot,
            store,
            renderer,
            output_dir: output_dir.into(),
            bot_username: Arc::new(RwLock::new(None)),
        }
    }

    /// Shares the bot username cache so `/command@OtherBot` in groups is left alone.
    pub fn with_bot_username(mut self, bot_username: Arc<RwLock<Option<String>>>) -> Self {
        self.bot_username = bot_username;
        self
    }

    async fn reply(&self, message: &Message, text: &str) -> Result<()> {
        self.bot.send_message(&message.chat, text).await
    }

    async fn run(&self, message: &Message, command: &Command<'_>) -> Result<()> {
        match command.kind {
            CommandKind::Start => self.reply(message, MSG_START).await,
            CommandKind::Help => self.reply(message, MSG_HELP).await,
            CommandKind::Guide => self.reply(message, MSG_GUIDE).await,
            CommandKind::ShowCity => self.show_city(message, &command.args).await,
            CommandKind::RememberCity => self.remember_city(message, &command.args).await,
            CommandKind::ShowMyCities => self.show_my_cities(message, &command.args).await,
        }
    }

    /// Options for rendering; warns the user (and falls back to the default) on an unknown colour.
    async fn render_options(&self, message: &Message, parsed: &ParsedArgs) -> Result<RenderOptions> {
        if let Err(value) = parsed.marker_color() {
            warn!(chat_id = message.chat.id, color = %value, "Unknown marker color, using default");
            self.reply(message, &invalid_color_message()).await?;
        }
        Ok(parsed.render_options())
    }

    /// Renders `request` into `file` and sends it as a photo. The file is removed when `file` drops.
    async fn send_map(&self, message: &Message, file: MapFile, request: RenderRequest) -> Result<()> {
        let summary = self
            .renderer
            .render(file.path(), &request.cities, request.options)
            .await?;
        self.bot.send_photo(&message.chat, file.path()).await?;
        info!(
            chat_id = message.chat.id,
            plotted = summary.plotted.len(),
            skipped = summary.skipped.len(),
            "Map sent"
        );
        Ok(())
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn show_city(&self, message: &Message, args: &[&str]) -> Result<()> {
        if args.is_empty() {
            return self.reply(message, MSG_SHOW_CITY_USAGE).await;
        }

        let parsed = ParsedArgs::parse(args);
        if parsed.text.is_empty() {
            return self.reply(message, MSG_CITY_NAME_UNRECOGNIZED).await;
        }

        let options = self.render_options(message, &parsed).await?;
        let city = parsed.text;

        let coordinates = self
            .store
            .lookup_coordinates(&city)
            .await
            .map_err(storage_error)?;
        if coordinates.is_none() {
            info!(chat_id = message.chat.id, city = %city, "City not found");
            return self.reply(message, MSG_CITY_NOT_FOUND).await;
        }

        let file = MapFile::for_city(&self.output_dir, message.chat.id, &city)?;
        self.send_map(message, file, RenderRequest::new(vec![city], options))
            .await
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn remember_city(&self, message: &Message, args: &[&str]) -> Result<()> {
        let city = args.join(" ");
        if city.is_empty() {
            return self.reply(message, MSG_REMEMBER_USAGE).await;
        }

        let saved = self
            .store
            .add_association(message.chat.id, &city)
            .await
            .map_err(storage_error)?;

        if saved {
            self.reply(message, &remembered_message(&city)).await
        } else {
            self.reply(message, MSG_UNKNOWN_CITY).await
        }
    }

    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn show_my_cities(&self, message: &Message, args: &[&str]) -> Result<()> {
        let parsed = ParsedArgs::parse(args);

        let cities = self
            .store
            .list_cities(message.chat.id)
            .await
            .map_err(storage_error)?;
        if cities.is_empty() {
            return self.reply(message, MSG_NO_CITIES).await;
        }

        let options = self.render_options(message, &parsed).await?;
        let file = MapFile::for_saved_cities(&self.output_dir, message.chat.id)?;
        self.send_map(message, file, RenderRequest::new(cities, options))
            .await
    }
}

#[async_trait]
impl Handler for CityMapHandler {
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let username = self.bot_username.read().await.clone();
        let Some(command) = Command::parse_for(&message.content, username.as_deref()) else {
            debug!(chat_id = message.chat.id, "Not a command for this bot");
            return Ok(HandlerResponse::Continue);
        };

        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            command = command.kind.name(),
            "Dispatching command"
        );

        if let Err(e) = self.run(message, &command).await {
            error!(
                error = %e,
                user_id = message.user.id,
                chat_id = message.chat.id,
                command = command.kind.name(),
                "Command failed"
            );
            if let Err(send_err) = self.reply(message, failure_message(command.kind)).await {
                error!(error = %send_err, chat_id = message.chat.id, "Failed to send failure reply");
            }
        }

        Ok(HandlerResponse::Stop)
    }
}
