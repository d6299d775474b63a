//! # City map bot
//!
//! Telegram bot that answers city commands with world map images. Wires the city store and map
//! renderer into a handler chain, loads config from env and runs the REPL.

pub mod chain;
pub mod cli;
pub mod command;
pub mod components;
pub mod config;
pub mod handlers;
pub mod map_file;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};

pub use chain::HandlerChain;
pub use command::{Command, CommandKind, ParsedArgs};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig, MapConfig};
pub use handlers::{CityMapHandler, LoggingHandler};
pub use map_file::MapFile;
pub use runner::{build_handler_chain_only, run_bot, run_distance, run_seed};
pub use telegram::{run_repl, TelegramMessageWrapper, TelegramUserWrapper};
