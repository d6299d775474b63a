//! Bot configuration: BaseConfig (Telegram + log + DB) + MapConfig (rendering assets and output).

mod base;
mod bot_config;
mod map;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use map::MapConfig;
