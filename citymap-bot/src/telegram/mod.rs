//! Telegram transport layer: teloxide message adapters and the REPL runner.

mod adapters;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use runner::run_repl;
