//! Error types for the bot core.

use thiserror::Error;

/// Top-level error raised inside handlers: storage, transport, rendering and IO.
///
/// None of these reach the user verbatim; the dispatcher logs them and replies with a generic message.
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DbotError>;
