//! Bot abstraction for chat replies.
//!
//! [`Bot`] is transport-agnostic; [`TelegramBot`] implements it via teloxide. Tests substitute a recording mock.

use std::path::Path;

use crate::error::{DbotError, Result};
use crate::types::Chat;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, InputFile},
};

/// Outbound replies: plain text or a single image attachment.
#[async_trait]
pub trait Bot: Send + Sync {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Uploads the image file at `path` to the chat. The file must exist until this returns.
    async fn send_photo(&self, chat: &Chat, path: &Path) -> Result<()>;
}

/// Teloxide-based implementation of [`Bot`].
#[derive(Clone)]
pub struct TelegramBot {
    bot: teloxide::Bot,
}

impl TelegramBot {
    /// Creates a bot using the given Telegram bot token.
    pub fn new(token: String) -> Self {
        Self {
            bot: teloxide::Bot::new(token),
        }
    }

    /// Wraps an already configured teloxide bot (e.g. with a custom API URL).
    pub fn from_bot(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

#[async_trait]
impl Bot for TelegramBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text)
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, path: &Path) -> Result<()> {
        self.bot
            .send_photo(ChatId(chat.id), InputFile::file(path.to_path_buf()))
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}
