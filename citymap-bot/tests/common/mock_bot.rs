//! Mock implementation of [`citymap_core::Bot`] for integration tests.
//!
//! Records every reply so tests can assert on texts and photos without hitting Telegram. For photos
//! it captures what the file looked like at send time, since the handler removes it afterwards.

use async_trait::async_trait;
use citymap_core::{Bot, Chat, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
    },
    Photo {
        chat_id: i64,
        path: PathBuf,
        /// Image size when the photo was sent; `None` when the file was missing or not decodable.
        dimensions: Option<(u32, u32)>,
    },
}

#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                Sent::Photo { .. } => None,
            })
            .collect()
    }

    pub fn photos(&self) -> Vec<(PathBuf, Option<(u32, u32)>)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Photo {
                    path, dimensions, ..
                } => Some((path, dimensions)),
                Sent::Text { .. } => None,
            })
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo(&self, chat: &Chat, path: &Path) -> Result<()> {
        let dimensions = image::image_dimensions(path).ok();
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id: chat.id,
            path: path.to_path_buf(),
            dimensions,
        });
        Ok(())
    }
}
