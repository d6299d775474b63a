//! Shared helpers for citymap-bot integration tests.

pub mod mock_bot;

use std::sync::Arc;

use city_store::CityStore;
use citymap_bot::CityMapHandler;
use citymap_core::{Chat, Message, User};
use map_renderer::{Basemap, MapRenderer};
use tempfile::TempDir;

use mock_bot::MockBot;

pub const CHAT_ID: i64 = 1001;

/// Store, mock bot and handler over a temporary database and output directory.
pub struct Fixture {
    pub store: CityStore,
    pub bot: Arc<MockBot>,
    pub handler: CityMapHandler,
    pub output_dir: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl Fixture {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("user_maps");
        Self::with_output_dir(temp_dir, output_dir).await
    }

    pub async fn with_output_dir(temp_dir: TempDir, output_dir: std::path::PathBuf) -> Self {
        let db_path = temp_dir.path().join("cities.db");
        let store = CityStore::new(db_path.to_str().unwrap()).await.unwrap();
        store.insert_city("Paris", 48.85, 2.35).await.unwrap();
        store.insert_city("Tokyo", 35.6897, 139.6922).await.unwrap();
        store.insert_city("New York", 40.6943, -73.9249).await.unwrap();

        let renderer = MapRenderer::new(Arc::new(store.clone()), Arc::new(Basemap::empty()));
        let bot = Arc::new(MockBot::new());
        let handler = CityMapHandler::new(bot.clone(), store.clone(), renderer, output_dir.clone());

        Self {
            store,
            bot,
            handler,
            output_dir,
            _temp_dir: temp_dir,
        }
    }
}

pub fn message(text: &str) -> Message {
    Message {
        id: "1".to_string(),
        user: User {
            id: CHAT_ID,
            username: Some("traveller".to_string()),
            first_name: Some("Test".to_string()),
        },
        chat: Chat {
            id: CHAT_ID,
            chat_type: "private".to_string(),
        },
        content: text.to_string(),
        created_at: chrono::Utc::now(),
    }
}
