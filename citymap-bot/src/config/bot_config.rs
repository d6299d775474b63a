//! BotConfig: BaseConfig + MapConfig. Use load() for env-based loading.

use anyhow::Result;
use std::path::Path;

use super::{BaseConfig, MapConfig};

/// Bot config: BaseConfig + map settings. Use BotConfig::load() for env-based loading.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub map: MapConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides BOT_TOKEN.
    /// Call validate() after load to check config before init.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let map = MapConfig::from_env()?;
        Ok(Self { base, map })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.map.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
    pub fn output_dir(&self) -> &Path {
        &self.map.output_dir
    }
    pub fn data_dir(&self) -> Option<&Path> {
        self.map.data_dir.as_deref()
    }
    pub fn font_path(&self) -> Option<&Path> {
        self.map.font_path.as_deref()
    }
}
