//! Map rendering config: where maps are written and where basemap assets live.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct MapConfig {
    /// MAP_OUTPUT_DIR; temporary PNGs are written here and removed after sending.
    pub output_dir: PathBuf,
    /// MAP_DATA_DIR; GeoJSON layers and `stock.png`. Unset means the built-in coarse world.
    pub data_dir: Option<PathBuf>,
    /// MAP_FONT_PATH; unset or unreadable means the built-in DejaVu Sans.
    pub font_path: Option<PathBuf>,
}

impl MapConfig {
    pub fn from_env() -> Result<Self> {
        let output_dir = env::var("MAP_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("user_maps"));
        let data_dir = non_empty_var("MAP_DATA_DIR").map(PathBuf::from);
        let font_path = non_empty_var("MAP_FONT_PATH").map(PathBuf::from);

        Ok(Self {
            output_dir,
            data_dir,
            font_path,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("MAP_OUTPUT_DIR is set but empty");
        }
        if let Some(dir) = &self.data_dir {
            if !dir.is_dir() {
                anyhow::bail!("MAP_DATA_DIR is not a directory: {}", dir.display());
            }
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
