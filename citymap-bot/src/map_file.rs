//! Temporary map image files.
//!
//! A [`MapFile`] names the PNG a request renders into and removes it when dropped, so the file is
//! gone once the reply attempt finishes, whichever way the handler exits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub struct MapFile {
    path: PathBuf,
}

impl MapFile {
    /// `{dir}/{chat_id}_{city}.png`. Path separators in the city name become `_`.
    pub fn for_city(dir: &Path, chat_id: i64, city: &str) -> io::Result<Self> {
        let safe: String = city
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        Self::prepare(dir, &format!("{chat_id}_{safe}.png"))
    }

    /// `{dir}/{chat_id}_my_cities.png`.
    pub fn for_saved_cities(dir: &Path, chat_id: i64) -> io::Result<Self> {
        Self::prepare(dir, &format!("{chat_id}_my_cities.png"))
    }

    /// Creates `dir` if needed (existing is fine). The file itself is written by the renderer.
    fn prepare(dir: &Path, file_name: &str) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for MapFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed map file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove map file"),
        }
    }
}
