//! Renderer error types.

use citymap_core::DbotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Coordinate lookup failed: {0}")]
    Lookup(#[from] DbotError),

    #[error("Invalid basemap layer {layer}: {reason}")]
    Basemap { layer: String, reason: String },

    #[error("Invalid font: {0}")]
    Font(String),

    #[error("Render worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<RenderError> for DbotError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Lookup(inner) => inner,
            other => DbotError::Render(other.to_string()),
        }
    }
}
