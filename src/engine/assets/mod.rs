// Asset management system
//
// Provides name-based loading and caching of decoded textures, sound lookup,
// and sprite-sheet frame grids. Textures are kept CPU-side; the renderer
// uploads them to the GPU on first use.

mod atlas;
mod handle;
mod loader;
mod manager;

pub use atlas::SpriteSheet;
pub use handle::{AssetHandle, TextureHandle};
pub use loader::{AssetLoader, AssetType};
pub use manager::{AssetManager, TextureInfo};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Invalid asset type: expected {expected}, got {actual}")]
    InvalidType { expected: String, actual: String },

    #[error("Failed to load asset: {0}")]
    LoadError(String),

    #[error("Sprite sheet {width}x{height} cannot be cut into {columns}x{rows} frames")]
    InvalidSheet {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// True when the asset simply does not exist, as opposed to failing to decode
    pub fn is_missing(&self) -> bool {
        matches!(self, AssetError::NotFound(_))
    }
}
