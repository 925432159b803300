// Asset file resolution and loading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    Texture,
    Sound,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Texture => "textures",
            AssetType::Sound => "sounds",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Texture => &["png", "jpg", "jpeg"],
            AssetType::Sound => &["wav", "ogg", "mp3"],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AssetType::Texture => "texture",
            AssetType::Sound => "sound",
        }
    }
}

/// Resolves content names such as `EnvironmentObjects/Tents/hunter_45` to files
///
/// Names are relative to the type directory and may omit the extension, in
/// which case every supported extension is tried in order.
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path an asset name maps to before extension probing
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        self.base_path
            .join(asset_type.default_directory())
            .join(name)
    }

    /// Find the file backing an asset name
    pub fn find(&self, asset_type: AssetType, name: &str) -> Result<PathBuf, AssetError> {
        let path = self.resolve_path(asset_type, name);

        if let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) {
            if asset_type.extensions().contains(&ext.as_str()) {
                return if path.is_file() {
                    Ok(path)
                } else {
                    Err(AssetError::NotFound(name.to_string()))
                };
            }
            if AssetType::all()
                .iter()
                .any(|other| other.extensions().contains(&ext.as_str()))
            {
                return Err(AssetError::InvalidType {
                    expected: asset_type.label().to_string(),
                    actual: ext,
                });
            }
        }

        asset_type
            .extensions()
            .iter()
            .map(|ext| append_extension(&path, ext))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, asset_type: AssetType, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.find(asset_type, name)?;
        std::fs::read(&path)
            .map_err(|e| AssetError::LoadError(format!("Failed to read {}: {}", name, e)))
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.find(asset_type, name).is_ok()
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl AssetType {
    fn all() -> &'static [AssetType] {
        &[AssetType::Texture, AssetType::Sound]
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}
