// Central asset management system

use super::{AssetError, AssetHandle, AssetLoader, AssetType, TextureHandle};
use glam::Vec2;
use image::RgbaImage;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// Name of the built-in 1x1 white texture used for untextured quads
pub const WHITE_TEXTURE: &str = "__white";

/// A loaded texture handle together with its pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl TextureInfo {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Centre of the texture in pixels
    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

struct TextureEntry {
    name: String,
    image: RgbaImage,
}

/// Central asset manager for the game
///
/// Owns decoded texture pixels and resolves content names. Textures loaded by a
/// screen are released through [`AssetManager::release`] when the screen unloads.
pub struct AssetManager {
    loader: AssetLoader,

    /// Texture slots, indexed by handle. Released slots become `None`.
    textures: Vec<Option<TextureEntry>>,

    /// Name to handle mapping for textures
    texture_names: HashMap<String, TextureHandle>,

    white: TextureInfo,
}

impl AssetManager {
    /// Create a new asset manager rooted at `asset_path`
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        let white_image = RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]));
        let white_handle = AssetHandle::new(0);

        let mut texture_names = HashMap::new();
        texture_names.insert(WHITE_TEXTURE.to_string(), white_handle);

        info!("Asset root: {}", asset_path.as_ref().display());

        Self {
            loader: AssetLoader::new(asset_path),
            textures: vec![Some(TextureEntry {
                name: WHITE_TEXTURE.to_string(),
                image: white_image,
            })],
            texture_names,
            white: TextureInfo {
                handle: white_handle,
                width: 1,
                height: 1,
            },
        }
    }

    /// Load a texture by content name, returning the cached handle if already loaded
    pub fn load_texture(&mut self, name: &str) -> Result<TextureInfo, AssetError> {
        if let Some(info) = self.texture_info_by_name(name) {
            return Ok(info);
        }

        let bytes = self.loader.load_bytes(AssetType::Texture, name)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::LoadError(format!("Failed to decode {}: {}", name, e)))?
            .to_rgba8();

        debug!("Loaded texture {} ({}x{})", name, image.width(), image.height());
        self.insert(name, image)
    }

    /// Load a texture, falling back to another one when it is missing
    ///
    /// The fallback is logged as a missing resource.
    pub fn load_texture_or(&mut self, name: &str, fallback: TextureInfo) -> TextureInfo {
        match self.load_texture(name) {
            Ok(info) => info,
            Err(err) => {
                warn!("Resource missing, using fallback texture: {}", err);
                fallback
            }
        }
    }

    /// Register an already decoded image under a name
    pub fn insert_image(&mut self, name: &str, image: RgbaImage) -> Result<TextureInfo, AssetError> {
        if self.texture_names.contains_key(name) {
            return Err(AssetError::AlreadyLoaded(name.to_string()));
        }
        self.insert(name, image)
    }

    fn insert(&mut self, name: &str, image: RgbaImage) -> Result<TextureInfo, AssetError> {
        let index = u32::try_from(self.textures.len())
            .map_err(|_| AssetError::LoadError("Texture store is full".to_string()))?;
        let handle = AssetHandle::new(index);
        let info = TextureInfo {
            handle,
            width: image.width(),
            height: image.height(),
        };

        self.textures.push(Some(TextureEntry {
            name: name.to_string(),
            image,
        }));
        self.texture_names.insert(name.to_string(), handle);
        Ok(info)
    }

    /// Release a texture. The built-in white texture is never released.
    pub fn release(&mut self, handle: TextureHandle) {
        if handle == self.white.handle {
            return;
        }
        if let Some(slot) = self.textures.get_mut(handle.index()) {
            if let Some(entry) = slot.take() {
                debug!("Released texture {}", entry.name);
                self.texture_names.remove(&entry.name);
            }
        }
    }

    fn texture_info_by_name(&self, name: &str) -> Option<TextureInfo> {
        let handle = *self.texture_names.get(name)?;
        self.texture_info(handle)
    }

    /// Dimensions of a loaded texture
    pub fn texture_info(&self, handle: TextureHandle) -> Option<TextureInfo> {
        self.image(handle).map(|image| TextureInfo {
            handle,
            width: image.width(),
            height: image.height(),
        })
    }

    /// Decoded pixels of a loaded texture
    pub fn image(&self, handle: TextureHandle) -> Option<&RgbaImage> {
        self.textures
            .get(handle.index())
            .and_then(|slot| slot.as_ref())
            .map(|entry| &entry.image)
    }

    /// Content name a texture was loaded under
    pub fn texture_name(&self, handle: TextureHandle) -> Option<&str> {
        self.textures
            .get(handle.index())
            .and_then(|slot| slot.as_ref())
            .map(|entry| entry.name.as_str())
    }

    /// The built-in white texture
    pub fn white_texture(&self) -> TextureInfo {
        self.white
    }

    /// Check if a sound asset exists
    pub fn sound_exists(&self, name: &str) -> bool {
        self.loader.exists(AssetType::Sound, name)
    }
    /// Number of live textures, including the built-in white texture

    #[cfg(test)]
    pub fn texture_count(&self) -> usize {
        self.textures.iter().filter(|slot| slot.is_some()).count()
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }
}
