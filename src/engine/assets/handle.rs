// Type-safe asset handle system

use std::fmt;
use std::marker::PhantomData;

/// Type-safe handle to a loaded asset
///
/// Handles index into the owning store and are never reused after the asset is
/// released, so a stale handle simply resolves to nothing.
pub struct AssetHandle<T> {
    index: u32,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            _phantom: PhantomData,
        }
    }

    /// Slot index inside the owning store
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

// Manual impls so that `T` does not need to implement these traits
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetHandle({})", self.index)
    }
}

/// Marker type for textures
pub struct TextureAsset;

pub type TextureHandle = AssetHandle<TextureAsset>;
