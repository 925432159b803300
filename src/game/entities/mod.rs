// Level entities: the player character, portals, scenery and creatures
//
// Every entity pairs a physics body with something to draw. Collision shapes
// come from texture alpha through the geometry pipeline, scaled from texture
// pixels to simulation metres.

pub mod building;
pub mod campfire;
pub mod character;
pub mod enemy;
pub mod portal;

pub use building::Building;
pub use campfire::Campfire;
pub use character::{Character, MovementIntent};
pub use enemy::Enemy;
pub use portal::PortalPair;

use crate::core::math::DISPLAY_UNITS_PER_SIM_UNIT;
use crate::core::Rect;
use crate::engine::assets::{AssetError, AssetManager, TextureInfo};
use crate::engine::geometry::{GeometryError, TextureShape};
use crate::engine::physics::ColliderBuilder2D;
use crate::game::drawing::AnimationError;
use glam::Vec2;
use image::imageops;

#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Animation(#[from] AnimationError),

    #[error("Collision shape for {name}: {source}")]
    Geometry {
        name: String,
        #[source]
        source: GeometryError,
    },

    #[error("Texture {0} has no pixel data")]
    MissingPixels(String),

    #[error("Collision shape for {0} has no usable convex parts")]
    EmptyShape(String),
}

/// Collision parts of a texture in simulation units plus the draw origin
#[derive(Debug, Clone)]
pub struct BodyShape {
    /// Centroid of the outline in texture pixels, used as the sprite origin
    pub origin: Vec2,
    pub parts: Vec<Vec<Vec2>>,
}

impl BodyShape {
    /// Trace `region` of `texture` (the whole texture when `None`) and scale
    /// the parts by `scale / DISPLAY_UNITS_PER_SIM_UNIT`
    pub fn from_texture(
        assets: &AssetManager,
        name: &str,
        texture: TextureInfo,
        region: Option<Rect>,
        scale: Vec2,
    ) -> Result<Self, EntityError> {
        let image = assets
            .image(texture.handle)
            .ok_or_else(|| EntityError::MissingPixels(name.to_string()))?;

        let shape = match region {
            Some(rect) => {
                let cropped = imageops::crop_imm(
                    image,
                    rect.x as u32,
                    rect.y as u32,
                    rect.width as u32,
                    rect.height as u32,
                )
                .to_image();
                TextureShape::from_image(&cropped)
            }
            None => TextureShape::from_image(image),
        }
        .map_err(|source| EntityError::Geometry {
            name: name.to_string(),
            source,
        })?;

        Ok(Self {
            origin: shape.origin,
            parts: shape.scaled(scale / DISPLAY_UNITS_PER_SIM_UNIT),
        })
    }

    /// Box covering `size` pixels at `scale`, pivoting on its centre
    pub fn rectangle(size: Vec2, scale: Vec2) -> Self {
        let half = size * scale * 0.5 / DISPLAY_UNITS_PER_SIM_UNIT;
        Self {
            origin: size * 0.5,
            parts: vec![vec![
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ]],
        }
    }

    pub fn collider(&self, name: &str) -> Result<ColliderBuilder2D, EntityError> {
        ColliderBuilder2D::convex_parts(&self.parts).ok_or_else(|| EntityError::EmptyShape(name.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::engine::assets::{AssetManager, TextureInfo};
    use image::{Rgba, RgbaImage};

    /// Image with an opaque rectangle inset by `margin` pixels
    pub fn inset_block(width: u32, height: u32, margin: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if x >= margin && y >= margin && x < width - margin && y < height - margin {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    pub fn insert_block(assets: &mut AssetManager, name: &str, width: u32, height: u32) -> TextureInfo {
        assets.insert_image(name, inset_block(width, height, 2)).unwrap()
    }
}
