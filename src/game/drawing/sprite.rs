// A named texture with a rotation origin

use crate::engine::assets::TextureInfo;
use crate::engine::renderer::DrawCommand;
use glam::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    name: String,
    texture: TextureInfo,
    origin: Vec2,
}

impl Sprite {
    /// Sprite pivoting on the texture centre
    pub fn new(name: &str, texture: TextureInfo) -> Self {
        Self::with_origin(name, texture, texture.center())
    }

    pub fn with_origin(name: &str, texture: TextureInfo, origin: Vec2) -> Self {
        Self {
            name: name.to_string(),
            texture,
            origin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> TextureInfo {
        self.texture
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Whole-texture draw at `position` around the origin
    pub fn draw_command(&self, position: Vec2) -> DrawCommand {
        DrawCommand::new(self.texture, position).origin(self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::AssetManager;

    #[test]
    fn test_default_origin_is_texture_centre() {
        let mut assets = AssetManager::new("unused");
        let texture = assets
            .insert_image("logs", image::RgbaImage::new(40, 20))
            .unwrap();

        let sprite = Sprite::new("logs", texture);
        assert_eq!(sprite.name(), "logs");
        assert_eq!(sprite.origin(), Vec2::new(20.0, 10.0));

        let cmd = sprite.draw_command(Vec2::new(5.0, 5.0));
        assert_eq!(cmd.origin, Vec2::new(20.0, 10.0));
        assert_eq!(cmd.position, Vec2::new(5.0, 5.0));
    }
}
