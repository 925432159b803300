// CPU-side sprite batch
//
// Game code records draw commands here; the renderer turns them into quads.
// Nothing in this module touches the GPU.

use super::Vertex;
use crate::core::Rect;
use crate::engine::assets::{TextureHandle, TextureInfo};
use glam::{Vec2, Vec4};

/// Opaque white, the neutral tint
pub const WHITE: Vec4 = Vec4::ONE;

/// Mirroring applied to a sprite's texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteFlip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl SpriteFlip {
    fn flips_x(self) -> bool {
        matches!(self, SpriteFlip::Horizontal | SpriteFlip::Both)
    }

    fn flips_y(self) -> bool {
        matches!(self, SpriteFlip::Vertical | SpriteFlip::Both)
    }
}

/// One textured quad
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureHandle,
    pub texture_size: Vec2,
    /// World position of the origin
    pub position: Vec2,
    /// Sub-rectangle of the texture in pixels
    pub source: Rect,
    pub tint: Vec4,
    /// Rotation in radians around the origin
    pub rotation: f32,
    /// Pivot inside the source rectangle, in pixels
    pub origin: Vec2,
    pub scale: Vec2,
    pub flip: SpriteFlip,
    /// 0.0 is front, 1.0 is back
    pub layer_depth: f32,
}

impl DrawCommand {
    /// Whole texture at `position`, pivoting on its top-left corner
    pub fn new(texture: TextureInfo, position: Vec2) -> Self {
        Self {
            texture: texture.handle,
            texture_size: texture.size(),
            position,
            source: Rect::new(0.0, 0.0, texture.width as f32, texture.height as f32),
            tint: WHITE,
            rotation: 0.0,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            flip: SpriteFlip::None,
            layer_depth: 0.0,
        }
    }

    pub fn source(mut self, source: Rect) -> Self {
        self.source = source;
        self
    }

    pub fn tint(mut self, tint: Vec4) -> Self {
        self.tint = tint;
        self
    }

    pub fn rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn flip(mut self, flip: SpriteFlip) -> Self {
        self.flip = flip;
        self
    }

    pub fn layer_depth(mut self, depth: f32) -> Self {
        self.layer_depth = depth;
        self
    }

    /// World-space corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        let size = self.source.size();
        let (sin, cos) = self.rotation.sin_cos();
        let local = [
            Vec2::ZERO,
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
        ];
        local.map(|corner| {
            let p = (corner - self.origin) * self.scale;
            self.position + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
        })
    }

    /// Texture coordinates matching [`Self::corners`]
    pub fn uvs(&self) -> [Vec2; 4] {
        let inv = Vec2::ONE / self.texture_size.max(Vec2::ONE);
        let mut min = self.source.min() * inv;
        let mut max = self.source.max() * inv;
        if self.flip.flips_x() {
            std::mem::swap(&mut min.x, &mut max.x);
        }
        if self.flip.flips_y() {
            std::mem::swap(&mut min.y, &mut max.y);
        }
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }

    fn vertices(&self) -> [Vertex; 4] {
        let corners = self.corners();
        let uvs = self.uvs();
        std::array::from_fn(|i| {
            Vertex::new(corners[i], uvs[i], self.tint)
        })
    }
}

/// Consecutive commands sharing a texture
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRun {
    pub texture: TextureHandle,
    pub indices: std::ops::Range<u32>,
}

/// Geometry for one batch, ready for upload
#[derive(Debug, Default)]
pub struct BatchMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub runs: Vec<DrawRun>,
}

/// Ordered list of sprite draws for one frame
#[derive(Debug, Default, Clone)]
pub struct SpriteBatch {
    commands: Vec<DrawCommand>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Build quads back to front (higher layer depth first, submission order on ties)
    pub fn build_mesh(&self) -> BatchMesh {
        let mut order: Vec<&DrawCommand> = self.commands.iter().collect();
        order.sort_by(|a, b| b.layer_depth.total_cmp(&a.layer_depth));

        let mut mesh = BatchMesh {
            vertices: Vec::with_capacity(order.len() * 4),
            indices: Vec::with_capacity(order.len() * 6),
            runs: Vec::new(),
        };

        for command in order {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&command.vertices());

            let start = mesh.indices.len() as u32;
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            let end = mesh.indices.len() as u32;

            match mesh.runs.last_mut() {
                Some(run) if run.texture == command.texture => run.indices.end = end,
                _ => mesh.runs.push(DrawRun {
                    texture: command.texture,
                    indices: start..end,
                }),
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::AssetManager;
    use approx::assert_relative_eq;

    fn texture(assets: &mut AssetManager, name: &str, w: u32, h: u32) -> TextureInfo {
        assets
            .insert_image(name, image::RgbaImage::new(w, h))
            .unwrap()
    }

    #[test]
    fn test_corners_with_origin_and_scale() {
        let mut assets = AssetManager::new("unused");
        let tex = texture(&mut assets, "sheet", 64, 32);
        let cmd = DrawCommand::new(tex, Vec2::new(100.0, 50.0))
            .origin(Vec2::new(32.0, 16.0))
            .scale(Vec2::splat(2.0));

        let c = cmd.corners();
        assert_eq!(c[0], Vec2::new(36.0, 18.0));
        assert_eq!(c[2], Vec2::new(164.0, 82.0));
    }

    #[test]
    fn test_rotation_around_origin() {
        let mut assets = AssetManager::new("unused");
        let tex = texture(&mut assets, "bar", 10, 2);
        let cmd = DrawCommand::new(tex, Vec2::ZERO).rotation(std::f32::consts::FRAC_PI_2);

        // Top-right corner (10, 0) rotates onto the +y axis
        let c = cmd.corners();
        assert_relative_eq!(c[1].x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(c[1].y, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_source_rect_uvs_and_flip() {
        let mut assets = AssetManager::new("unused");
        let tex = texture(&mut assets, "grid", 128, 64);
        let cmd = DrawCommand::new(tex, Vec2::ZERO).source(Rect::new(32.0, 32.0, 32.0, 32.0));

        let uv = cmd.uvs();
        assert_eq!(uv[0], Vec2::new(0.25, 0.5));
        assert_eq!(uv[2], Vec2::new(0.5, 1.0));

        let flipped = cmd.flip(SpriteFlip::Horizontal).uvs();
        assert_eq!(flipped[0], Vec2::new(0.5, 0.5));
        assert_eq!(flipped[2], Vec2::new(0.25, 1.0));
    }

    #[test]
    fn test_mesh_groups_runs_by_texture() {
        let mut assets = AssetManager::new("unused");
        let a = texture(&mut assets, "a", 4, 4);
        let b = texture(&mut assets, "b", 4, 4);

        let mut batch = SpriteBatch::new();
        batch.draw(DrawCommand::new(a, Vec2::ZERO));
        batch.draw(DrawCommand::new(a, Vec2::ONE));
        batch.draw(DrawCommand::new(b, Vec2::ONE));

        let mesh = batch.build_mesh();
        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.indices.len(), 18);
        assert_eq!(
            mesh.runs,
            vec![
                DrawRun { texture: a.handle, indices: 0..12 },
                DrawRun { texture: b.handle, indices: 12..18 },
            ]
        );
    }

    #[test]
    fn test_back_layers_drawn_first() {
        let mut assets = AssetManager::new("unused");
        let front = texture(&mut assets, "front", 4, 4);
        let back = texture(&mut assets, "back", 4, 4);

        let mut batch = SpriteBatch::new();
        batch.draw(DrawCommand::new(front, Vec2::ZERO).layer_depth(0.0));
        batch.draw(DrawCommand::new(back, Vec2::ZERO).layer_depth(1.0));

        let mesh = batch.build_mesh();
        assert_eq!(mesh.runs[0].texture, back.handle);
        assert_eq!(mesh.runs[1].texture, front.handle);
    }
}
