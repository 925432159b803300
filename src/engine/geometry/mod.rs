// Texture-to-polygon pipeline
//
// Turns the alpha channel of a texture into convex collision parts:
// alpha mask -> traced outline -> centred, simplified polygon -> convex partition.

mod outline;
mod polygon;

use outline::{AlphaMask, DEFAULT_ALPHA_THRESHOLD};
use polygon::{convex_partition, Polygon};

/// Geometry extraction errors
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("Texture has no opaque pixels")]
    EmptyMask,

    #[error("Outline has only {0} vertices, need at least 3")]
    Degenerate(usize),
}

/// Convex parts of a texture outline, centred on the outline centroid
#[derive(Debug, Clone)]
pub struct TextureShape {
    /// Centroid of the traced outline in texture pixels
    pub origin: glam::Vec2,

    /// Convex parts in pixels relative to `origin`
    pub parts: Vec<Vec<glam::Vec2>>,
}

impl TextureShape {
    /// Distance below which consecutive outline vertices are merged
    pub const REDUCE_DISTANCE: f32 = 4.0;

    /// Run the full pipeline on an RGBA image
    pub fn from_image(image: &image::RgbaImage) -> Result<Self, GeometryError> {
        let mask = AlphaMask::from_image(image, DEFAULT_ALPHA_THRESHOLD);
        let outline = mask.trace_outline().ok_or(GeometryError::EmptyMask)?;

        let mut polygon = Polygon::new(outline);
        if polygon.len() < 3 {
            return Err(GeometryError::Degenerate(polygon.len()));
        }

        let origin = polygon.centroid();
        polygon.translate(-origin);
        let polygon = polygon.reduce_by_distance(Self::REDUCE_DISTANCE);

        let parts = convex_partition(&polygon);
        if parts.is_empty() {
            return Err(GeometryError::Degenerate(polygon.len()));
        }

        Ok(Self { origin, parts })
    }

    /// Parts scaled by a uniform or per-axis factor
    pub fn scaled(&self, scale: glam::Vec2) -> Vec<Vec<glam::Vec2>> {
        self.parts
            .iter()
            .map(|part| part.iter().map(|v| *v * scale).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_rectangle_texture_pipeline() {
        // 20x12 opaque block in a 32x32 transparent image
        let image = RgbaImage::from_fn(32, 32, |x, y| {
            if (4..24).contains(&x) && (10..22).contains(&y) {
                Rgba([200, 100, 50, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });

        let shape = TextureShape::from_image(&image).unwrap();
        assert!((shape.origin.x - 13.5).abs() < 0.01);
        assert!((shape.origin.y - 15.5).abs() < 0.01);
        assert!(!shape.parts.is_empty());

        // Every vertex stays inside the traced pixel bounds, centred on the origin
        for part in &shape.parts {
            assert!(part.len() >= 3);
            for v in part {
                assert!(v.x >= -9.6 && v.x <= 9.6, "x out of range: {}", v.x);
                assert!(v.y >= -5.6 && v.y <= 5.6, "y out of range: {}", v.y);
            }
        }

        let doubled = shape.scaled(Vec2::splat(2.0));
        assert_eq!(doubled[0][0], shape.parts[0][0] * 2.0);
    }

    #[test]
    fn test_transparent_texture_is_rejected() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        assert!(matches!(
            TextureShape::from_image(&image),
            Err(GeometryError::EmptyMask)
        ));
    }

    #[test]
    fn test_single_pixel_is_degenerate() {
        let image = RgbaImage::from_fn(8, 8, |x, y| {
            if x == 3 && y == 3 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        assert!(matches!(
            TextureShape::from_image(&image),
            Err(GeometryError::Degenerate(1))
        ));
    }
}
