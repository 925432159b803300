// Alpha mask and outline tracing

use glam::Vec2;
use image::RgbaImage;

/// Alpha value above which a pixel counts as solid
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

/// Neighbour offsets in clockwise order (y-down), starting west
const NEIGHBOURS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// Binary solid/empty mask built from a texture's alpha channel
#[derive(Debug, Clone)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    solid: Vec<bool>,
}

impl AlphaMask {
    pub fn from_image(image: &RgbaImage, threshold: u8) -> Self {
        let solid = image.pixels().map(|p| p.0[3] > threshold).collect();
        Self {
            width: image.width(),
            height: image.height(),
            solid,
        }
    }

    /// Build a mask directly from rows of `#` (solid) and `.` (empty)
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len()).unwrap_or(0) as u32;
        let solid = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '#'))
            .collect();
        Self {
            width,
            height,
            solid,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Solid test; anything outside the mask is empty
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.solid[(y as u32 * self.width + x as u32) as usize]
    }

    /// First solid pixel in row-major order
    fn first_solid(&self) -> Option<(i32, i32)> {
        let index = self.solid.iter().position(|&s| s)?;
        let index = index as u32;
        Some(((index % self.width) as i32, (index / self.width) as i32))
    }

    /// Trace the outer boundary of the first solid region
    ///
    /// Uses Moore-neighbour tracing and stops when the start pixel is about to be
    /// left the same way it was first left. Returns boundary pixel coordinates in
    /// clockwise order, or `None` for a fully transparent mask.
    pub fn trace_outline(&self) -> Option<Vec<Vec2>> {
        let start = self.first_solid()?;
        let mut points = vec![to_vec(start)];

        let mut current = start;
        // The pixel west of the start is empty because of the row-major scan
        let mut backtrack = 0usize;
        let mut first_move: Option<(i32, i32)> = None;
        let limit = 4 * (self.width as usize) * (self.height as usize) + 8;

        for _ in 0..limit {
            let Some((next, next_backtrack)) = self.step(current, backtrack) else {
                break;
            };

            if current == start {
                match first_move {
                    None => first_move = Some(next),
                    Some(first) if first == next => break,
                    Some(_) => {}
                }
            }

            current = next;
            backtrack = next_backtrack;
            if current != start {
                points.push(to_vec(current));
            }
        }

        Some(points)
    }

    /// Find the next boundary pixel clockwise from the backtrack direction
    fn step(&self, current: (i32, i32), backtrack: usize) -> Option<((i32, i32), usize)> {
        for i in 1..=8 {
            let dir = (backtrack + i) % 8;
            let (dx, dy) = NEIGHBOURS[dir];
            let candidate = (current.0 + dx, current.1 + dy);
            if !self.is_solid(candidate.0, candidate.1) {
                continue;
            }

            // The empty neighbour examined just before becomes the new backtrack
            let (px, py) = NEIGHBOURS[(dir + 7) % 8];
            let previous = (current.0 + px, current.1 + py);
            let relative = (previous.0 - candidate.0, previous.1 - candidate.1);
            let next_backtrack = NEIGHBOURS.iter().position(|&o| o == relative)?;
            return Some((candidate, next_backtrack));
        }
        None
    }
}

fn to_vec(p: (i32, i32)) -> Vec2 {
    Vec2::new(p.0 as f32, p.1 as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_outline() {
        let mask = AlphaMask::from_rows(&["###", "###", "###"]);
        let outline = mask.trace_outline().unwrap();

        let expected: Vec<Vec2> = [
            (0, 0),
            (1, 0),
            (2, 0),
            (2, 1),
            (2, 2),
            (1, 2),
            (0, 2),
            (0, 1),
        ]
        .iter()
        .map(|&p| to_vec(p))
        .collect();
        assert_eq!(outline, expected);
    }

    #[test]
    fn test_outline_skips_interior_pixels() {
        let mask = AlphaMask::from_rows(&[
            ".....",
            ".###.",
            ".###.",
            ".###.",
            ".....",
        ]);
        let outline = mask.trace_outline().unwrap();

        assert_eq!(outline.len(), 8);
        assert!(!outline.contains(&Vec2::new(2.0, 2.0)));
        assert_eq!(outline[0], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_l_shape_outline_visits_corner() {
        let mask = AlphaMask::from_rows(&[
            "#...",
            "#...",
            "####",
        ]);
        let outline = mask.trace_outline().unwrap();

        assert!(outline.contains(&Vec2::new(3.0, 2.0)));
        assert!(outline.contains(&Vec2::new(0.0, 1.0)));
        // Each boundary pixel of a one-pixel-wide arm is visited once per side
        assert!(outline.len() >= 6);
    }

    #[test]
    fn test_empty_mask_has_no_outline() {
        let mask = AlphaMask::from_rows(&["...", "..."]);
        assert!(mask.trace_outline().is_none());
    }

    #[test]
    fn test_alpha_threshold() {
        let image = RgbaImage::from_fn(2, 1, |x, _| {
            image::Rgba([0, 0, 0, if x == 0 { 127 } else { 128 }])
        });
        let mask = AlphaMask::from_image(&image, DEFAULT_ALPHA_THRESHOLD);
        assert!(!mask.is_solid(0, 0));
        assert!(mask.is_solid(1, 0));
        assert!(!mask.is_solid(2, 0));
        assert!(!mask.is_solid(-1, 0));
    }
}
