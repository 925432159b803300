// Sprite-sheet frame grids

use super::AssetError;
use crate::core::Rect;

/// A texture cut into a regular grid of equally sized frames
///
/// Frames are numbered row-major: frame `i` sits in column `i % columns` and
/// row `i / columns`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub columns: u32,
    pub rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SpriteSheet {
    /// Cut a `width x height` texture into `columns x rows` frames
    pub fn new(width: u32, height: u32, columns: u32, rows: u32) -> Result<Self, AssetError> {
        let invalid = || AssetError::InvalidSheet {
            width,
            height,
            columns,
            rows,
        };

        if columns == 0 || rows == 0 {
            return Err(invalid());
        }

        let frame_width = width / columns;
        let frame_height = height / rows;
        if frame_width == 0 || frame_height == 0 {
            return Err(invalid());
        }

        Ok(Self {
            columns,
            rows,
            frame_width,
            frame_height,
        })
    }

    /// Total number of frames in the grid
    pub fn frame_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Source rectangle of frame `index`
    pub fn frame(&self, index: u32) -> Rect {
        let column = index % self.columns;
        let row = index / self.columns;
        Rect::new(
            (self.frame_width * column) as f32,
            (self.frame_height * row) as f32,
            self.frame_width as f32,
            self.frame_height as f32,
        )
    }

    /// All frames in row-major order
    pub fn frames(&self) -> Vec<Rect> {
        (0..self.frame_count()).map(|i| self.frame(i)).collect()
    }

    /// Frames of a single row, left to right
    pub fn row(&self, row: u32) -> Vec<Rect> {
        if row >= self.rows {
            return Vec::new();
        }
        (0..self.columns)
            .map(|column| self.frame(row * self.columns + column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_frames_are_row_major() {
        let sheet = SpriteSheet::new(256, 128, 4, 2).unwrap();
        assert_eq!(sheet.frame_width, 64);
        assert_eq!(sheet.frame_height, 64);
        assert_eq!(sheet.frame_count(), 8);

        assert_eq!(sheet.frame(0), Rect::new(0.0, 0.0, 64.0, 64.0));
        assert_eq!(sheet.frame(3), Rect::new(192.0, 0.0, 64.0, 64.0));
        assert_eq!(sheet.frame(5), Rect::new(64.0, 64.0, 64.0, 64.0));
        assert_eq!(sheet.frames().len(), 8);
    }

    #[test]
    fn test_row_selection() {
        let sheet = SpriteSheet::new(128, 192, 4, 4).unwrap();
        let left = sheet.row(1);

        assert_eq!(left.len(), 4);
        assert!(left.iter().all(|r| r.y == 48.0));
        assert_eq!(left[2].x, 64.0);
        assert!(sheet.row(4).is_empty());
    }

    #[test]
    fn test_invalid_grids_rejected() {
        assert!(SpriteSheet::new(64, 64, 0, 1).is_err());
        assert!(SpriteSheet::new(64, 64, 1, 0).is_err());
        assert!(SpriteSheet::new(3, 64, 4, 1).is_err());
    }
}
