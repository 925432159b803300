// Frame-based sprite-sheet animation

use super::Sprite;
use crate::core::Rect;
use crate::engine::assets::{AssetError, SpriteSheet, TextureInfo};
use crate::engine::renderer::{batch::WHITE, DrawCommand, SpriteBatch, SpriteFlip};
use glam::{Vec2, Vec4};

/// Playback state of a [`SpriteAnimation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    Running,
    Paused,
    #[default]
    Stopped,
}

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("Frames per second must be positive and finite, got {0}")]
    InvalidFrameRate(f32),

    #[error("Frame interval must be positive and finite, got {0}")]
    InvalidFrameInterval(f32),

    #[error("Row {row} is outside a sheet with {rows} rows")]
    RowOutOfRange { row: u32, rows: u32 },

    #[error(transparent)]
    Sheet(#[from] AssetError),
}

/// How a sprite sheet is cut into animation frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// Every cell of a `columns x rows` grid, row-major
    Grid { columns: u32, rows: u32 },
    /// Only the cells of one row of the grid
    Row { columns: u32, rows: u32, row: u32 },
}

impl FrameLayout {
    fn frames(self, texture: TextureInfo) -> Result<(Vec<Rect>, Vec2), AnimationError> {
        let (columns, rows) = match self {
            FrameLayout::Grid { columns, rows } | FrameLayout::Row { columns, rows, .. } => {
                (columns, rows)
            }
        };
        let sheet = SpriteSheet::new(texture.width, texture.height, columns, rows)?;
        let size = Vec2::new(sheet.frame_width as f32, sheet.frame_height as f32);

        let frames = match self {
            FrameLayout::Grid { .. } => sheet.frames(),
            FrameLayout::Row { row, .. } => {
                if row >= rows {
                    return Err(AnimationError::RowOutOfRange { row, rows });
                }
                sheet.row(row)
            }
        };
        Ok((frames, size))
    }
}

fn validate_rate(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// A sprite that steps through sheet frames at a fixed rate.
///
/// The current frame index is always in `0..frame_count()`, and after an
/// update the time accumulator is always below one frame interval.
/// Non-looping animations hold their last frame and stay `Running` until
/// stopped.
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    sprite: Sprite,
    frames: Vec<Rect>,
    frame_size: Vec2,
    frames_per_second: f32,
    frame_interval: f32,
    looping: bool,
    current_frame: usize,
    elapsed: f32,
    state: AnimationState,

    pub visible: bool,
    pub tint: Vec4,
    pub rotation: f32,
    pub scale: Vec2,
    pub flip: SpriteFlip,
    pub layer_depth: f32,
}

impl SpriteAnimation {
    /// New, stopped animation pivoting on the centre of one frame
    pub fn new(
        name: &str,
        texture: TextureInfo,
        layout: FrameLayout,
        frames_per_second: f32,
        looping: bool,
    ) -> Result<Self, AnimationError> {
        if !validate_rate(frames_per_second) {
            return Err(AnimationError::InvalidFrameRate(frames_per_second));
        }
        let (frames, frame_size) = layout.frames(texture)?;

        Ok(Self {
            sprite: Sprite::with_origin(name, texture, frame_size * 0.5),
            frames,
            frame_size,
            frames_per_second,
            frame_interval: 1.0 / frames_per_second,
            looping,
            current_frame: 0,
            elapsed: 0.0,
            state: AnimationState::Stopped,
            visible: true,
            tint: WHITE,
            rotation: 0.0,
            scale: Vec2::ONE,
            flip: SpriteFlip::None,
            layer_depth: 0.0,
        })
    }

    /// Same as [`Self::new`] with an explicit origin
    pub fn with_origin(
        name: &str,
        texture: TextureInfo,
        origin: Vec2,
        layout: FrameLayout,
        frames_per_second: f32,
        looping: bool,
    ) -> Result<Self, AnimationError> {
        let mut animation = Self::new(name, texture, layout, frames_per_second, looping)?;
        animation.sprite.set_origin(origin);
        Ok(animation)
    }

    /// Restart from frame 0 and run
    pub fn play(&mut self) {
        self.reset();
        self.state = AnimationState::Running;
    }

    /// Freeze on the current frame. Only affects a running animation.
    pub fn pause(&mut self) {
        if self.state == AnimationState::Running {
            self.state = AnimationState::Paused;
        }
    }

    /// Continue a paused animation from where it stopped
    pub fn resume(&mut self) {
        if self.state == AnimationState::Paused {
            self.state = AnimationState::Running;
        }
    }

    /// Return to frame 0 and stop
    pub fn stop(&mut self) {
        self.reset();
        self.state = AnimationState::Stopped;
    }

    fn reset(&mut self) {
        self.current_frame = 0;
        self.elapsed = 0.0;
    }

    /// Advance by `dt` seconds of game time
    pub fn update(&mut self, dt: f32) {
        if self.state != AnimationState::Running {
            return;
        }

        self.elapsed += dt.max(0.0);
        if self.elapsed < self.frame_interval {
            return;
        }

        // Remainder carries into the next frame
        let whole = (self.elapsed / self.frame_interval).floor();
        self.elapsed -= whole * self.frame_interval;
        let mut steps = whole as u64;
        if self.elapsed >= self.frame_interval {
            self.elapsed -= self.frame_interval;
            steps = steps.saturating_add(1);
        }
        // Huge deltas lose the remainder to rounding
        if !(0.0..self.frame_interval).contains(&self.elapsed) {
            self.elapsed = 0.0;
        }

        self.advance(steps);
    }

    fn advance(&mut self, steps: u64) {
        let count = self.frames.len() as u64;
        let current = self.current_frame as u64;
        self.current_frame = if self.looping {
            ((current + steps % count) % count) as usize
        } else {
            current.saturating_add(steps).min(count - 1) as usize
        };
    }

    /// Push the current frame into `batch` at `position`
    pub fn draw(&self, batch: &mut SpriteBatch, position: Vec2) {
        if !self.visible {
            return;
        }
        batch.draw(
            DrawCommand::new(self.sprite.texture(), position)
                .source(self.current_frame_bounds())
                .origin(self.sprite.origin())
                .tint(self.tint)
                .rotation(self.rotation)
                .scale(self.scale)
                .flip(self.flip)
                .layer_depth(self.layer_depth),
        );
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_frame_bounds(&self) -> Rect {
        self.frames[self.current_frame]
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Size of one frame in pixels
    pub fn frame_size(&self) -> Vec2 {
        self.frame_size
    }

    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// Set the frame rate, keeping the frame interval in sync
    pub fn set_frames_per_second(&mut self, fps: f32) -> Result<(), AnimationError> {
        if !validate_rate(fps) {
            return Err(AnimationError::InvalidFrameRate(fps));
        }
        self.frames_per_second = fps;
        self.frame_interval = 1.0 / fps;
        Ok(())
    }

    pub fn frame_interval(&self) -> f32 {
        self.frame_interval
    }

    /// Set the frame interval, keeping the frame rate in sync
    pub fn set_frame_interval(&mut self, interval: f32) -> Result<(), AnimationError> {
        if !validate_rate(interval) {
            return Err(AnimationError::InvalidFrameInterval(interval));
        }
        self.frame_interval = interval;
        self.frames_per_second = 1.0 / interval;
        Ok(())
    }

    #[cfg(test)]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn name(&self) -> &str {
        self.sprite.name()
    }

    pub fn origin(&self) -> Vec2 {
        self.sprite.origin()
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.sprite.set_origin(origin);
    }
}
