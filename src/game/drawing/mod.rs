// Sprites and frame-based sprite-sheet animation

mod animation;
mod sprite;

pub use animation::{AnimationError, AnimationState, FrameLayout, SpriteAnimation};
pub use sprite::Sprite;
