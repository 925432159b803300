// Per-frame draw data handed from the screens to the renderer

use super::batch::SpriteBatch;
use super::blur::BlurFrame;
use super::overlay::Overlay;
use glam::{Vec2, Vec4};

/// Everything drawn in one frame.
///
/// `scene` is rendered in world space through the camera, post-processed by
/// `blur` when present, and `overlay` is painted on top in screen pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    pub clear_color: Vec4,
    /// World point at the centre of the screen. `None` maps world to screen pixels.
    pub camera_focus: Option<Vec2>,
    pub scene: SpriteBatch,
    pub blur: Option<BlurFrame>,
    pub overlay: Overlay,
    viewport: Vec2,
}

impl Frame {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            clear_color: Vec4::new(0.05, 0.05, 0.08, 1.0),
            camera_focus: None,
            scene: SpriteBatch::new(),
            blur: None,
            overlay: Overlay::new(),
            viewport,
        }
    }

    /// Screen size in pixels
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}
