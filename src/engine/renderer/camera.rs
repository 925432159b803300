// 2D camera with a y-down world

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Orthographic camera centred on `position`.
///
/// World coordinates are display pixels with +y pointing down the screen,
/// the same orientation the physics bodies use.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    viewport: Vec2,
}

impl Camera {
    pub fn new(position: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    /// Camera whose top-left corner sits on the world origin
    pub fn screen_space(viewport_width: f32, viewport_height: f32) -> Self {
        let viewport = Vec2::new(viewport_width, viewport_height);
        Self::new(viewport * 0.5, viewport.x, viewport.y)
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        let half = self.viewport * 0.5;
        // Bottom and top swapped so +y maps to the bottom of the screen
        Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y + half.y,
            self.position.y - half.y,
            -1.0,
            1.0,
        )
    }

}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}
