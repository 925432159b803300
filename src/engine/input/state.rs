// Per-frame input state

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Action state for the current frame plus the mouse cursor
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Actions currently held
    pressed: HashSet<Action>,

    /// Actions pressed since the last frame
    just_pressed: HashSet<Action>,

    /// Actions released since the last frame
    just_released: HashSet<Action>,

    /// Cursor position in window pixels, if inside the window
    cursor: Option<Vec2>,

    /// Cursor moved since the last frame
    cursor_moved: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    /// Register an action press
    pub(crate) fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub(crate) fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    pub(crate) fn set_cursor(&mut self, position: Option<Vec2>) {
        if self.cursor != position {
            self.cursor_moved = true;
        }
        self.cursor = position;
    }

    /// Start a new frame. Call once per frame after the state has been consumed.
    pub(crate) fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.cursor_moved = false;
    }

    /// Release everything, e.g. when the window loses focus
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.cursor_moved = false;
    }
}
