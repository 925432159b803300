// Input manager - turns winit events into action state

use super::action::InputSource;
use super::config::InputConfig;
use super::state::InputState;
use glam::Vec2;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Routes keyboard and mouse events through the bindings into an [`InputState`]
pub struct InputManager {
    config: InputConfig,
    state: InputState,
}

impl InputManager {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            state: InputState::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            // Key repeats are not new presses
            if event.repeat {
                return;
            }
            self.process_source(InputSource::key(key_code), event.state);
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.process_source(InputSource::mouse(button), state);
    }

    /// Cursor moved to a window position in physical pixels
    pub fn process_cursor_moved(&mut self, position: Vec2) {
        self.state.set_cursor(Some(position));
    }

    pub fn process_cursor_left(&mut self) {
        self.state.set_cursor(None);
    }

    fn process_source(&mut self, source: InputSource, state: ElementState) {
        let Some(action) = self.config.get_action(source) else {
            return;
        };
        match state {
            ElementState::Pressed => self.state.press(action),
            ElementState::Released => self.state.release(action),
        }
    }

    /// Current frame state
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Call once per frame after the state has been consumed
    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }

    /// Release everything, e.g. on focus loss
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Action;

    #[test]
    fn test_mouse_click_maps_to_click() {
        let mut manager = InputManager::default();
        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(manager.state().just_pressed(Action::Click));

        manager.end_frame();
        manager.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(manager.state().just_released(Action::Click));
    }

    #[test]
    fn test_unbound_buttons_are_ignored() {
        let mut manager = InputManager::default();
        manager.process_mouse_button(MouseButton::Middle, ElementState::Pressed);
        assert!(!manager.state().is_pressed(Action::Click));
    }

    #[test]
    fn test_cursor_leaves_window() {
        let mut manager = InputManager::default();
        manager.process_cursor_moved(Vec2::new(3.0, 4.0));
        assert_eq!(manager.state().cursor(), Some(Vec2::new(3.0, 4.0)));
        manager.process_cursor_left();
        assert!(manager.state().cursor().is_none());
    }

    #[test]
    fn test_reset_releases_held_actions() {
        let mut manager = InputManager::default();
        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        manager.reset();
        assert!(!manager.state().is_pressed(Action::Click));
    }
}
