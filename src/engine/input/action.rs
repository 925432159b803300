// Game action definitions and mappings

use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Every action the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement, also used for menu navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    /// Character action (attack) variant of the walk animations
    CharacterAction,

    // Menus
    Select,
    Cancel,
    Click,
}

/// An input source (keyboard key or mouse button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
}

impl InputSource {
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }
}

/// Default keyboard/mouse bindings
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        // Movement (WASD and arrows)
        (InputSource::key(KeyCode::KeyW), Action::MoveUp),
        (InputSource::key(KeyCode::KeyS), Action::MoveDown),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::MoveUp),
        (InputSource::key(KeyCode::ArrowDown), Action::MoveDown),
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::ControlLeft), Action::CharacterAction),
        // Menus
        (InputSource::key(KeyCode::Enter), Action::Select),
        (InputSource::key(KeyCode::Space), Action::Select),
        (InputSource::key(KeyCode::Escape), Action::Cancel),
        (InputSource::key(KeyCode::Backspace), Action::Cancel),
        (InputSource::mouse(MouseButton::Left), Action::Click),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_creation() {
        assert_eq!(
            InputSource::key(KeyCode::KeyA),
            InputSource::Keyboard(KeyCode::KeyA)
        );
        assert_eq!(
            InputSource::mouse(MouseButton::Left),
            InputSource::Mouse(MouseButton::Left)
        );
    }

    #[test]
    fn test_every_action_has_a_default_binding() {
        let bindings = default_bindings();
        for action in [
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::CharacterAction,
            Action::Select,
            Action::Cancel,
            Action::Click,
        ] {
            assert!(
                bindings.iter().any(|(_, a)| *a == action),
                "{:?} is unbound",
                action
            );
        }
    }

    #[test]
    fn test_no_duplicate_sources() {
        let mut seen = std::collections::HashSet::new();
        for (source, _) in default_bindings() {
            assert!(seen.insert(source), "Duplicate input source {:?}", source);
        }
    }
}
