// Popup that shows a message until it is dismissed

use super::{Screen, ScreenCommand, Transition};
use crate::core::Rect;
use crate::engine::input::{Action, InputState};
use crate::engine::renderer::{Alignment, Frame, OverlayCommand};
use crate::game::settings::GameContext;
use glam::{Vec2, Vec4};

pub const PADDING: Vec2 = Vec2::new(32.0, 16.0);
pub const TRANSITION_TIME: f32 = 0.4;
pub const TEXT_SIZE: f32 = 24.0;

const BACKGROUND: Vec4 = Vec4::new(0.1, 0.1, 0.15, 0.9);

pub struct MessageBoxScreen {
    message: String,
    alignment: Alignment,
    padding: Vec2,
}

impl MessageBoxScreen {
    pub fn new(message: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            message: message.into(),
            alignment,
            padding: PADDING,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }
}

impl Screen for MessageBoxScreen {
    fn name(&self) -> &str {
        "message box"
    }

    fn handle_input(&mut self, input: &InputState, _ctx: &mut GameContext) -> Option<ScreenCommand> {
        [Action::Select, Action::Cancel, Action::Click]
            .into_iter()
            .any(|action| input.just_pressed(action))
            .then_some(ScreenCommand::ExitSelf)
    }

    fn draw(&self, frame: &mut Frame, _ctx: &GameContext, transition: Transition) {
        let alpha = transition.alpha();
        let viewport = frame.viewport();

        // Darken whatever is underneath
        frame.overlay.fill(
            Rect::new(0.0, 0.0, viewport.x, viewport.y),
            Vec4::new(0.0, 0.0, 0.0, alpha * 2.0 / 3.0),
        );
        frame.overlay.push(OverlayCommand::Panel {
            text: self.message.clone(),
            alignment: self.alignment,
            padding: self.padding,
            size: TEXT_SIZE,
            text_color: Vec4::new(1.0, 1.0, 1.0, alpha),
            background: BACKGROUND * Vec4::new(1.0, 1.0, 1.0, alpha),
        });
    }

    fn is_popup(&self) -> bool {
        true
    }

    fn transition_on_time(&self) -> f32 {
        TRANSITION_TIME
    }

    fn transition_off_time(&self) -> f32 {
        TRANSITION_TIME
    }
}
