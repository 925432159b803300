// Screen stack: menus, popups and the playable level
//
// Screens never reach into the manager. They return a `ScreenCommand` from
// input and update calls and the manager applies it.

mod level;
mod main_menu;
mod manager;
mod menu;
mod message_box;
mod options;

pub use level::CampLevel;
pub use main_menu::main_menu;
pub use manager::ScreenManager;
pub use menu::{MenuEntry, MenuScreen};
pub use message_box::MessageBoxScreen;
pub use options::options_menu;

use crate::engine::input::InputState;
use crate::engine::renderer::Frame;
use crate::game::settings::GameContext;

/// Default fade time in seconds
pub const DEFAULT_TRANSITION_TIME: f32 = 0.5;

/// Request from a screen to the manager
pub enum ScreenCommand {
    /// Load a screen and put it on top of the stack
    Push(Box<dyn Screen>),
    /// Transition this screen off, then unload and remove it
    ExitSelf,
    /// Quit the application
    ExitGame,
}

impl std::fmt::Debug for ScreenCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenCommand::Push(screen) => write!(f, "Push({})", screen.name()),
            ScreenCommand::ExitSelf => write!(f, "ExitSelf"),
            ScreenCommand::ExitGame => write!(f, "ExitGame"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    TransitionOn,
    Active,
    TransitionOff,
    Hidden,
}

/// Where a screen is in its fade, handed to `draw`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: ScreenState,
    /// 0.0 fully on, 1.0 fully off
    pub position: f32,
}

impl Transition {
    pub const ACTIVE: Transition = Transition {
        state: ScreenState::Active,
        position: 0.0,
    };

    /// Opacity to draw with
    pub fn alpha(&self) -> f32 {
        1.0 - self.position
    }
}

pub trait Screen {
    fn name(&self) -> &str;

    /// Acquire textures, bodies and sounds. Called once before the first update.
    fn load(&mut self, _ctx: &mut GameContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Release whatever `load` acquired
    fn unload(&mut self, _ctx: &mut GameContext) {}

    /// Only called for the topmost screen that is transitioning on or active
    fn handle_input(&mut self, input: &InputState, ctx: &mut GameContext) -> Option<ScreenCommand>;

    /// Fixed-timestep tick. `covered` is true when a non-popup screen is above.
    fn update(&mut self, _dt: f32, _ctx: &mut GameContext, _covered: bool) -> Option<ScreenCommand> {
        None
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameContext, transition: Transition);

    /// Popups leave the screens below them visible and updating
    fn is_popup(&self) -> bool {
        false
    }

    fn transition_on_time(&self) -> f32 {
        DEFAULT_TRANSITION_TIME
    }

    fn transition_off_time(&self) -> f32 {
        DEFAULT_TRANSITION_TIME
    }
}
