// Stack of screens with fade transitions and input routing

use super::{MessageBoxScreen, Screen, ScreenCommand, ScreenState, Transition};
use crate::engine::input::InputState;
use crate::engine::renderer::{Alignment, Frame};
use crate::game::settings::GameContext;
use log::{debug, error, info};

struct ScreenEntry {
    screen: Box<dyn Screen>,
    state: ScreenState,
    position: f32,
    exiting: bool,
}

impl ScreenEntry {
    fn transition(&self) -> Transition {
        Transition {
            state: self.state,
            position: self.position,
        }
    }

    fn is_active(&self) -> bool {
        !self.exiting && matches!(self.state, ScreenState::TransitionOn | ScreenState::Active)
    }

    /// Move the fade towards fully on or fully off
    fn update_transition(&mut self, dt: f32, covered: bool) {
        if self.exiting || covered {
            let time = self.screen.transition_off_time();
            self.state = if self.step(dt, time, 1.0) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            let time = self.screen.transition_on_time();
            self.state = if self.step(dt, time, -1.0) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }
    }

    /// Returns true while the fade is still in progress
    fn step(&mut self, dt: f32, time: f32, direction: f32) -> bool {
        let delta = if time <= 0.0 { 1.0 } else { dt / time };
        self.position += delta * direction;
        if (direction < 0.0 && self.position <= 0.0) || (direction > 0.0 && self.position >= 1.0) {
            self.position = self.position.clamp(0.0, 1.0);
            return false;
        }
        true
    }
}

/// Owns the screens from bottom to top
///
/// Only the topmost active screen gets input. A screen that is not a popup
/// covers every screen below it, which then fades off. Exiting screens fade
/// off before they are unloaded and removed, and the game quits once the
/// stack is empty.
#[derive(Default)]
pub struct ScreenManager {
    screens: Vec<ScreenEntry>,
    quit: bool,
}

impl ScreenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a screen and push it. A screen that fails to load is replaced
    /// by a message box with the error.
    pub fn add_screen(&mut self, mut screen: Box<dyn Screen>, ctx: &mut GameContext) {
        if let Err(err) = screen.load(ctx) {
            error!("Failed to load screen {}: {:#}", screen.name(), err);
            screen.unload(ctx);
            screen = Box::new(MessageBoxScreen::new(
                format!("Could not open {}:\n{:#}", screen.name(), err),
                Alignment::Center,
            ));
        }

        info!("Screen added: {}", screen.name());
        self.screens.push(ScreenEntry {
            screen,
            state: ScreenState::TransitionOn,
            position: 1.0,
            exiting: false,
        });
    }

    /// Route input to the topmost active screen
    pub fn handle_input(&mut self, input: &InputState, ctx: &mut GameContext) {
        let Some(index) = self.screens.iter().rposition(ScreenEntry::is_active) else {
            return;
        };
        let command = self.screens[index].screen.handle_input(input, ctx);
        if let Some(command) = command {
            self.apply(index, command, ctx);
        }
    }

    /// Advance transitions and tick every screen, topmost first
    pub fn update(&mut self, dt: f32, ctx: &mut GameContext) {
        let mut covered = false;
        let mut commands = Vec::new();

        for index in (0..self.screens.len()).rev() {
            let entry = &mut self.screens[index];
            entry.update_transition(dt, covered);

            if let Some(command) = entry.screen.update(dt, ctx, covered) {
                commands.push((index, command));
            }

            if entry.is_active() && !entry.screen.is_popup() {
                covered = true;
            }
        }

        // Top-down, so removing a screen never shifts a pending index
        for (index, command) in commands {
            self.apply(index, command, ctx);
        }

        self.remove_finished(ctx);
    }

    /// Draw every visible screen from the bottom up
    pub fn draw(&self, frame: &mut Frame, ctx: &GameContext) {
        for entry in &self.screens {
            if entry.state != ScreenState::Hidden {
                entry.screen.draw(frame, ctx, entry.transition());
            }
        }
    }

    fn apply(&mut self, index: usize, command: ScreenCommand, ctx: &mut GameContext) {
        debug!("Screen command {:?}", command);
        match command {
            ScreenCommand::Push(screen) => self.add_screen(screen, ctx),
            ScreenCommand::ExitSelf => self.exit_screen(index, ctx),
            ScreenCommand::ExitGame => {
                info!("Exit requested");
                self.quit = true;
            }
        }
    }

    fn exit_screen(&mut self, index: usize, ctx: &mut GameContext) {
        let Some(entry) = self.screens.get_mut(index) else {
            return;
        };
        if entry.screen.transition_off_time() <= 0.0 {
            let mut entry = self.screens.remove(index);
            Self::unload(&mut entry, ctx);
            self.check_empty();
        } else {
            entry.exiting = true;
        }
    }

    fn remove_finished(&mut self, ctx: &mut GameContext) {
        let mut index = 0;
        while index < self.screens.len() {
            let entry = &self.screens[index];
            if entry.exiting && entry.state == ScreenState::Hidden {
                let mut entry = self.screens.remove(index);
                Self::unload(&mut entry, ctx);
            } else {
                index += 1;
            }
        }
        self.check_empty();
    }

    fn unload(entry: &mut ScreenEntry, ctx: &mut GameContext) {
        entry.screen.unload(ctx);
        info!("Screen removed: {}", entry.screen.name());
    }

    fn check_empty(&mut self) {
        if self.screens.is_empty() && !self.quit {
            info!("No screens left, quitting");
            self.quit = true;
        }
    }

    /// Unload everything, topmost first
    pub fn clear(&mut self, ctx: &mut GameContext) {
        while let Some(mut entry) = self.screens.pop() {
            Self::unload(&mut entry, ctx);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    /// Screen names from bottom to top
    pub fn names(&self) -> Vec<&str> {
        self.screens.iter().map(|entry| entry.screen.name()).collect()
    }

    #[cfg(test)]
    pub fn states(&self) -> Vec<ScreenState> {
        self.screens.iter().map(|entry| entry.state).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Action;
    use crate::game::settings::test_context;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records calls and replies to Select/Cancel/MoveUp with fixed commands
    struct Probe {
        name: String,
        log: Log,
        popup: bool,
        fail_load: bool,
    }

    impl Probe {
        fn new(name: &str, log: &Log) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                log: log.clone(),
                popup: false,
                fail_load: false,
            })
        }

        fn popup(name: &str, log: &Log) -> Box<Self> {
            let mut probe = Self::new(name, log);
            probe.popup = true;
            probe
        }
    }

    impl Screen for Probe {
        fn name(&self) -> &str {
            &self.name
        }

        fn load(&mut self, _ctx: &mut GameContext) -> anyhow::Result<()> {
            self.log.borrow_mut().push(format!("load {}", self.name));
            if self.fail_load {
                anyhow::bail!("missing level data");
            }
            Ok(())
        }

        fn unload(&mut self, _ctx: &mut GameContext) {
            self.log.borrow_mut().push(format!("unload {}", self.name));
        }

        fn handle_input(&mut self, input: &InputState, _ctx: &mut GameContext) -> Option<ScreenCommand> {
            self.log.borrow_mut().push(format!("input {}", self.name));
            if input.just_pressed(Action::Cancel) {
                Some(ScreenCommand::ExitSelf)
            } else if input.just_pressed(Action::Select) {
                Some(ScreenCommand::Push(Probe::popup("popup", &self.log)))
            } else if input.just_pressed(Action::MoveUp) {
                Some(ScreenCommand::ExitGame)
            } else {
                None
            }
        }

        fn draw(&self, _frame: &mut Frame, _ctx: &GameContext, _transition: Transition) {
            self.log.borrow_mut().push(format!("draw {}", self.name));
        }

        fn is_popup(&self) -> bool {
            self.popup
        }
    }

    fn pressed(action: Action) -> InputState {
        let mut input = InputState::new();
        input.press(action);
        input
    }

    fn settle(manager: &mut ScreenManager, ctx: &mut GameContext) {
        for _ in 0..60 {
            manager.update(1.0 / 60.0, ctx);
        }
    }

    #[test]
    fn test_screen_transitions_on() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("menu", &log), &mut ctx);

        assert_eq!(manager.states(), vec![ScreenState::TransitionOn]);
        manager.update(0.25, &mut ctx);
        assert_eq!(manager.states(), vec![ScreenState::TransitionOn]);
        manager.update(0.3, &mut ctx);
        assert_eq!(manager.states(), vec![ScreenState::Active]);
    }

    #[test]
    fn test_input_goes_to_topmost_active_screen() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("menu", &log), &mut ctx);
        manager.add_screen(Probe::new("level", &log), &mut ctx);
        settle(&mut manager, &mut ctx);

        log.borrow_mut().clear();
        manager.handle_input(&InputState::new(), &mut ctx);
        assert_eq!(*log.borrow(), vec!["input level"]);

        // The covered menu has faded off and is not drawn
        assert_eq!(manager.states(), vec![ScreenState::Hidden, ScreenState::Active]);
        log.borrow_mut().clear();
        manager.draw(&mut Frame::new(Vec2::new(640.0, 480.0)), &ctx);
        assert_eq!(*log.borrow(), vec!["draw level"]);
    }

    #[test]
    fn test_popup_keeps_screen_below_visible() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("level", &log), &mut ctx);
        settle(&mut manager, &mut ctx);

        manager.handle_input(&pressed(Action::Select), &mut ctx);
        settle(&mut manager, &mut ctx);
        assert_eq!(manager.names(), vec!["level", "popup"]);
        assert_eq!(manager.states(), vec![ScreenState::Active, ScreenState::Active]);

        log.borrow_mut().clear();
        manager.handle_input(&InputState::new(), &mut ctx);
        assert_eq!(*log.borrow(), vec!["input popup"]);
    }

    #[test]
    fn test_exit_fades_then_unloads() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("menu", &log), &mut ctx);
        manager.add_screen(Probe::new("level", &log), &mut ctx);
        settle(&mut manager, &mut ctx);

        manager.handle_input(&pressed(Action::Cancel), &mut ctx);
        assert_eq!(manager.len(), 2);

        // Exiting screens no longer cover or take input
        manager.update(1.0 / 60.0, &mut ctx);
        assert_eq!(manager.states()[1], ScreenState::TransitionOff);
        log.borrow_mut().clear();
        manager.handle_input(&InputState::new(), &mut ctx);
        assert_eq!(*log.borrow(), vec!["input menu"]);

        settle(&mut manager, &mut ctx);
        assert_eq!(manager.names(), vec!["menu"]);
        assert!(log.borrow().contains(&"unload level".to_string()));
        assert_eq!(manager.states(), vec![ScreenState::Active]);
        assert!(!manager.should_quit());
    }

    #[test]
    fn test_empty_stack_quits() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("menu", &log), &mut ctx);
        settle(&mut manager, &mut ctx);

        manager.handle_input(&pressed(Action::Cancel), &mut ctx);
        settle(&mut manager, &mut ctx);
        assert!(manager.is_empty());
        assert!(manager.should_quit());
    }

    #[test]
    fn test_exit_game_command() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        manager.add_screen(Probe::new("menu", &log), &mut ctx);
        manager.handle_input(&pressed(Action::MoveUp), &mut ctx);
        assert!(manager.should_quit());

        manager.clear(&mut ctx);
        assert!(log.borrow().contains(&"unload menu".to_string()));
    }

    #[test]
    fn test_failed_load_shows_message_box() {
        let log = Log::default();
        let mut ctx = test_context();
        let mut manager = ScreenManager::new();
        let mut broken = Probe::new("level", &log);
        broken.fail_load = true;

        manager.add_screen(broken, &mut ctx);
        assert_eq!(manager.names(), vec!["message box"]);
        assert!(log.borrow().contains(&"unload level".to_string()));
    }
}
