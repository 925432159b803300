// Vertical text menus driven by keyboard and mouse

use super::{MessageBoxScreen, Screen, ScreenCommand, ScreenState, Transition};
use crate::core::Rect;
use crate::engine::input::{Action, InputState};
use crate::engine::renderer::{Alignment, Frame, OverlayCommand, TextAnchor};
use crate::game::settings::{GameContext, GameOption, GameSettings};
use glam::{Vec2, Vec4};
use log::debug;

pub const TITLE_SIZE: f32 = 64.0;
pub const ENTRY_SIZE: f32 = 48.0;
/// Vertical distance between entry centres
pub const ENTRY_SPACING: f32 = 52.0;
/// Fade speed of the selection highlight, per second
pub const FADE_SPEED: f32 = 4.0;
/// Approximate glyph advance as a share of the text size
const GLYPH_WIDTH: f32 = 0.55;
const SLIDE_DISTANCE: f32 = 256.0;

pub const RESTART_MESSAGE: &str =
    "Changing this option requires you to restart the game for it to take effect.";

const TITLE_COLOR: Vec4 = Vec4::new(0.75, 0.75, 0.75, 1.0);
const SEPARATOR_COLOR: Vec4 = Vec4::new(0.545, 0.0, 0.0, 1.0);
const ENTRY_COLOR: Vec4 = Vec4::ONE;
const SELECTED_COLOR: Vec4 = Vec4::new(0.678, 0.847, 0.902, 1.0);
const SHADOW_COLOR: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.6);

/// What selecting an entry does
pub enum EntryKind {
    /// Open a new screen on top of this menu
    Screen(Box<dyn Fn() -> Box<dyn Screen>>),
    /// A heading; cannot be selected
    Separator,
    /// Flip a setting
    OptionsItem(GameOption),
    /// Close this menu
    ScreenExitItem,
    /// Quit the game
    GlobalExitItem,
}

pub struct MenuEntry {
    text: String,
    kind: EntryKind,
    fade: f32,
}

impl MenuEntry {
    fn new(text: &str, kind: EntryKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
            fade: 0.0,
        }
    }

    pub fn screen(text: &str, open: impl Fn() -> Box<dyn Screen> + 'static) -> Self {
        Self::new(text, EntryKind::Screen(Box::new(open)))
    }

    pub fn separator(text: &str) -> Self {
        Self::new(text, EntryKind::Separator)
    }

    pub fn option(option: GameOption) -> Self {
        Self::new(option.label(), EntryKind::OptionsItem(option))
    }

    pub fn screen_exit(text: &str) -> Self {
        Self::new(text, EntryKind::ScreenExitItem)
    }

    pub fn global_exit(text: &str) -> Self {
        Self::new(text, EntryKind::GlobalExitItem)
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self.kind, EntryKind::Separator)
    }

    /// Displayed text. Option entries show their current value.
    pub fn text(&self, settings: &GameSettings) -> String {
        match self.kind {
            EntryKind::OptionsItem(option) => option.text(settings),
            _ => self.text.clone(),
        }
    }

    /// Selection highlight, 0.0 to 1.0
    pub fn fade(&self) -> f32 {
        self.fade
    }

    pub fn scale(&self) -> f32 {
        0.7 + 0.1 * self.fade
    }

    fn update(&mut self, selected: bool, dt: f32) {
        let delta = dt * FADE_SPEED;
        self.fade = if selected {
            (self.fade + delta).min(1.0)
        } else {
            (self.fade - delta).max(0.0)
        };
    }

    fn color(&self) -> Vec4 {
        match self.kind {
            EntryKind::Separator => SEPARATOR_COLOR,
            _ => ENTRY_COLOR.lerp(SELECTED_COLOR, self.fade),
        }
    }
}

/// A titled list of entries with one selected
pub struct MenuScreen {
    title: String,
    entries: Vec<MenuEntry>,
    selected: usize,
}

impl MenuScreen {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
            selected: 0,
        }
    }

    pub fn with_entry(mut self, entry: MenuEntry) -> Self {
        self.add_entry(entry);
        self
    }

    /// Append an entry. The first selectable entry starts selected.
    pub fn add_entry(&mut self, entry: MenuEntry) {
        self.entries.push(entry);
        if !self.entries[self.selected].is_selectable() {
            if let Some(first) = self.entries.iter().position(MenuEntry::is_selectable) {
                self.selected = first;
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.step_selection(self.entries.len().saturating_sub(1));
    }

    /// Move by `step` (mod len), wrapping and skipping separators
    fn step_selection(&mut self, step: usize) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let mut index = self.selected;
        for _ in 0..len {
            index = (index + step) % len;
            if self.entries[index].is_selectable() {
                self.selected = index;
                return;
            }
        }
    }

    /// Screen rectangles of the entries at rest
    pub fn entry_rects(&self, viewport: Vec2, settings: &GameSettings) -> Vec<Rect> {
        let top = viewport.y * 0.5 - (self.entries.len() as f32 - 1.0) * ENTRY_SPACING * 0.5;
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let size = ENTRY_SIZE * entry.scale();
                let chars = entry.text(settings).chars().count() as f32;
                Rect::from_center(
                    Vec2::new(viewport.x * 0.5, top + i as f32 * ENTRY_SPACING),
                    Vec2::new(chars * size * GLYPH_WIDTH, size),
                )
            })
            .collect()
    }

    /// Selectable entry under `point`
    pub fn entry_at(&self, point: Vec2, viewport: Vec2, settings: &GameSettings) -> Option<usize> {
        self.entry_rects(viewport, settings)
            .iter()
            .position(|rect| rect.contains(point))
            .filter(|&index| self.entries[index].is_selectable())
    }

    /// Run the entry's action
    pub fn activate(&mut self, index: usize, ctx: &mut GameContext) -> Option<ScreenCommand> {
        let entry = self.entries.get(index)?;
        debug!("Menu {}: selected {}", self.title, entry.text(&ctx.settings));
        match &entry.kind {
            EntryKind::Screen(open) => Some(ScreenCommand::Push(open())),
            EntryKind::Separator => None,
            EntryKind::OptionsItem(option) => {
                ctx.toggle_option(*option);
                option.requires_restart().then(|| {
                    ScreenCommand::Push(Box::new(MessageBoxScreen::new(RESTART_MESSAGE, Alignment::Center)))
                })
            }
            EntryKind::ScreenExitItem => Some(ScreenCommand::ExitSelf),
            EntryKind::GlobalExitItem => Some(ScreenCommand::ExitGame),
        }
    }
}

impl Screen for MenuScreen {
    fn name(&self) -> &str {
        &self.title
    }

    fn handle_input(&mut self, input: &InputState, ctx: &mut GameContext) -> Option<ScreenCommand> {
        if input.just_pressed(Action::MoveUp) {
            self.select_previous();
        }
        if input.just_pressed(Action::MoveDown) {
            self.select_next();
        }

        let hovered = input
            .cursor()
            .and_then(|cursor| self.entry_at(cursor, ctx.viewport, &ctx.settings));
        if input.cursor_moved() {
            if let Some(index) = hovered {
                self.selected = index;
            }
        }

        if input.just_pressed(Action::Click) {
            if let Some(index) = hovered {
                self.selected = index;
                return self.activate(index, ctx);
            }
        }
        if input.just_pressed(Action::Select) {
            return self.activate(self.selected, ctx);
        }
        if input.just_pressed(Action::Cancel) {
            return Some(ScreenCommand::ExitSelf);
        }
        None
    }

    fn update(&mut self, dt: f32, _ctx: &mut GameContext, _covered: bool) -> Option<ScreenCommand> {
        let selected = self.selected;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.update(index == selected, dt);
        }
        None
    }

    fn draw(&self, frame: &mut Frame, ctx: &GameContext, transition: Transition) {
        let viewport = frame.viewport();
        let alpha = transition.alpha();
        let offset = transition.position * transition.position;
        let slide = if transition.state == ScreenState::TransitionOn {
            -offset * SLIDE_DISTANCE
        } else {
            offset * SLIDE_DISTANCE * 2.0
        };

        frame.overlay.push(OverlayCommand::Text {
            text: self.title.clone(),
            position: Vec2::new(viewport.x * 0.5, viewport.y * 0.15 - offset * 100.0),
            anchor: TextAnchor::Center,
            size: TITLE_SIZE,
            color: TITLE_COLOR * Vec4::new(1.0, 1.0, 1.0, alpha),
            shadow: Some(SHADOW_COLOR * alpha),
        });

        let rects = self.entry_rects(viewport, &ctx.settings);
        for (entry, rect) in self.entries.iter().zip(rects) {
            frame.overlay.push(OverlayCommand::Text {
                text: entry.text(&ctx.settings),
                position: rect.center() + Vec2::new(slide, 0.0),
                anchor: TextAnchor::Center,
                size: ENTRY_SIZE * entry.scale(),
                color: entry.color() * Vec4::new(1.0, 1.0, 1.0, alpha),
                shadow: Some(SHADOW_COLOR * alpha),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::settings::test_context;
    use approx::assert_relative_eq;

    fn sample_menu() -> MenuScreen {
        MenuScreen::new("Test")
            .with_entry(MenuEntry::separator("Levels"))
            .with_entry(MenuEntry::screen("Open", || Box::new(MenuScreen::new("Child"))))
            .with_entry(MenuEntry::separator(""))
            .with_entry(MenuEntry::option(GameOption::Music))
            .with_entry(MenuEntry::global_exit("Exit"))
    }

    fn pressed(action: Action) -> InputState {
        let mut input = InputState::new();
        input.press(action);
        input
    }

    #[test]
    fn test_first_selectable_entry_starts_selected() {
        assert_eq!(sample_menu().selected(), 1);
    }

    #[test]
    fn test_navigation_skips_separators_and_wraps() {
        let mut menu = sample_menu();
        menu.select_next();
        assert_eq!(menu.selected(), 3);
        menu.select_next();
        assert_eq!(menu.selected(), 4);
        menu.select_next();
        assert_eq!(menu.selected(), 1);
        menu.select_previous();
        assert_eq!(menu.selected(), 4);
        menu.select_previous();
        assert_eq!(menu.selected(), 3);
        menu.select_previous();
        assert_eq!(menu.selected(), 1);
    }

    #[test]
    fn test_option_entry_toggles_and_refreshes_text() {
        let mut ctx = test_context();
        let mut menu = sample_menu();
        assert_eq!(menu.entries()[3].text(&ctx.settings), "Music: on");

        assert!(menu.activate(3, &mut ctx).is_none());
        assert!(!ctx.settings.music_on);
        assert_eq!(menu.entries()[3].text(&ctx.settings), "Music: off");
    }

    #[test]
    fn test_restart_option_pushes_message_box() {
        let mut ctx = test_context();
        let mut menu = MenuScreen::new("Options").with_entry(MenuEntry::option(GameOption::Fullscreen));

        match menu.activate(0, &mut ctx) {
            Some(ScreenCommand::Push(screen)) => {
                assert_eq!(screen.name(), "message box");
                assert!(screen.is_popup());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(ctx.settings.fullscreen);
    }

    #[test]
    fn test_select_and_cancel() {
        let mut ctx = test_context();
        let mut menu = sample_menu();

        match menu.handle_input(&pressed(Action::Select), &mut ctx) {
            Some(ScreenCommand::Push(screen)) => assert_eq!(screen.name(), "Child"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            menu.handle_input(&pressed(Action::Cancel), &mut ctx),
            Some(ScreenCommand::ExitSelf)
        ));

        menu.handle_input(&pressed(Action::MoveUp), &mut ctx);
        assert!(matches!(
            menu.handle_input(&pressed(Action::Select), &mut ctx),
            Some(ScreenCommand::ExitGame)
        ));
    }

    #[test]
    fn test_mouse_hover_and_click() {
        let mut ctx = test_context();
        let mut menu = sample_menu();
        let rects = menu.entry_rects(ctx.viewport, &ctx.settings);

        // Hovering the separator changes nothing
        let mut input = InputState::new();
        input.set_cursor(Some(rects[2].center()));
        assert!(menu.handle_input(&input, &mut ctx).is_none());
        assert_eq!(menu.selected(), 1);

        let mut input = InputState::new();
        input.set_cursor(Some(rects[4].center()));
        assert!(menu.handle_input(&input, &mut ctx).is_none());
        assert_eq!(menu.selected(), 4);

        input.press(Action::Click);
        assert!(matches!(
            menu.handle_input(&input, &mut ctx),
            Some(ScreenCommand::ExitGame)
        ));
    }

    #[test]
    fn test_selected_entry_fades_in() {
        let mut ctx = test_context();
        let mut menu = sample_menu();

        menu.update(0.125, &mut ctx, false);
        assert_relative_eq!(menu.entries()[1].fade(), 0.5);
        assert_relative_eq!(menu.entries()[1].scale(), 0.75);
        assert_eq!(menu.entries()[3].fade(), 0.0);

        menu.select_next();
        menu.update(0.125, &mut ctx, false);
        assert_relative_eq!(menu.entries()[1].fade(), 0.0);
        assert_relative_eq!(menu.entries()[3].fade(), 0.5);

        menu.update(1.0, &mut ctx, false);
        assert_relative_eq!(menu.entries()[3].fade(), 1.0);
    }

    #[test]
    fn test_draw_emits_title_and_entries() {
        let ctx = test_context();
        let menu = sample_menu();
        let mut frame = Frame::new(ctx.viewport);
        menu.draw(&mut frame, &ctx, Transition::ACTIVE);
        assert_eq!(frame.overlay.commands().len(), 1 + menu.entries().len());
    }
}
