// Title menu

use super::{options_menu, CampLevel, MenuEntry, MenuScreen};

pub const TITLE: &str = "Campfire Demo";

pub fn main_menu() -> MenuScreen {
    MenuScreen::new(TITLE)
        .with_entry(MenuEntry::separator("Game Levels"))
        .with_entry(MenuEntry::screen(CampLevel::TITLE, || Box::new(CampLevel::new())))
        .with_entry(MenuEntry::separator(""))
        .with_entry(MenuEntry::screen("Options", || Box::new(options_menu())))
        .with_entry(MenuEntry::global_exit("Exit"))
}
