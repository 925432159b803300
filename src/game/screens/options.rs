// Options menu: audio toggles and fullscreen

use super::{MenuEntry, MenuScreen};
use crate::game::settings::GameOption;

pub fn options_menu() -> MenuScreen {
    MenuScreen::new("Options")
        .with_entry(MenuEntry::option(GameOption::Music))
        .with_entry(MenuEntry::option(GameOption::SoundEffects))
        .with_entry(MenuEntry::option(GameOption::Fullscreen))
        .with_entry(MenuEntry::screen_exit("Back"))
}
