// Player-facing options and the shared state handed to screens

use crate::engine::assets::AssetManager;
use crate::engine::audio::AudioSystem;
use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Toggles exposed in the options menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub music_on: bool,
    pub sound_effects_on: bool,
    /// Only read when the window is created
    pub fullscreen: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            music_on: true,
            sound_effects_on: true,
            fullscreen: false,
        }
    }
}

/// A single toggle in [`GameSettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOption {
    Music,
    SoundEffects,
    Fullscreen,
}

impl GameOption {
    pub fn label(self) -> &'static str {
        match self {
            GameOption::Music => "Music",
            GameOption::SoundEffects => "Sound Effects",
            GameOption::Fullscreen => "Fullscreen",
        }
    }

    pub fn get(self, settings: &GameSettings) -> bool {
        match self {
            GameOption::Music => settings.music_on,
            GameOption::SoundEffects => settings.sound_effects_on,
            GameOption::Fullscreen => settings.fullscreen,
        }
    }

    /// Flip the option, returning the new value
    pub fn toggle(self, settings: &mut GameSettings) -> bool {
        let value = match self {
            GameOption::Music => &mut settings.music_on,
            GameOption::SoundEffects => &mut settings.sound_effects_on,
            GameOption::Fullscreen => &mut settings.fullscreen,
        };
        *value = !*value;
        *value
    }

    /// Whether a change only takes effect after a restart
    pub fn requires_restart(self) -> bool {
        self == GameOption::Fullscreen
    }

    /// Menu text such as `Music: on`
    pub fn text(self, settings: &GameSettings) -> String {
        format!("{}: {}", self.label(), if self.get(settings) { "on" } else { "off" })
    }
}

/// Everything a screen may read or change besides its own state
pub struct GameContext {
    pub settings: GameSettings,
    pub assets: AssetManager,
    pub audio: AudioSystem,
    /// Window size in pixels
    pub viewport: Vec2,
    rng: StdRng,
}

impl GameContext {
    pub fn new(settings: GameSettings, assets: AssetManager, audio: AudioSystem, viewport: Vec2) -> Self {
        let mut context = Self {
            settings,
            assets,
            audio,
            viewport,
            rng: StdRng::from_entropy(),
        };
        context.apply_audio_settings();
        context
    }

    /// Fix the seed handed out to particle emitters
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Push the mute flags to the audio system
    pub fn apply_audio_settings(&mut self) {
        self.audio
            .apply_settings(self.settings.music_on, self.settings.sound_effects_on);
    }

    /// Flip an option and apply it where it can take effect immediately
    pub fn toggle_option(&mut self, option: GameOption) -> bool {
        let value = option.toggle(&mut self.settings);
        info!("{} set to {}", option.label(), value);
        self.apply_audio_settings();
        value
    }

    /// Start a random music track if none is playing
    pub fn start_music(&mut self) {
        let assets = &self.assets;
        self.audio.start_music(|name| assets.sound_exists(name));
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> GameContext {
    use crate::engine::audio::{LogAudioSink, MusicPlaylist};

    GameContext::new(
        GameSettings::default(),
        AssetManager::new("unused"),
        AudioSystem::new(Box::new(LogAudioSink), MusicPlaylist::with_seed(Vec::new(), 0)),
        Vec2::new(1280.0, 720.0),
    )
    .with_seed(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_text_follows_setting() {
        let mut settings = GameSettings::default();
        assert_eq!(GameOption::Music.text(&settings), "Music: on");
        assert!(!GameOption::Music.toggle(&mut settings));
        assert_eq!(GameOption::Music.text(&settings), "Music: off");
        assert_eq!(GameOption::Fullscreen.text(&settings), "Fullscreen: off");
        assert_eq!(GameOption::SoundEffects.text(&settings), "Sound Effects: on");
    }

    #[test]
    fn test_only_fullscreen_needs_restart() {
        assert!(GameOption::Fullscreen.requires_restart());
        assert!(!GameOption::Music.requires_restart());
        assert!(!GameOption::SoundEffects.requires_restart());
    }

    #[test]
    fn test_toggle_mutes_audio() {
        let mut ctx = test_context();
        assert!(!ctx.toggle_option(GameOption::SoundEffects));
        assert!(!ctx.settings.sound_effects_on);
        assert!(ctx.toggle_option(GameOption::SoundEffects));
    }

    #[test]
    fn test_seeded_context_is_repeatable() {
        let mut a = test_context();
        let mut b = test_context();
        assert_eq!(a.next_seed(), b.next_seed());
    }
}
