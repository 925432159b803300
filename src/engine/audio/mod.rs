// Audio routing
//
// Sound playback itself is left to an `AudioSink`. This module decides what
// gets played: mute flags, effect parameters and music track selection.

mod music;
mod sink;

pub use music::MusicPlaylist;
pub use sink::LogAudioSink;
use sink::{AudioSink, EffectParams};

use log::debug;

/// Front-end that gates sounds on the current mute settings
pub struct AudioSystem {
    sink: Box<dyn AudioSink>,
    playlist: MusicPlaylist,
    effect_params: EffectParams,
    music_enabled: bool,
    effects_enabled: bool,
    current_track: Option<String>,
}

impl AudioSystem {
    pub fn new(sink: Box<dyn AudioSink>, playlist: MusicPlaylist) -> Self {
        Self {
            sink,
            playlist,
            effect_params: EffectParams::default(),
            music_enabled: true,
            effects_enabled: true,
            current_track: None,
        }
    }

    /// Sync mute flags; toggling music off stops the current track
    pub fn apply_settings(&mut self, music_enabled: bool, effects_enabled: bool) {
        self.effects_enabled = effects_enabled;
        if self.music_enabled != music_enabled {
            self.music_enabled = music_enabled;
            if !music_enabled {
                self.stop_music();
            }
        }
    }

    /// Play a named sound effect with the current effect parameters
    pub fn play_effect(&mut self, name: &str) {
        if !self.effects_enabled {
            debug!("Effect {} muted", name);
            return;
        }
        self.sink.play_effect(name, self.effect_params);
    }

    /// Start a random music track unless music is muted or already playing
    pub fn start_music(&mut self, exists: impl Fn(&str) -> bool) {
        if !self.music_enabled || self.current_track.is_some() {
            return;
        }
        if let Some(track) = self.playlist.pick(exists) {
            self.sink.play_music(&track);
            self.current_track = Some(track);
        }
    }

    pub fn stop_music(&mut self) {
        if self.current_track.take().is_some() {
            self.sink.stop_music();
        }
    }

    pub fn current_track(&self) -> Option<&str> {
        self.current_track.as_deref()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl AudioSink for Recorder {
        fn play_effect(&mut self, name: &str, _params: EffectParams) {
            self.0.lock().unwrap().push(format!("effect:{}", name));
        }
        fn play_music(&mut self, name: &str) {
            self.0.lock().unwrap().push(format!("music:{}", name));
        }
        fn stop_music(&mut self) {
            self.0.lock().unwrap().push("stop".to_string());
        }
    }

    fn system(recorder: &Recorder) -> AudioSystem {
        AudioSystem::new(
            Box::new(recorder.clone()),
            MusicPlaylist::with_seed(vec!["Music/Track1".to_string()], 7),
        )
    }

    #[test]
    fn test_muted_effects_are_dropped() {
        let recorder = Recorder::default();
        let mut audio = system(&recorder);

        audio.play_effect("heartbeat");
        audio.apply_settings(true, false);
        audio.play_effect("heartbeat");

        assert_eq!(*recorder.0.lock().unwrap(), vec!["effect:heartbeat"]);
    }

    #[test]
    fn test_music_toggle_stops_and_restarts() {
        let recorder = Recorder::default();
        let mut audio = system(&recorder);

        audio.start_music(|_| true);
        assert_eq!(audio.current_track(), Some("Music/Track1"));
        // Already playing
        audio.start_music(|_| true);

        audio.apply_settings(false, true);
        assert!(audio.current_track().is_none());
        audio.start_music(|_| true);
        assert!(audio.current_track().is_none());

        audio.apply_settings(true, true);
        audio.start_music(|_| true);

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["music:Music/Track1", "stop", "music:Music/Track1"]
        );
    }
}
