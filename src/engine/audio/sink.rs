// Audio sinks

use log::{debug, info};

/// Playback parameters for sound effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectParams {
    /// 0.0 (silent) to 1.0 (full)
    pub volume: f32,
    /// -1.0 (octave down) to 1.0 (octave up)
    pub pitch: f32,
    /// -1.0 (left) to 1.0 (right)
    pub pan: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pitch: 0.0,
            pan: 0.0,
        }
    }
}

/// Something that can play sounds
pub trait AudioSink {
    fn play_effect(&mut self, name: &str, params: EffectParams);
    fn play_music(&mut self, name: &str);
    fn stop_music(&mut self);
}

/// Sink that only logs what would be played
#[derive(Debug, Default)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play_effect(&mut self, name: &str, params: EffectParams) {
        debug!(
            "Sound effect {} (volume {:.2}, pitch {:.2}, pan {:.2})",
            name, params.volume, params.pitch, params.pan
        );
    }

    fn play_music(&mut self, name: &str) {
        info!("Now playing {}", name);
    }

    fn stop_music(&mut self) {
        info!("Music stopped");
    }
}
