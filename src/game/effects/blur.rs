// Pulsing blur: precomputed Gaussian kernels played back as a heartbeat

use crate::engine::renderer::{BlurFrame, BlurKernel};
use glam::Vec2;
use log::debug;

/// Taps per blur direction
pub const SAMPLE_COUNT: usize = crate::engine::renderer::blur::BLUR_SAMPLES;

/// Texture-coordinate distance between taps
const SAMPLE_STEP: f32 = 0.001;

/// Phase advance per beat frame
const BEAT_VELOCITY: f32 = 0.4;

/// Stand-in for a zero intensity, which would blank the image
const MIN_INTENSITY: f32 = 1e-6;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BlurError {
    #[error("A blur beat needs at least one frame")]
    NoBeatFrames,

    #[error("Blur intensity must be finite and non-negative, got {0}")]
    InvalidIntensity(f32),
}

/// Shape of one blur pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurConfig {
    /// Frames the pulse lasts
    pub beat_frames: usize,
    /// Frames of no blur between pulses
    pub wait_frames: usize,
    /// Peak Gaussian theta
    pub intensity: f32,
}

impl BlurConfig {
    /// Slow heartbeat used by the camp level
    pub const HEARTBEAT: Self = Self {
        beat_frames: 30,
        wait_frames: 300,
        intensity: 6.0,
    };
}

/// Normal density with standard deviation `theta`, evaluated at `n`
pub fn gaussian(n: f32, theta: f32) -> f32 {
    let n = n as f64;
    let theta = theta as f64;
    ((1.0 / (2.0 * std::f64::consts::PI * theta).sqrt()) * (-(n * n) / (2.0 * theta * theta)).exp())
        as f32
}

/// Symmetric kernel along `step`: tap 0 at the centre, then pairs at
/// `±step * (2i + 1.5)` so bilinear filtering averages two texels per tap.
/// Weights are normalised and then doubled.
pub fn kernel(theta: f32, step: Vec2, sample_count: usize) -> BlurKernel {
    let mut weights = vec![0.0; sample_count];
    let mut offsets = vec![Vec2::ZERO; sample_count];
    if sample_count == 0 {
        return BlurKernel { weights, offsets };
    }

    weights[0] = gaussian(0.0, theta);
    let mut total = weights[0];

    for i in 0..sample_count / 2 {
        let weight = gaussian((i + 1) as f32, theta);
        weights[i * 2 + 1] = weight;
        weights[i * 2 + 2] = weight;
        total += weight * 2.0;

        let delta = step * (i as f32 * 2.0 + 1.5);
        offsets[i * 2 + 1] = delta;
        offsets[i * 2 + 2] = -delta;
    }

    for weight in &mut weights {
        *weight = *weight / total * 2.0;
    }

    BlurKernel { weights, offsets }
}

/// Cycles through `beat_frames` blur strengths, then rests for `wait_frames`
pub struct VariableBlurEffect {
    frames: Vec<BlurFrame>,
    intensities: Vec<f32>,
    wait_frames: usize,
    count: usize,
    active: usize,
}

impl VariableBlurEffect {
    pub fn new(config: BlurConfig) -> Result<Self, BlurError> {
        if config.beat_frames == 0 {
            return Err(BlurError::NoBeatFrames);
        }
        if !config.intensity.is_finite() || config.intensity < 0.0 {
            return Err(BlurError::InvalidIntensity(config.intensity));
        }

        let half = (config.intensity / 2.0) as f64;
        let mut phase = MIN_INTENSITY;
        let mut frames = Vec::with_capacity(config.beat_frames);
        let mut intensities = Vec::with_capacity(config.beat_frames);

        for _ in 0..config.beat_frames {
            let mut theta = (-(phase as f64).cos() * half + half) as f32;
            if theta == 0.0 {
                theta = MIN_INTENSITY;
            }
            intensities.push(theta);
            frames.push(BlurFrame {
                horizontal: kernel(theta, Vec2::new(SAMPLE_STEP, 0.0), SAMPLE_COUNT),
                vertical: kernel(theta, Vec2::new(0.0, SAMPLE_STEP), SAMPLE_COUNT),
            });
            phase += BEAT_VELOCITY;
        }

        debug!(
            "Blur pulse: {} beat frames, {} wait frames, peak intensity {}",
            config.beat_frames, config.wait_frames, config.intensity
        );

        Ok(Self {
            frames,
            intensities,
            wait_frames: config.wait_frames,
            count: 0,
            active: 0,
        })
    }

    /// Advance one tick and return progress through the beat in `[0, 1)`;
    /// 0 while resting
    pub fn update(&mut self) -> f32 {
        let beat = self.frames.len();
        self.count = (self.count + 1) % (beat + self.wait_frames);
        self.active = if self.count >= beat { 0 } else { self.count };
        self.progress()
    }

    pub fn progress(&self) -> f32 {
        self.active as f32 / self.frames.len() as f32
    }

    /// Kernels for the current tick
    pub fn active_frame(&self) -> &BlurFrame {
        &self.frames[self.active]
    }

    #[cfg(test)]
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn beat_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn wait_frames(&self) -> usize {
        self.wait_frames
    }

    /// Gaussian theta of beat frame `index`
    pub fn intensity(&self, index: usize) -> Option<f32> {
        self.intensities.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_beat_frames_rejected() {
        let config = BlurConfig {
            beat_frames: 0,
            ..BlurConfig::HEARTBEAT
        };
        assert_eq!(VariableBlurEffect::new(config).err(), Some(BlurError::NoBeatFrames));

        let config = BlurConfig {
            intensity: f32::NAN,
            ..BlurConfig::HEARTBEAT
        };
        assert!(matches!(
            VariableBlurEffect::new(config),
            Err(BlurError::InvalidIntensity(_))
        ));
    }

    #[test]
    fn test_heartbeat_progress_cycle() {
        let mut blur = VariableBlurEffect::new(BlurConfig::HEARTBEAT).unwrap();

        for k in 1..30 {
            assert_relative_eq!(blur.update(), k as f32 / 30.0);
        }
        for _ in 0..300 {
            assert_eq!(blur.update(), 0.0);
            assert_eq!(blur.active_index(), 0);
        }
        for k in 0..30 {
            assert_relative_eq!(blur.update(), k as f32 / 30.0);
        }
    }

    #[test]
    fn test_intensity_follows_cosine_ramp() {
        let blur = VariableBlurEffect::new(BlurConfig::HEARTBEAT).unwrap();

        // First frame starts at (almost) no blur
        assert!(blur.intensity(0).unwrap() < 1e-5);
        assert!(blur.intensity(0).unwrap() > 0.0);

        let phase = 1e-6_f64 + 5.0 * 0.4;
        let expected = (1.0 - phase.cos()) * 3.0;
        assert_relative_eq!(blur.intensity(5).unwrap(), expected as f32, epsilon = 1e-4);

        for i in 0..30 {
            let theta = blur.intensity(i).unwrap();
            assert!((0.0..=6.0).contains(&theta));
        }
        assert!(blur.intensity(30).is_none());
    }

    #[test]
    fn test_kernel_weights_and_offsets() {
        let k = kernel(3.0, Vec2::new(0.001, 0.0), SAMPLE_COUNT);
        assert_eq!(k.weights.len(), 15);
        assert_eq!(k.offsets.len(), 15);

        let sum: f32 = k.weights.iter().sum();
        assert_relative_eq!(sum, 2.0, epsilon = 1e-5);

        assert_eq!(k.offsets[0], Vec2::ZERO);
        assert_relative_eq!(k.offsets[1].x, 0.0015, epsilon = 1e-7);
        assert_relative_eq!(k.offsets[2].x, -0.0015, epsilon = 1e-7);
        assert_relative_eq!(k.offsets[13].x, 0.0135, epsilon = 1e-7);
        for i in 0..7 {
            assert_eq!(k.weights[i * 2 + 1], k.weights[i * 2 + 2]);
            assert!(k.weights[i * 2 + 1] <= k.weights[0]);
        }
    }

    #[test]
    fn test_tiny_intensity_is_a_pass_through() {
        let k = kernel(MIN_INTENSITY, Vec2::new(0.0, 0.001), SAMPLE_COUNT);
        assert_relative_eq!(k.weights[0], 2.0, epsilon = 1e-6);
        assert!(k.weights[1..].iter().all(|w| *w == 0.0));
    }

    #[test]
    fn test_active_frame_tracks_update() {
        let mut blur = VariableBlurEffect::new(BlurConfig {
            beat_frames: 4,
            wait_frames: 2,
            intensity: 6.0,
        })
        .unwrap();

        blur.update();
        blur.update();
        assert_eq!(blur.active_index(), 2);
        let vertical = &blur.active_frame().vertical;
        assert_eq!(vertical.offsets[1].x, 0.0);
        assert_relative_eq!(vertical.offsets[1].y, 0.0015, epsilon = 1e-7);
    }
}
