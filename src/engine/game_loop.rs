/// Fixed-timestep frame clock
///
/// Simulation updates run at a fixed rate while drawing happens once per frame.
/// Frames longer than `MAX_STEPS_PER_FRAME` steps drop the surplus time.
use std::time::{Duration, Instant};

/// Target update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Maximum number of fixed updates per frame
const MAX_STEPS_PER_FRAME: u32 = 5;

/// How often the frame rate estimate is refreshed
const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

pub struct GameLoop {
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    frame_count: u64,
    update_count: u64,

    frames_since_report: u32,
    since_report: Duration,
    current_fps: f32,

    frame_delta: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            update_count: 0,
            frames_since_report: 0,
            since_report: Duration::ZERO,
            current_fps: 0.0,
            frame_delta: 0.0,
        }
    }

    /// Begin a new frame using the wall clock, returns the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Advance by an explicit frame duration, returns the number of fixed updates to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.frame_delta = frame_time.as_secs_f32();
        self.track_fps(frame_time);

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Drop whatever is left after hitting the cap
        if updates == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Frame took {:.1} ms, dropping {:.1} ms of simulation",
                frame_time.as_secs_f32() * 1000.0,
                self.accumulator.as_secs_f32() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    fn track_fps(&mut self, frame_time: Duration) {
        self.frames_since_report += 1;
        self.since_report += frame_time;
        if self.since_report >= FPS_REPORT_INTERVAL {
            self.current_fps = self.frames_since_report as f32 / self.since_report.as_secs_f32();
            self.frames_since_report = 0;
            self.since_report = Duration::ZERO;
        }
    }

    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Seconds since the previous frame
    pub fn frame_delta(&self) -> f32 {
        self.frame_delta
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed");
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(!game_loop.is_paused());
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_one_step_per_sixtieth() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
        assert_eq!(game_loop.advance(Duration::from_millis(8)), 0);
        assert_eq!(game_loop.advance(Duration::from_millis(9)), 1);
        assert_eq!(game_loop.update_count(), 2);
        assert_eq!(game_loop.frame_count(), 3);
    }

    #[test]
    fn test_long_frame_is_capped_and_surplus_dropped() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(Duration::from_millis(300)), MAX_STEPS_PER_FRAME);
        // The surplus was dropped, a short frame runs nothing
        assert_eq!(game_loop.advance(Duration::from_millis(1)), 0);
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert_eq!(game_loop.advance(Duration::from_millis(50)), 0);
        game_loop.resume();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
    }

    #[test]
    fn test_fps_estimate() {
        let mut game_loop = GameLoop::new();
        for _ in 0..60 {
            game_loop.advance(FIXED_TIMESTEP_DURATION);
        }
        assert!((game_loop.fps() - 60.0).abs() < 1.0);
        assert!((game_loop.frame_delta() - 1.0 / 60.0).abs() < 0.001);
    }
}
