use crate::config::GameConfig;

/// Anything the host loop advances once per frame.
pub trait Tickable {
    fn tick(&mut self, dt: f32);
}

/// Host-loop frame policy shared by every game object.
///
/// Frames longer than `max_frame_delta` (a stalled tab, a debugger break)
/// are dropped instead of being fed into movement and animation.
#[derive(Debug, Clone)]
pub struct FrameTicker {
    max_frame_delta: f32,
    paused: bool,
    elapsed: f32,
    frames: u64,
}

impl FrameTicker {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            max_frame_delta: config.max_frame_delta,
            paused: false,
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total simulated time, skipped frames excluded.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Ticks `objects` in order. Returns `false` if the frame was skipped.
    pub fn run(&mut self, dt: f32, objects: &mut [&mut dyn Tickable]) -> bool {
        if self.paused || dt < 0.0 || dt >= self.max_frame_delta {
            return false;
        }
        for object in objects.iter_mut() {
            object.tick(dt);
        }
        self.elapsed += dt;
        self.frames += 1;
        true
    }
}
