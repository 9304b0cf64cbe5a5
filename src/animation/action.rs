use std::sync::Arc;

use crate::animation::clip::{ClipData, LoopMode};

/// Clips no longer than `min_duration` cannot advance: a one-shot finishes
/// on its first update and a repeating clip holds its first frame.
#[must_use]
pub fn is_too_short(duration: f32, min_duration: f32) -> bool {
    duration <= min_duration
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Stopped,
    Playing,
    /// A one-shot instance that reached its end. Only `stop` rearms it.
    Finished,
}

/// Playback state of one clip inside a mixer.
#[derive(Debug, Clone)]
pub struct ClipInstance {
    clip: Arc<ClipData>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,

    state: InstanceState,
    configured: bool,
}

impl ClipInstance {
    #[must_use]
    pub fn new(clip: Arc<ClipData>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            state: InstanceState::Stopped,
            configured: false,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<ClipData> {
        &self.clip
    }

    #[must_use]
    pub fn state(&self) -> InstanceState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == InstanceState::Playing
    }

    /// `false` until loop mode and weight were copied from a registry entry.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn configure(&mut self, loop_mode: LoopMode, weight: f32) {
        self.loop_mode = loop_mode;
        self.weight = weight;
        self.configured = true;
    }

    /// Starts playback. A finished one-shot stays finished until stopped.
    pub fn play(&mut self) {
        if self.state == InstanceState::Stopped {
            self.state = InstanceState::Playing;
        }
    }

    /// Stops playback and rewinds to the first frame.
    pub fn stop(&mut self) {
        self.state = InstanceState::Stopped;
        self.time = 0.0;
    }

    pub fn restart(&mut self) {
        self.stop();
        self.play();
    }

    pub fn sync_time_with(&mut self, other: &ClipInstance) {
        self.time = other.time;
        self.time_scale = other.time_scale;
    }

    /// Advances time. See [`is_too_short`] for clips at or under `min_duration`.
    pub fn update(&mut self, dt: f32, min_duration: f32) {
        if self.state != InstanceState::Playing {
            return;
        }

        let duration = self.clip.duration;
        if is_too_short(duration, min_duration) {
            match self.loop_mode {
                LoopMode::Once => {
                    self.time = duration.max(0.0);
                    self.state = InstanceState::Finished;
                }
                LoopMode::Repeat => self.time = 0.0,
            }
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.state = InstanceState::Finished;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.state = InstanceState::Finished;
                }
            }
            LoopMode::Repeat => {
                self.time = self.time.rem_euclid(duration);
            }
        }
    }
}
