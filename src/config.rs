//! Game Configuration
//!
//! [`GameConfig`] is built once at startup (usually from the level's JSON
//! settings) and handed by reference to every subsystem constructor. Nothing
//! reads configuration through globals.
//!
//! ```rust,ignore
//! let config = GameConfig::from_json_str(&std::fs::read_to_string("game.json")?)?;
//! let mut player = Character::new("player", &config);
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::clip::SpliceLayout;
use crate::errors::{Result, StriderError};

/// Animation core tuning shared by every character rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub splice: SpliceLayout,
    /// One-shot clips shorter than this finish on their first update, so a
    /// zero-length clip cannot hold a fusion open forever.
    pub min_clip_duration: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            splice: SpliceLayout::default(),
            min_clip_duration: 1e-3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionSettings {
    /// Units per second while running forward.
    pub forward_speed: f32,
    /// Units per second while walking backwards.
    pub back_speed: f32,
    /// Distance at which a move target counts as reached.
    pub arrive_epsilon: f32,
    /// Largest angle between facing and movement that still counts as forward.
    pub back_angle_degrees: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            forward_speed: 10.0,
            back_speed: 5.0,
            arrive_epsilon: 0.01,
            back_angle_degrees: 90.0,
        }
    }
}

/// Names of the clips gameplay code triggers on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNames {
    pub idle: String,
    pub run: String,
    pub back: String,
    pub hit: String,
    pub death: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: "idle".to_string(),
            run: "run".to_string(),
            back: "back".to_string(),
            hit: "hit".to_string(),
            death: "dying".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub animation: AnimationSettings,
    pub locomotion: LocomotionSettings,
    pub clips: ClipNames,
    pub max_hp: f32,
    /// Seconds a dead character waits before respawning.
    pub respawn_delay: f32,
    /// Frames slower than this (seconds) are skipped entirely.
    pub max_frame_delta: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            animation: AnimationSettings::default(),
            locomotion: LocomotionSettings::default(),
            clips: ClipNames::default(),
            max_hp: 100.0,
            respawn_delay: 5.0,
            max_frame_delta: 0.1,
        }
    }
}

impl GameConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("locomotion.forward_speed", self.locomotion.forward_speed),
            ("locomotion.back_speed", self.locomotion.back_speed),
            ("locomotion.arrive_epsilon", self.locomotion.arrive_epsilon),
            ("max_hp", self.max_hp),
            ("max_frame_delta", self.max_frame_delta),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(StriderError::InvalidConfig(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }

        if self.respawn_delay.is_nan() || self.respawn_delay < 0.0 {
            return Err(StriderError::InvalidConfig(format!(
                "respawn_delay must not be negative, got {}",
                self.respawn_delay
            )));
        }
        if self.animation.min_clip_duration.is_nan() || self.animation.min_clip_duration < 0.0 {
            return Err(StriderError::InvalidConfig(format!(
                "animation.min_clip_duration must not be negative, got {}",
                self.animation.min_clip_duration
            )));
        }
        if !(0.0..=180.0).contains(&self.locomotion.back_angle_degrees) {
            return Err(StriderError::InvalidConfig(format!(
                "locomotion.back_angle_degrees must be within 0..=180, got {}",
                self.locomotion.back_angle_degrees
            )));
        }
        if let Some(limit) = self.animation.splice.upper_channel_limit
            && limit <= self.animation.splice.spine_channel
        {
            return Err(StriderError::InvalidConfig(format!(
                "animation.splice.upper_channel_limit ({limit}) must exceed spine_channel ({})",
                self.animation.splice.spine_channel
            )));
        }
        Ok(())
    }
}
