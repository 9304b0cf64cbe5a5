use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::pose::{Pose, PoseBlend};
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{Result, StriderError};

/// Body region a clip drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectScope {
    Upper,
    Lower,
    All,
    /// Death animation, highest priority.
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopMode {
    /// Play once and stop on the last frame.
    Once,
    #[default]
    Repeat,
}

#[derive(Debug, Clone)]
pub enum ChannelData {
    Translation(KeyframeTrack<Vec3>),
    Rotation(KeyframeTrack<Quat>),
    Scale(KeyframeTrack<Vec3>),
}

impl ChannelData {
    fn end_time(&self) -> f32 {
        match self {
            ChannelData::Translation(t) | ChannelData::Scale(t) => t.end_time(),
            ChannelData::Rotation(t) => t.end_time(),
        }
    }
}

/// One skeletal channel: a property track bound to a joint by name.
#[derive(Debug, Clone)]
pub struct Channel {
    pub joint: String,
    pub data: ChannelData,
}

impl Channel {
    pub fn translation(joint: impl Into<String>, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            joint: joint.into(),
            data: ChannelData::Translation(track),
        }
    }

    pub fn rotation(joint: impl Into<String>, track: KeyframeTrack<Quat>) -> Self {
        Self {
            joint: joint.into(),
            data: ChannelData::Rotation(track),
        }
    }

    pub fn scale(joint: impl Into<String>, track: KeyframeTrack<Vec3>) -> Self {
        Self {
            joint: joint.into(),
            data: ChannelData::Scale(track),
        }
    }
}

/// Where the rig is cut into upper and lower body.
///
/// Channel order is fixed by the rig, so the cut is configured per character
/// rather than derived from joint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpliceLayout {
    /// Root/spine channel taken from the lower-body clip.
    pub spine_channel: usize,
    /// Number of leading channels that belong to the upper body.
    /// `None` keeps every channel of the upper clip.
    pub upper_channel_limit: Option<usize>,
}

impl Default for SpliceLayout {
    fn default() -> Self {
        Self {
            spine_channel: 1,
            upper_channel_limit: Some(45),
        }
    }
}

/// Skeletal channel data with a fixed duration.
#[derive(Debug, Clone)]
pub struct ClipData {
    pub name: String,
    pub duration: f32,
    pub channels: Vec<Channel>,
}

impl ClipData {
    /// Creates clip data whose duration is the latest keyframe of any channel.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let duration = channels
            .iter()
            .map(|c| c.data.end_time())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            channels,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples every channel at `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> Pose {
        let mut blend = PoseBlend::default();
        blend.add_clip(self, time, 1.0);
        blend.finish()
    }

    /// Builds an upper-body clip that carries the lower clip's spine.
    ///
    /// The result is a copy of `upper`'s channels, cut to the layout's
    /// upper-body channel count, with the spine channel replaced by
    /// `lower`'s channel at the same index. Duration follows `upper`.
    pub fn splice(upper: &ClipData, lower: &ClipData, layout: &SpliceLayout) -> Result<ClipData> {
        let spine = layout.spine_channel;
        for clip in [upper, lower] {
            if clip.channels.len() <= spine {
                return Err(StriderError::IncompatibleSkeleton {
                    clip: clip.name.clone(),
                    channels: clip.channels.len(),
                    splice_index: spine,
                });
            }
        }

        let keep = layout
            .upper_channel_limit
            .map_or(upper.channels.len(), |limit| limit.min(upper.channels.len()))
            .max(spine + 1);
        let mut channels: Vec<Channel> = upper.channels[..keep].to_vec();
        channels[spine] = lower.channels[spine].clone();

        Ok(ClipData {
            name: format!("{}+{}", upper.name, lower.name),
            duration: upper.duration,
            channels,
        })
    }
}

/// A registered clip: channel data plus how the character plays it.
///
/// Immutable once registered; the compositor shares it through [`ClipRef`].
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub scope: EffectScope,
    pub loop_mode: LoopMode,
    pub weight: f32,
    pub data: Arc<ClipData>,
}

pub type ClipRef = Arc<AnimationClip>;

impl AnimationClip {
    pub fn new(
        name: impl Into<String>,
        scope: EffectScope,
        loop_mode: LoopMode,
        weight: f32,
        data: ClipData,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            loop_mode,
            weight,
            data: Arc::new(data),
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.data.duration
    }
}
