//! Character animation: clip registry, upper/lower body blending and the
//! per-frame playback driver.

pub mod action;
pub mod clip;
pub mod compositor;
pub mod controller;
pub mod mixer;
pub mod pose;
pub mod queue;
pub mod registry;
pub mod status;
pub mod tracks;
pub mod values;

pub use action::{ClipInstance, InstanceState};
pub use clip::{
    AnimationClip, Channel, ChannelData, ClipData, ClipRef, EffectScope, LoopMode, SpliceLayout,
};
pub use compositor::{ActivePose, BlendState, PoseCompositor, Transition};
pub use controller::AnimationController;
pub use mixer::{AnimationMixer, InstanceHandle};
pub use pose::{JointPose, Pose};
pub use queue::PendingTransition;
pub use registry::ClipRegistry;
pub use status::{PlaybackStatus, status_for};
pub use tracks::{InterpolationMode, KeyframeTrack};
