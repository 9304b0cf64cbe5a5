use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::action::is_too_short;
use crate::animation::clip::{AnimationClip, ClipRef, LoopMode};
use crate::errors::{Result, StriderError};

/// Clips loaded for one character, keyed by name.
///
/// There is no removal: clips live as long as the character.
#[derive(Debug, Default)]
pub struct ClipRegistry {
    clips: FxHashMap<String, ClipRef>,
    min_clip_duration: f32,
}

impl ClipRegistry {
    #[must_use]
    pub fn new(min_clip_duration: f32) -> Self {
        Self {
            clips: FxHashMap::default(),
            min_clip_duration,
        }
    }

    /// Registers a clip under its own name.
    pub fn register(&mut self, clip: AnimationClip) -> Result<ClipRef> {
        if self.clips.contains_key(&clip.name) {
            return Err(StriderError::DuplicateClipName(clip.name));
        }
        if clip.weight.is_nan() || clip.weight <= 0.0 {
            return Err(StriderError::InvalidConfig(format!(
                "clip '{}' has non-positive weight {}",
                clip.name, clip.weight
            )));
        }
        if self.finishes_on_first_frame(&clip) {
            log::warn!(
                "Clip '{}' is one-shot but only {}s long; it will finish on its first frame",
                clip.name,
                clip.duration()
            );
        }

        let clip = Arc::new(clip);
        self.clips.insert(clip.name.clone(), Arc::clone(&clip));
        log::debug!("Registered clip '{}' ({:?})", clip.name, clip.scope);
        Ok(clip)
    }

    /// `true` for a one-shot clip the mixer will finish as soon as it starts.
    #[must_use]
    pub fn finishes_on_first_frame(&self, clip: &AnimationClip) -> bool {
        clip.loop_mode == LoopMode::Once && is_too_short(clip.duration(), self.min_clip_duration)
    }

    pub fn lookup(&self, name: &str) -> Result<ClipRef> {
        self.clips
            .get(name)
            .cloned()
            .ok_or_else(|| StriderError::ClipNotFound(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipRef> {
        self.clips.values()
    }
}
