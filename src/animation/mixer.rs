use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::ClipInstance;
use crate::animation::clip::{ClipData, LoopMode};
use crate::animation::pose::{Pose, PoseBlend};

new_key_type! {
    pub struct InstanceHandle;
}

/// Owns every clip instance of one character and advances their clock.
///
/// Instances are created once per distinct channel set (`Arc` identity), so
/// asking twice for the same clip data yields the same handle.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    instances: SlotMap<InstanceHandle, ClipInstance>,
    by_clip: FxHashMap<usize, InstanceHandle>,
    min_clip_duration: f32,
}

fn clip_key(clip: &Arc<ClipData>) -> usize {
    Arc::as_ptr(clip) as usize
}

impl AnimationMixer {
    #[must_use]
    pub fn new(min_clip_duration: f32) -> Self {
        Self {
            instances: SlotMap::with_key(),
            by_clip: FxHashMap::default(),
            min_clip_duration,
        }
    }

    /// Returns the instance for `clip`, creating it on first use.
    pub fn clip_action(&mut self, clip: &Arc<ClipData>) -> InstanceHandle {
        if let Some(handle) = self.existing_action(clip) {
            return handle;
        }
        let handle = self.instances.insert(ClipInstance::new(Arc::clone(clip)));
        self.by_clip.insert(clip_key(clip), handle);
        handle
    }

    #[must_use]
    pub fn existing_action(&self, clip: &Arc<ClipData>) -> Option<InstanceHandle> {
        self.by_clip
            .get(&clip_key(clip))
            .copied()
            .filter(|h| self.instances.contains_key(*h))
    }

    #[must_use]
    pub fn get(&self, handle: InstanceHandle) -> Option<&ClipInstance> {
        self.instances.get(handle)
    }

    pub fn get_mut(&mut self, handle: InstanceHandle) -> Option<&mut ClipInstance> {
        self.instances.get_mut(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn play(&mut self, handle: InstanceHandle) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.play();
        }
    }

    pub fn stop(&mut self, handle: InstanceHandle) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.stop();
        }
    }

    /// Rewinds and plays from the first frame.
    pub fn restart(&mut self, handle: InstanceHandle) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.restart();
        }
    }

    #[must_use]
    pub fn is_running(&self, handle: InstanceHandle) -> bool {
        self.instances.get(handle).is_some_and(ClipInstance::is_running)
    }

    pub fn set_loop_mode(&mut self, handle: InstanceHandle, loop_mode: LoopMode) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.loop_mode = loop_mode;
        }
    }

    pub fn set_weight(&mut self, handle: InstanceHandle, weight: f32) {
        if let Some(instance) = self.instances.get_mut(handle) {
            instance.weight = weight;
        }
    }

    /// Copies playback time of `source` into `target`.
    pub fn sync_time(&mut self, target: InstanceHandle, source: InstanceHandle) {
        let Some(source) = self.instances.get(source).cloned() else {
            return;
        };
        if let Some(target) = self.instances.get_mut(target) {
            target.sync_time_with(&source);
        }
    }

    /// Forgets an instance. Used for spliced clips that were superseded.
    pub fn uncache(&mut self, handle: InstanceHandle) {
        if let Some(instance) = self.instances.remove(handle) {
            self.by_clip.remove(&clip_key(instance.clip()));
        }
    }

    pub fn stop_all(&mut self) {
        for instance in self.instances.values_mut() {
            instance.stop();
        }
    }

    pub fn running(&self) -> impl Iterator<Item = (InstanceHandle, &ClipInstance)> {
        self.instances.iter().filter(|(_, i)| i.is_running())
    }

    /// Advances every running instance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for instance in self.instances.values_mut() {
            instance.update(dt, self.min_clip_duration);
        }
    }

    /// Blends all running instances by weight into one pose.
    #[must_use]
    pub fn evaluate(&self) -> Pose {
        let mut blend = PoseBlend::default();
        for (_, instance) in self.running() {
            if instance.weight > 0.0 {
                blend.add_clip(instance.clip(), instance.time, instance.weight);
            }
        }
        blend.finish()
    }
}
