use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::clip::{ChannelData, ClipData};
use crate::animation::values::Interpolatable;

/// Local transform of one joint. Properties no channel touched stay `None`
/// so the host keeps the rig's bind pose for them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointPose {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

/// Sampled skeleton pose keyed by joint name.
#[derive(Debug, Clone, Default)]
pub struct Pose {
    joints: FxHashMap<String, JointPose>,
}

impl Pose {
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&JointPose> {
        self.joints.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JointPose)> {
        self.joints.iter().map(|(name, joint)| (name.as_str(), joint))
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot<T> {
    value: Option<T>,
    weight: f32,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            weight: 0.0,
        }
    }
}

impl<T: Interpolatable> Slot<T> {
    fn add(&mut self, incoming: T, weight: f32) {
        if weight <= 0.0 {
            return;
        }
        let total = self.weight + weight;
        self.value = Some(match self.value {
            None => incoming,
            Some(current) => T::accumulate(current, incoming, weight / total),
        });
        self.weight = total;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct JointSlots {
    translation: Slot<Vec3>,
    rotation: Slot<Quat>,
    scale: Slot<Vec3>,
}

/// Weighted running blend of several sampled clips.
#[derive(Debug, Default)]
pub(crate) struct PoseBlend {
    joints: FxHashMap<String, JointSlots>,
}

impl PoseBlend {
    pub(crate) fn add_clip(&mut self, clip: &ClipData, time: f32, weight: f32) {
        for channel in &clip.channels {
            let slots = self.joints.entry(channel.joint.clone()).or_default();
            match &channel.data {
                ChannelData::Translation(track) => {
                    if let Some(v) = track.sample(time) {
                        slots.translation.add(v, weight);
                    }
                }
                ChannelData::Rotation(track) => {
                    if let Some(q) = track.sample(time) {
                        slots.rotation.add(q, weight);
                    }
                }
                ChannelData::Scale(track) => {
                    if let Some(v) = track.sample(time) {
                        slots.scale.add(v, weight);
                    }
                }
            }
        }
    }

    pub(crate) fn finish(self) -> Pose {
        let joints = self
            .joints
            .into_iter()
            .map(|(name, slots)| {
                let joint = JointPose {
                    translation: slots.translation.value,
                    rotation: slots.rotation.value,
                    scale: slots.scale.value,
                };
                (name, joint)
            })
            .collect();
        Pose { joints }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_weighted_mean() {
        let mut slot = Slot::<Vec3>::default();
        slot.add(Vec3::ZERO, 1.0);
        slot.add(Vec3::splat(4.0), 3.0);
        let v = slot.value.unwrap();
        assert!((v.x - 3.0).abs() < 1e-5, "got {v}");
    }

    #[test]
    fn slot_ignores_zero_weight() {
        let mut slot = Slot::<f32>::default();
        slot.add(5.0, 0.0);
        assert!(slot.value.is_none());
    }
}
