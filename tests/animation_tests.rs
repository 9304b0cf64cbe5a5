//! Animation Primitive Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step sampling and clamping
//! - Interpolatable implementations (f32, Vec3, Quat)
//! - ClipInstance loop modes and the short-clip rule
//! - AnimationMixer instance caching, update and weighted evaluation
//! - ClipData duration and upper/lower splicing
//! - ClipRegistry validation

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use strider::animation::action::{ClipInstance, InstanceState};
use strider::animation::clip::{
    AnimationClip, Channel, ChannelData, ClipData, EffectScope, LoopMode, SpliceLayout,
};
use strider::animation::mixer::AnimationMixer;
use strider::animation::registry::ClipRegistry;
use strider::animation::tracks::{InterpolationMode, KeyframeTrack};
use strider::animation::values::Interpolatable;
use strider::errors::StriderError;

const EPSILON: f32 = 1e-5;
const MIN_DURATION: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn slide(joint: &str, from: f32, to: f32, duration: f32) -> Channel {
    Channel::translation(
        joint,
        KeyframeTrack::new(
            vec![0.0, duration],
            vec![Vec3::splat(from), Vec3::splat(to)],
            InterpolationMode::Linear,
        ),
    )
}

/// Clip with `count` channels; channel `i` drives joint `j{i}` with value `marker`.
fn marked_clip(name: &str, count: usize, marker: f32, duration: f32) -> ClipData {
    let channels = (0..count)
        .map(|i| slide(&format!("j{i}"), marker, marker, duration))
        .collect();
    ClipData::new(name, channels)
}

fn channel_marker(clip: &ClipData, index: usize) -> f32 {
    match &clip.channels[index].data {
        ChannelData::Translation(track) => track.sample(0.0).unwrap().x,
        other => panic!("unexpected channel {other:?}"),
    }
}

// ============================================================================
// KeyframeTrack: Linear Interpolation
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0], InterpolationMode::Linear);
    let val = track.sample(0.5).unwrap();
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_f32_exact_keyframes() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        InterpolationMode::Linear,
    );
    assert!(approx(track.sample(0.0).unwrap(), 0.0));
    assert!(approx(track.sample(1.0).unwrap(), 10.0));
    assert!(approx(track.sample(2.0).unwrap(), 20.0));
}

#[test]
fn track_clamps_outside_range() {
    let track = KeyframeTrack::new(vec![0.5, 1.0], vec![3.0_f32, 7.0], InterpolationMode::Linear);
    assert!(approx(track.sample(0.0).unwrap(), 3.0));
    assert!(approx(track.sample(5.0).unwrap(), 7.0));
}

#[test]
fn track_linear_vec3() {
    let track = KeyframeTrack::new(
        vec![0.0, 2.0],
        vec![Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)],
        InterpolationMode::Linear,
    );
    let v = track.sample(1.0).unwrap();
    assert!(approx(v.x, 1.0) && approx(v.y, 2.0) && approx(v.z, 3.0), "got {v}");
}

#[test]
fn track_linear_quat_slerp() {
    let end = Quat::from_rotation_y(FRAC_PI_2);
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, end],
        InterpolationMode::Linear,
    );
    let q = track.sample(0.5).unwrap();
    let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
    assert!(q.angle_between(expected) < 1e-4, "got {q:?}");
}

// ============================================================================
// KeyframeTrack: Step Interpolation and Edge Cases
// ============================================================================

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![1.0_f32, 5.0, 9.0],
        InterpolationMode::Step,
    );
    assert!(approx(track.sample(0.99).unwrap(), 1.0));
    assert!(approx(track.sample(1.5).unwrap(), 5.0));
}

#[test]
fn track_empty_samples_none() {
    let track: KeyframeTrack<f32> = KeyframeTrack::new(vec![], vec![], InterpolationMode::Linear);
    assert!(track.is_empty());
    assert!(track.sample(0.3).is_none());
    assert!(approx(track.end_time(), 0.0));
}

#[test]
fn track_constant_has_zero_length() {
    let track = KeyframeTrack::constant(Vec3::ONE);
    assert!(approx(track.end_time(), 0.0));
    assert_eq!(track.sample(10.0), Some(Vec3::ONE));
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn quat_accumulate_takes_short_arc() {
    let a = Quat::from_rotation_y(0.1);
    let b = -Quat::from_rotation_y(0.3);
    let mixed = Quat::accumulate(a, b, 0.5);
    assert!(mixed.is_normalized());
    assert!(mixed.angle_between(Quat::from_rotation_y(0.2)) < 1e-3);
}

#[test]
fn f32_accumulate_is_lerp() {
    assert!(approx(f32::accumulate(2.0, 4.0, 0.25), 2.5));
}

// ============================================================================
// ClipInstance: Loop Modes
// ============================================================================

fn instance(duration: f32, loop_mode: LoopMode) -> ClipInstance {
    let data = Arc::new(marked_clip("c", 1, 0.0, duration));
    let mut instance = ClipInstance::new(data);
    instance.configure(loop_mode, 1.0);
    instance
}

#[test]
fn instance_starts_stopped() {
    let inst = instance(1.0, LoopMode::Repeat);
    assert_eq!(inst.state(), InstanceState::Stopped);
    assert!(!inst.is_running());
}

#[test]
fn instance_once_finishes_at_end() {
    let mut inst = instance(1.0, LoopMode::Once);
    inst.play();
    inst.update(0.6, MIN_DURATION);
    assert!(inst.is_running());
    inst.update(0.6, MIN_DURATION);
    assert_eq!(inst.state(), InstanceState::Finished);
    assert!(approx(inst.time, 1.0));
}

#[test]
fn instance_repeat_wraps() {
    let mut inst = instance(1.0, LoopMode::Repeat);
    inst.play();
    inst.update(1.25, MIN_DURATION);
    assert!(inst.is_running());
    assert!(approx(inst.time, 0.25), "got {}", inst.time);
}

#[test]
fn finished_instance_ignores_play_until_stopped() {
    let mut inst = instance(0.5, LoopMode::Once);
    inst.play();
    inst.update(1.0, MIN_DURATION);
    inst.play();
    assert_eq!(inst.state(), InstanceState::Finished);

    inst.restart();
    assert!(inst.is_running());
    assert!(approx(inst.time, 0.0));
}

#[test]
fn zero_length_once_finishes_immediately() {
    let mut inst = instance(0.0, LoopMode::Once);
    inst.play();
    inst.update(0.016, MIN_DURATION);
    assert_eq!(inst.state(), InstanceState::Finished);
}

#[test]
fn zero_length_repeat_holds_first_frame() {
    let mut inst = instance(0.0, LoopMode::Repeat);
    inst.play();
    inst.update(0.016, MIN_DURATION);
    assert!(inst.is_running());
    assert!(approx(inst.time, 0.0));
}

#[test]
fn threshold_length_once_finishes_immediately() {
    let mut inst = instance(MIN_DURATION, LoopMode::Once);
    inst.play();
    inst.update(1e-4, MIN_DURATION);
    assert_eq!(inst.state(), InstanceState::Finished);
    assert!(approx(inst.time, MIN_DURATION));
}

#[test]
fn stopped_instance_does_not_advance() {
    let mut inst = instance(1.0, LoopMode::Repeat);
    inst.update(0.5, MIN_DURATION);
    assert!(approx(inst.time, 0.0));
}

// ============================================================================
// AnimationMixer
// ============================================================================

#[test]
fn mixer_clip_action_is_idempotent() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let data = Arc::new(marked_clip("walk", 2, 0.0, 1.0));
    let a = mixer.clip_action(&data);
    let b = mixer.clip_action(&data);
    assert_eq!(a, b);
    assert_eq!(mixer.len(), 1);

    // Same content, different allocation: a separate instance.
    let copy = Arc::new((*data).clone());
    assert_ne!(mixer.clip_action(&copy), a);
}

#[test]
fn mixer_uncache_forgets_instance() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let data = Arc::new(marked_clip("walk", 2, 0.0, 1.0));
    let handle = mixer.clip_action(&data);
    mixer.uncache(handle);
    assert!(mixer.is_empty());
    assert!(mixer.existing_action(&data).is_none());
    assert!(mixer.get(handle).is_none());
}

#[test]
fn mixer_update_advances_running_only() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let a = mixer.clip_action(&Arc::new(marked_clip("a", 1, 0.0, 2.0)));
    let b = mixer.clip_action(&Arc::new(marked_clip("b", 1, 0.0, 2.0)));
    mixer.play(a);
    mixer.update(0.5);
    assert!(approx(mixer.get(a).unwrap().time, 0.5));
    assert!(approx(mixer.get(b).unwrap().time, 0.0));
    assert_eq!(mixer.running().count(), 1);
}

#[test]
fn mixer_sync_time_copies_clock() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let a = mixer.clip_action(&Arc::new(marked_clip("a", 1, 0.0, 2.0)));
    let b = mixer.clip_action(&Arc::new(marked_clip("b", 1, 0.0, 2.0)));
    mixer.play(a);
    mixer.update(0.75);
    mixer.sync_time(b, a);
    assert!(approx(mixer.get(b).unwrap().time, 0.75));
}

#[test]
fn mixer_evaluate_blends_by_weight() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let a = mixer.clip_action(&Arc::new(marked_clip("a", 1, 0.0, 1.0)));
    let b = mixer.clip_action(&Arc::new(marked_clip("b", 1, 4.0, 1.0)));
    mixer.set_weight(a, 1.0);
    mixer.set_weight(b, 3.0);
    mixer.play(a);
    mixer.play(b);

    let pose = mixer.evaluate();
    let t = pose.joint("j0").and_then(|j| j.translation).unwrap();
    assert!(approx(t.x, 3.0), "got {t}");
    assert!(pose.joint("j0").unwrap().rotation.is_none());
}

#[test]
fn mixer_evaluate_skips_stopped() {
    let mut mixer = AnimationMixer::new(MIN_DURATION);
    let a = mixer.clip_action(&Arc::new(marked_clip("a", 1, 2.0, 1.0)));
    mixer.play(a);
    mixer.stop_all();
    assert!(mixer.evaluate().is_empty());
}

// ============================================================================
// ClipData: Duration and Splicing
// ============================================================================

#[test]
fn clip_duration_is_latest_keyframe() {
    let clip = ClipData::new(
        "mixed",
        vec![slide("a", 0.0, 1.0, 0.5), slide("b", 0.0, 1.0, 1.25)],
    );
    assert!(approx(clip.duration, 1.25));
    assert!(approx(clip.clone().with_duration(3.0).duration, 3.0));
}

#[test]
fn splice_takes_spine_from_lower() {
    let upper = marked_clip("hit", 4, 1.0, 0.5);
    let lower = marked_clip("run", 4, 2.0, 0.8);
    let layout = SpliceLayout {
        spine_channel: 1,
        upper_channel_limit: None,
    };

    let spliced = ClipData::splice(&upper, &lower, &layout).unwrap();
    assert_eq!(spliced.name, "hit+run");
    assert_eq!(spliced.channel_count(), 4);
    assert!(approx(spliced.duration, 0.5));
    assert!(approx(channel_marker(&spliced, 0), 1.0));
    assert!(approx(channel_marker(&spliced, 1), 2.0));
    assert!(approx(channel_marker(&spliced, 3), 1.0));
}

#[test]
fn splice_truncates_to_upper_limit() {
    let upper = marked_clip("hit", 6, 1.0, 0.5);
    let lower = marked_clip("run", 6, 2.0, 0.8);
    let layout = SpliceLayout {
        spine_channel: 1,
        upper_channel_limit: Some(3),
    };
    let spliced = ClipData::splice(&upper, &lower, &layout).unwrap();
    assert_eq!(spliced.channel_count(), 3);
}

#[test]
fn splice_rejects_short_skeleton() {
    let upper = marked_clip("hit", 1, 1.0, 0.5);
    let lower = marked_clip("run", 4, 2.0, 0.8);
    let err = ClipData::splice(&upper, &lower, &SpliceLayout::default()).unwrap_err();
    match err {
        StriderError::IncompatibleSkeleton {
            clip,
            channels,
            splice_index,
        } => {
            assert_eq!(clip, "hit");
            assert_eq!(channels, 1);
            assert_eq!(splice_index, 1);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn splice_leaves_inputs_untouched() {
    let upper = marked_clip("hit", 3, 1.0, 0.5);
    let lower = marked_clip("run", 3, 2.0, 0.8);
    let _ = ClipData::splice(&upper, &lower, &SpliceLayout::default()).unwrap();
    assert!(approx(channel_marker(&upper, 1), 1.0));
    assert!(approx(channel_marker(&lower, 1), 2.0));
}

// ============================================================================
// ClipRegistry
// ============================================================================

#[test]
fn registry_rejects_duplicates() {
    let mut registry = ClipRegistry::new(MIN_DURATION);
    let clip = || {
        AnimationClip::new(
            "run",
            EffectScope::Lower,
            LoopMode::Repeat,
            1.0,
            marked_clip("run", 2, 0.0, 1.0),
        )
    };
    registry.register(clip()).unwrap();
    assert!(matches!(
        registry.register(clip()),
        Err(StriderError::DuplicateClipName(name)) if name == "run"
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_rejects_bad_weight() {
    let mut registry = ClipRegistry::new(MIN_DURATION);
    for weight in [0.0, -1.0, f32::NAN] {
        let clip = AnimationClip::new(
            "run",
            EffectScope::Lower,
            LoopMode::Repeat,
            weight,
            marked_clip("run", 2, 0.0, 1.0),
        );
        assert!(matches!(registry.register(clip), Err(StriderError::InvalidConfig(_))));
    }
    assert!(registry.is_empty());
}

#[test]
fn registry_flags_one_shots_at_or_under_threshold() {
    let registry = ClipRegistry::new(MIN_DURATION);
    let clip = |loop_mode, duration| {
        AnimationClip::new(
            "hit",
            EffectScope::Upper,
            loop_mode,
            1.0,
            marked_clip("hit", 2, 0.0, duration),
        )
    };
    assert!(registry.finishes_on_first_frame(&clip(LoopMode::Once, 0.0)));
    assert!(registry.finishes_on_first_frame(&clip(LoopMode::Once, MIN_DURATION)));
    assert!(!registry.finishes_on_first_frame(&clip(LoopMode::Once, 0.5)));
    assert!(!registry.finishes_on_first_frame(&clip(LoopMode::Repeat, MIN_DURATION)));
}

#[test]
fn registry_lookup_missing() {
    let registry = ClipRegistry::new(MIN_DURATION);
    let err = registry.lookup("ghost").unwrap_err();
    assert!(matches!(err, StriderError::ClipNotFound(ref name) if name == "ghost"));
    assert!(err.is_recoverable());
}
