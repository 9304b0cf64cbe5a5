//! Pose Compositor
//!
//! Decides how a newly requested clip combines with what is already
//! animating. Requests are matched against an ordered list of cases and the
//! first match wins:
//!
//! | Current status   | Requested scope | Outcome                                   |
//! |------------------|-----------------|-------------------------------------------|
//! | `Death`          | any             | ignored until reset                       |
//! | any              | `Death`         | everything stops, death clip plays        |
//! | `Null`           | any             | [`Transition::Bootstrap`]                 |
//! | `Lower`          | `Upper`         | [`Transition::FuseUpperOverLower`]        |
//! | `Upper`          | `Lower`         | [`Transition::FuseLowerUnderUpper`]       |
//! | same clip again  | not `Upper`     | [`Transition::Duplicate`]                 |
//! | `Upper`          | `All`           | [`Transition::DeferUntilUpperEnds`]       |
//! | `UpperAndLower`  | `Upper`         | [`Transition::RefreshUpper`]              |
//! | `UpperAndLower`  | `Lower`         | [`Transition::RefreshLower`]              |
//! | `UpperAndLower`  | `All`           | [`Transition::ResolveFusion`]             |
//! | anything else    |                 | [`Transition::Direct`]                    |
//!
//! A fusion plays a spliced clip: the upper clip's channels with the lower
//! clip's spine channel grafted in, so the hips follow the legs while the
//! arms play the upper-body motion.

use std::sync::Arc;

use crate::animation::clip::{ClipData, ClipRef, EffectScope, LoopMode, SpliceLayout};
use crate::animation::mixer::{AnimationMixer, InstanceHandle};
use crate::animation::queue::PendingTransition;
use crate::animation::status::{PlaybackStatus, status_for};
use crate::errors::{Result, StriderError};

/// Which compositor case handled a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Bootstrap,
    FuseUpperOverLower,
    FuseLowerUnderUpper,
    Duplicate,
    DeferUntilUpperEnds,
    RefreshUpper,
    RefreshLower,
    ResolveFusion,
    Direct,
    Death,
    /// Request arrived while dead.
    Ignored,
    /// The queued clip took over after the upper clip finished.
    Drained,
}

/// The composed animation currently on screen.
#[derive(Debug, Clone)]
pub struct ActivePose {
    /// Clip whose completion drives transitions.
    pub clip: ClipRef,
    /// Instance actually playing for `clip`; the spliced one during fusion.
    pub instance: InstanceHandle,
    /// Spliced channel set, present while an upper clip is fused.
    pub spliced: Option<Arc<ClipData>>,
}

impl ActivePose {
    fn plain(clip: &ClipRef, instance: InstanceHandle) -> Self {
        Self {
            clip: ClipRef::clone(clip),
            instance,
            spliced: None,
        }
    }

    #[must_use]
    pub fn dominant_name(&self) -> &str {
        &self.clip.name
    }

    #[must_use]
    pub fn is_spliced(&self) -> bool {
        self.spliced.is_some()
    }
}

/// Everything the compositor reads and rewrites for one character.
#[derive(Debug, Default)]
pub struct BlendState {
    pub status: PlaybackStatus,
    pub active: Option<ActivePose>,
    pub pending: PendingTransition,
}

/// Returns the registry instance for `clip`, copying loop mode and weight
/// the first time the instance is created.
pub(crate) fn instance_for(mixer: &mut AnimationMixer, clip: &ClipRef) -> InstanceHandle {
    let handle = mixer.clip_action(&clip.data);
    if let Some(instance) = mixer.get_mut(handle)
        && !instance.is_configured()
    {
        instance.configure(clip.loop_mode, clip.weight);
    }
    handle
}

/// Stops the pose's instance, dropping it entirely when it was a splice.
fn retire(mixer: &mut AnimationMixer, pose: &ActivePose) {
    if pose.spliced.is_some() {
        mixer.uncache(pose.instance);
    } else {
        mixer.stop(pose.instance);
    }
}

#[derive(Debug, Clone, Default)]
pub struct PoseCompositor {
    layout: SpliceLayout,
}

impl PoseCompositor {
    #[must_use]
    pub fn new(layout: SpliceLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn layout(&self) -> &SpliceLayout {
        &self.layout
    }

    /// Applies `requested` to `state`, starting and stopping instances in `mixer`.
    pub fn resolve(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        requested: &ClipRef,
    ) -> Transition {
        if state.status == PlaybackStatus::Death {
            log::warn!("Ignoring clip '{}': character is dead", requested.name);
            return Transition::Ignored;
        }
        if requested.scope == EffectScope::Death {
            self.enter_death(mixer, state, Some(requested));
            return Transition::Death;
        }

        let active = match state.active.clone() {
            Some(active) if state.status != PlaybackStatus::Null => active,
            _ => {
                let transition = Self::bootstrap(mixer, state, requested);
                log::debug!("Clip '{}' -> {:?}", requested.name, transition);
                return transition;
            }
        };

        let transition = match (state.status, requested.scope) {
            (PlaybackStatus::Lower, EffectScope::Upper) => {
                self.fuse_upper_over_lower(mixer, state, &active, requested)
            }
            (PlaybackStatus::Upper, EffectScope::Lower) => {
                self.fuse_lower_under_upper(mixer, state, &active, requested)
            }
            _ if requested.name == active.clip.name && requested.scope != EffectScope::Upper => {
                Transition::Duplicate
            }
            (PlaybackStatus::Upper, EffectScope::All) => {
                state.pending.set_next(ClipRef::clone(requested));
                state.pending.defer_stop(&active.clip);
                Transition::DeferUntilUpperEnds
            }
            (PlaybackStatus::UpperAndLower, EffectScope::Upper) => {
                self.refresh_upper(mixer, state, &active, requested)
            }
            (PlaybackStatus::UpperAndLower, EffectScope::Lower) => {
                self.refresh_lower(mixer, state, &active, requested)
            }
            (PlaybackStatus::UpperAndLower, EffectScope::All) => {
                Self::resolve_fusion(mixer, state, &active, requested)
            }
            _ => Self::direct(mixer, state, &active, requested),
        };

        log::debug!(
            "Clip '{}' -> {:?}, status {:?}",
            requested.name,
            transition,
            state.status
        );
        transition
    }

    /// Hands the character over to the queued clip once the upper clip ended.
    pub fn promote(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        next: &ClipRef,
    ) -> Transition {
        let handle = instance_for(mixer, next);
        if next.scope == EffectScope::All || !mixer.is_running(handle) {
            // Full-body clips start over rather than resume mid-cycle.
            mixer.restart(handle);
        }
        if let Some(previous) = state.active.take()
            && previous.instance != handle
        {
            retire(mixer, &previous);
        }
        state.active = Some(ActivePose::plain(next, handle));
        state.status = status_for(next.scope);
        Transition::Drained
    }

    /// Stops everything and, if given, plays the death clip.
    pub fn enter_death(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        clip: Option<&ClipRef>,
    ) {
        if let Some(previous) = state.active.take()
            && previous.spliced.is_some()
        {
            mixer.uncache(previous.instance);
        }
        mixer.stop_all();
        state.pending.clear();

        state.active = clip.map(|clip| {
            let handle = instance_for(mixer, clip);
            mixer.restart(handle);
            ActivePose::plain(clip, handle)
        });
        state.status = PlaybackStatus::Death;
    }

    fn bootstrap(
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        requested: &ClipRef,
    ) -> Transition {
        let handle = instance_for(mixer, requested);
        mixer.restart(handle);
        state.active = Some(ActivePose::plain(requested, handle));
        state.status = status_for(requested.scope);
        Transition::Bootstrap
    }

    fn splice_instance(
        &self,
        mixer: &mut AnimationMixer,
        upper: &ClipData,
        lower: &ClipData,
        loop_mode: LoopMode,
        weight: f32,
    ) -> Result<(InstanceHandle, Arc<ClipData>)> {
        let data = Arc::new(ClipData::splice(upper, lower, &self.layout)?);
        let handle = mixer.clip_action(&data);
        if let Some(instance) = mixer.get_mut(handle) {
            instance.configure(loop_mode, weight);
        }
        Ok((handle, data))
    }

    fn fuse_upper_over_lower(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        lower: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        let spliced = self.splice_instance(
            mixer,
            &requested.data,
            &lower.clip.data,
            requested.loop_mode,
            requested.weight,
        );
        let pose = match spliced {
            Ok((handle, data)) => ActivePose {
                clip: ClipRef::clone(requested),
                instance: handle,
                spliced: Some(data),
            },
            Err(err) => {
                warn_unspliced(&requested.name, &err);
                ActivePose::plain(requested, instance_for(mixer, requested))
            }
        };
        // The lower clip keeps running underneath.
        mixer.restart(pose.instance);

        state.pending.set_next(ClipRef::clone(&lower.clip));
        state.pending.defer_stop(&lower.clip);
        state.active = Some(pose);
        state.status = PlaybackStatus::UpperAndLower;
        Transition::FuseUpperOverLower
    }

    fn fuse_lower_under_upper(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        upper: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        let lower = instance_for(mixer, requested);
        mixer.restart(lower);

        if let Some(pose) = self.resplice_upper(mixer, upper, requested) {
            state.active = Some(pose);
        }

        state.pending.defer_stop(requested);
        state.pending.set_next(ClipRef::clone(requested));
        state.status = PlaybackStatus::UpperAndLower;
        Transition::FuseLowerUnderUpper
    }

    fn refresh_upper(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        current: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        // The fused lower body lives in the queue, not in the active pose.
        let spliced = state.pending.next().map(|lower| {
            self.splice_instance(
                mixer,
                &requested.data,
                &lower.data,
                requested.loop_mode,
                requested.weight,
            )
        });
        let pose = match spliced {
            Some(Ok((handle, data))) => ActivePose {
                clip: ClipRef::clone(requested),
                instance: handle,
                spliced: Some(data),
            },
            Some(Err(err)) => {
                warn_unspliced(&requested.name, &err);
                ActivePose::plain(requested, instance_for(mixer, requested))
            }
            None => ActivePose::plain(requested, instance_for(mixer, requested)),
        };

        retire(mixer, current);
        mixer.restart(pose.instance);
        state.active = Some(pose);
        state.status = PlaybackStatus::UpperAndLower;
        Transition::RefreshUpper
    }

    fn refresh_lower(
        &self,
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        upper: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        let previous_lower = state.pending.next().cloned();
        if previous_lower
            .as_ref()
            .is_some_and(|lower| lower.name == requested.name)
        {
            return Transition::Duplicate;
        }

        if let Some(pose) = self.resplice_upper(mixer, upper, requested) {
            state.active = Some(pose);
        }

        let lower = instance_for(mixer, requested);
        mixer.play(lower);
        if let Some(previous) = previous_lower
            && let Some(handle) = mixer.existing_action(&previous.data)
            && handle != lower
        {
            mixer.stop(handle);
        }

        state.pending.set_next(ClipRef::clone(requested));
        state.pending.defer_stop(requested);
        state.status = PlaybackStatus::UpperAndLower;
        Transition::RefreshLower
    }

    fn resolve_fusion(
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        current: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        if state
            .pending
            .next()
            .is_some_and(|next| next.name == requested.name)
        {
            return Transition::Duplicate;
        }

        // Swap the splice back to the plain upper clip at the same time.
        let upper = instance_for(mixer, &current.clip);
        if upper != current.instance {
            mixer.restart(upper);
            mixer.sync_time(upper, current.instance);
            retire(mixer, current);
        }

        if let Some(lower) = state.pending.next()
            && let Some(handle) = mixer.existing_action(&lower.data)
        {
            mixer.stop(handle);
        }

        // Start the full-body clip now so there is no idle frame when the
        // upper clip ends.
        let full = instance_for(mixer, requested);
        mixer.play(full);

        state.active = Some(ActivePose::plain(&current.clip, upper));
        state.pending.set_next(ClipRef::clone(requested));
        state.pending.defer_stop(requested);
        Transition::ResolveFusion
    }

    fn direct(
        mixer: &mut AnimationMixer,
        state: &mut BlendState,
        current: &ActivePose,
        requested: &ClipRef,
    ) -> Transition {
        let handle = instance_for(mixer, requested);

        if requested.scope == EffectScope::Upper && state.status != PlaybackStatus::Upper {
            // Come back to the current clip when the upper clip ends.
            state.pending.set_next(ClipRef::clone(&current.clip));
            state.pending.defer_stop(&current.clip);
        } else if state.status != PlaybackStatus::Upper {
            retire(mixer, current);
        }
        // A running upper clip is left to finish on its own.

        mixer.restart(handle);
        state.active = Some(ActivePose::plain(requested, handle));
        state.status = status_for(requested.scope);
        Transition::Direct
    }

    /// Replaces the upper pose's spine with `lower`'s, keeping playback time.
    ///
    /// Returns `None` when the skeletons do not line up; the upper pose then
    /// keeps playing unspliced.
    fn resplice_upper(
        &self,
        mixer: &mut AnimationMixer,
        upper: &ActivePose,
        lower: &ClipRef,
    ) -> Option<ActivePose> {
        let (loop_mode, weight) = mixer.get(upper.instance).map_or(
            (upper.clip.loop_mode, upper.clip.weight),
            |instance| (instance.loop_mode, instance.weight),
        );

        match self.splice_instance(mixer, &upper.clip.data, &lower.data, loop_mode, weight) {
            Ok((handle, data)) => {
                mixer.restart(handle);
                mixer.sync_time(handle, upper.instance);
                retire(mixer, upper);
                Some(ActivePose {
                    clip: ClipRef::clone(&upper.clip),
                    instance: handle,
                    spliced: Some(data),
                })
            }
            Err(err) => {
                warn_unspliced(&upper.clip.name, &err);
                None
            }
        }
    }
}

fn warn_unspliced(clip: &str, err: &StriderError) {
    log::warn!("Playing '{clip}' unspliced: {err}");
}
