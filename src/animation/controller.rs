use crate::animation::clip::{AnimationClip, ClipRef, EffectScope};
use crate::animation::compositor::{ActivePose, BlendState, PoseCompositor, Transition};
use crate::animation::mixer::AnimationMixer;
use crate::animation::pose::Pose;
use crate::animation::queue::PendingTransition;
use crate::animation::registry::ClipRegistry;
use crate::animation::status::PlaybackStatus;
use crate::config::AnimationSettings;
use crate::errors::Result;

/// Per-character playback driver.
///
/// Owns the clip registry, the mixer and the blend state. Gameplay code
/// talks to it through [`play`](Self::play) and [`tick`](Self::tick) only.
///
/// Within one frame the host must call `tick` before issuing new `play`
/// requests, so queued transitions resolve before fresh ones arrive.
#[derive(Debug)]
pub struct AnimationController {
    registry: ClipRegistry,
    mixer: AnimationMixer,
    compositor: PoseCompositor,
    state: BlendState,
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(&AnimationSettings::default())
    }
}

impl AnimationController {
    #[must_use]
    pub fn new(settings: &AnimationSettings) -> Self {
        Self {
            registry: ClipRegistry::new(settings.min_clip_duration),
            mixer: AnimationMixer::new(settings.min_clip_duration),
            compositor: PoseCompositor::new(settings.splice),
            state: BlendState::default(),
        }
    }

    pub fn register(&mut self, clip: AnimationClip) -> Result<ClipRef> {
        self.registry.register(clip)
    }

    pub fn lookup(&self, name: &str) -> Result<ClipRef> {
        self.registry.lookup(name)
    }

    #[must_use]
    pub fn registry(&self) -> &ClipRegistry {
        &self.registry
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn current_status(&self) -> PlaybackStatus {
        self.state.status
    }

    #[must_use]
    pub fn active_pose(&self) -> Option<&ActivePose> {
        self.state.active.as_ref()
    }

    #[must_use]
    pub fn pending(&self) -> &PendingTransition {
        &self.state.pending
    }

    /// Requests playback of a registered clip.
    ///
    /// Unknown names fail with `ClipNotFound` and leave the state untouched.
    pub fn play(&mut self, name: &str) -> Result<Transition> {
        let clip = self.registry.lookup(name)?;
        Ok(self
            .compositor
            .resolve(&mut self.mixer, &mut self.state, &clip))
    }

    /// Advances the clock and resolves a finished upper-body clip.
    ///
    /// Returns the drain outcome when the queued clip took over.
    pub fn tick(&mut self, dt: f32) -> Option<Transition> {
        self.mixer.update(dt);

        if self.state.status == PlaybackStatus::Death {
            return None;
        }
        let active = self.state.active.as_ref()?;
        let upper_dominant = active.clip.scope == EffectScope::Upper
            || self.state.status.is_fused();
        if upper_dominant && !self.mixer.is_running(active.instance) {
            return self.drain();
        }
        None
    }

    /// Plays the queued clip and stops everything deferred behind it.
    fn drain(&mut self) -> Option<Transition> {
        let next = self.state.pending.take_next()?;
        let transition = self
            .compositor
            .promote(&mut self.mixer, &mut self.state, &next);

        for clip in self.state.pending.take_stop_set() {
            if clip.name == next.name {
                continue;
            }
            if let Some(handle) = self.mixer.existing_action(&clip.data) {
                self.mixer.stop(handle);
            }
        }

        log::debug!(
            "Upper clip finished, '{}' took over ({:?})",
            next.name,
            self.state.status
        );
        Some(transition)
    }

    /// Forces the death state. Nothing queued is drained.
    ///
    /// `death_clip` is played if given; it does not need `Death` scope.
    pub fn die(&mut self, death_clip: Option<&str>) -> Result<Transition> {
        if self.state.status == PlaybackStatus::Death {
            return Ok(Transition::Ignored);
        }
        let clip = death_clip.map(|name| self.registry.lookup(name)).transpose()?;
        self.compositor
            .enter_death(&mut self.mixer, &mut self.state, clip.as_ref());
        Ok(Transition::Death)
    }

    /// Stops every instance and returns to `Null`, also leaving `Death`.
    pub fn reset(&mut self) {
        if let Some(active) = self.state.active.take()
            && active.spliced.is_some()
        {
            self.mixer.uncache(active.instance);
        }
        self.mixer.stop_all();
        self.state.pending.clear();
        self.state.status = PlaybackStatus::Null;
    }

    /// Whether the named clip is animating, either directly or as the
    /// upper half of a splice.
    #[must_use]
    pub fn is_clip_running(&self, name: &str) -> bool {
        let Ok(clip) = self.registry.lookup(name) else {
            return false;
        };
        if let Some(active) = &self.state.active
            && active.clip.name == name
            && self.mixer.is_running(active.instance)
        {
            return true;
        }
        self.mixer
            .existing_action(&clip.data)
            .is_some_and(|handle| self.mixer.is_running(handle))
    }

    /// Blended skeleton pose of everything currently running.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.mixer.evaluate()
    }
}
