use glam::Vec3;

use crate::animation::clip::{AnimationClip, ClipRef};
use crate::animation::compositor::Transition;
use crate::animation::controller::AnimationController;
use crate::animation::status::PlaybackStatus;
use crate::config::{ClipNames, GameConfig};
use crate::errors::{Result, StriderError};
use crate::game::events::{self, CharacterEvent, EventReceiver, EventSender};
use crate::game::health::Health;
use crate::game::locomotion::{Gait, Locomotion, Step};
use crate::game::tickable::Tickable;

/// A player or enemy: animation, health and movement under one name.
///
/// Each tick runs the animation driver first, then the death check, then
/// movement, so queued animation transitions always resolve before the
/// gameplay requests of the same frame.
#[derive(Debug)]
pub struct Character {
    name: String,
    controller: AnimationController,
    health: Health,
    locomotion: Locomotion,
    clips: ClipNames,
    spawn_point: Vec3,
    respawn_delay: f32,
    /// Seconds since death, `None` while alive.
    dead_for: Option<f32>,
    /// `None` until someone subscribes or after every listener went away.
    events: Option<EventSender>,
}

impl Character {
    pub fn new(name: impl Into<String>, config: &GameConfig) -> Self {
        Self::spawn_at(name, config, Vec3::ZERO)
    }

    pub fn spawn_at(name: impl Into<String>, config: &GameConfig, spawn_point: Vec3) -> Self {
        Self {
            name: name.into(),
            controller: AnimationController::new(&config.animation),
            health: Health::new(config.max_hp),
            locomotion: Locomotion::new(&config.locomotion, spawn_point),
            clips: config.clips.clone(),
            spawn_point,
            respawn_delay: config.respawn_delay,
            dead_for: None,
            events: None,
        }
    }

    /// Publishes events on a shared channel instead of the character's own.
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Opens a channel for this character's events and returns its receiver.
    ///
    /// Events emitted while nobody listens are dropped. Subscribing again
    /// replaces the previous channel, shared or not.
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = events::channel();
        self.events = Some(tx);
        rx
    }

    /// Events sent but not yet received on the current channel.
    #[must_use]
    pub fn queued_events(&self) -> usize {
        self.events.as_ref().map_or(0, flume::Sender::len)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController {
        &mut self.controller
    }

    #[must_use]
    pub fn health(&self) -> &Health {
        &self.health
    }

    #[must_use]
    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn locomotion_mut(&mut self) -> &mut Locomotion {
        &mut self.locomotion
    }

    #[must_use]
    pub fn current_status(&self) -> PlaybackStatus {
        self.controller.current_status()
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.dead_for.is_some()
    }

    pub fn register(&mut self, clip: AnimationClip) -> Result<ClipRef> {
        self.controller.register(clip)
    }

    pub fn play(&mut self, name: &str) -> Result<Transition> {
        self.controller.play(name)
    }

    /// Steers the character and picks the matching locomotion clip:
    /// run or back-pedal while moving, idle when `direction` is `None`.
    pub fn drive(&mut self, direction: Option<Vec3>) -> Result<Transition> {
        if self.is_dead() {
            return Ok(Transition::Ignored);
        }
        let gait = direction.and_then(|d| self.locomotion.drive(d));
        let clip = match gait {
            Some(Gait::Run) => self.clips.run.clone(),
            Some(Gait::Back) => self.clips.back.clone(),
            None => {
                self.locomotion.halt();
                self.clips.idle.clone()
            }
        };
        self.controller.play(&clip)
    }

    /// Runs to `point` at the gait the direction calls for.
    pub fn move_to(&mut self, point: Vec3) -> Result<Transition> {
        if self.is_dead() {
            return Ok(Transition::Ignored);
        }
        let (gait, speed) = self.locomotion.choose_gait(point - self.locomotion.position());
        self.locomotion.move_to(point, speed);
        let clip = match gait {
            Gait::Run => self.clips.run.clone(),
            Gait::Back => self.clips.back.clone(),
        };
        self.controller.play(&clip)
    }

    /// Takes damage and plays the hit reaction. Death is picked up on the
    /// next tick.
    pub fn apply_damage(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.health.apply_damage(amount);
        self.emit(CharacterEvent::Damaged {
            character: self.name.clone(),
            hp: self.health.hp(),
        });
        if self.health.is_depleted() {
            return;
        }
        let hit = self.clips.hit.clone();
        match self.controller.play(&hit) {
            Ok(_) => {}
            Err(StriderError::ClipNotFound(_)) => {
                log::debug!("{}: no '{hit}' clip loaded yet", self.name);
            }
            Err(err) => log::warn!("{}: hit reaction failed: {err}", self.name),
        }
    }

    pub fn heal(&mut self, amount: f32) {
        self.health.heal(amount);
    }

    /// Forces death regardless of remaining health.
    pub fn kill(&mut self) {
        if self.is_dead() {
            return;
        }
        self.health.apply_damage(self.health.hp());
        self.enter_death();
    }

    fn enter_death(&mut self) {
        let death_clip = self
            .controller
            .registry()
            .contains(&self.clips.death)
            .then_some(self.clips.death.as_str());
        if let Err(err) = self.controller.die(death_clip) {
            log::warn!("{}: death clip failed: {err}", self.name);
        }
        self.locomotion.halt();
        self.dead_for = Some(0.0);
        log::info!("{} died", self.name);
        self.emit(CharacterEvent::Died {
            character: self.name.clone(),
        });
    }

    /// Brings the character back at its spawn point with full health.
    pub fn respawn(&mut self) {
        self.controller.reset();
        self.health.restore();
        self.locomotion.set_position(self.spawn_point);
        self.dead_for = None;

        let idle = self.clips.idle.clone();
        if let Err(err) = self.controller.play(&idle) {
            log::warn!("{}: respawned without idle clip: {err}", self.name);
        }
        log::info!("{} respawned", self.name);
        self.emit(CharacterEvent::Respawned {
            character: self.name.clone(),
        });
    }

    fn emit(&mut self, event: CharacterEvent) {
        let Some(events) = &self.events else {
            return;
        };
        if events.send(event).is_err() {
            log::debug!("{}: event listeners gone, closing channel", self.name);
            self.events = None;
        }
    }
}

impl Tickable for Character {
    fn tick(&mut self, dt: f32) {
        if let Some(Transition::Drained) = self.controller.tick(dt) {
            let clip = self
                .controller
                .active_pose()
                .map(|pose| pose.dominant_name().to_string())
                .unwrap_or_default();
            self.emit(CharacterEvent::TransitionDrained {
                character: self.name.clone(),
                clip,
            });
        }

        if let Some(elapsed) = self.dead_for.as_mut() {
            *elapsed += dt;
            if *elapsed >= self.respawn_delay {
                self.respawn();
            }
            return;
        }

        if self.health.is_depleted() {
            self.enter_death();
            return;
        }

        if self.locomotion.step(dt) == Step::Arrived {
            self.emit(CharacterEvent::Arrived {
                character: self.name.clone(),
            });
        }
    }
}
