use glam::Vec3;

use crate::config::LocomotionSettings;

/// How the character moves relative to where it is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    /// Moving roughly the way it faces.
    Run,
    /// Backing away while still facing forward.
    Back,
}

/// What one integration step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    Moved,
    /// Reached the `move_to` target this step.
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Still,
    Heading { direction: Vec3, speed: f32 },
    Target { point: Vec3, speed: f32 },
}

/// World pose and movement integration for a character.
#[derive(Debug, Clone)]
pub struct Locomotion {
    settings: LocomotionSettings,
    position: Vec3,
    look_point: Vec3,
    motion: Motion,
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

impl Locomotion {
    #[must_use]
    pub fn new(settings: &LocomotionSettings, position: Vec3) -> Self {
        Self {
            settings: settings.clone(),
            position,
            look_point: position + Vec3::NEG_Z,
            motion: Motion::Still,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.motion = Motion::Still;
    }

    #[must_use]
    pub fn look_point(&self) -> Vec3 {
        self.look_point
    }

    pub fn look_at(&mut self, point: Vec3) {
        self.look_point = point;
    }

    /// Unit facing vector on the ground plane, `None` when looking straight down.
    #[must_use]
    pub fn facing(&self) -> Option<Vec3> {
        flatten(self.look_point - self.position).try_normalize()
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion != Motion::Still
    }

    /// Picks run or back-pedal from the angle between facing and `direction`.
    #[must_use]
    pub fn choose_gait(&self, direction: Vec3) -> (Gait, f32) {
        let angle = match (self.facing(), flatten(direction).try_normalize()) {
            (Some(facing), Some(direction)) => facing.angle_between(direction).to_degrees(),
            _ => 0.0,
        };
        if angle <= self.settings.back_angle_degrees {
            (Gait::Run, self.settings.forward_speed)
        } else {
            (Gait::Back, self.settings.back_speed)
        }
    }

    /// Starts moving along `direction` until told otherwise.
    ///
    /// Returns `None` (and stops) for a zero direction.
    pub fn drive(&mut self, direction: Vec3) -> Option<Gait> {
        let Some(unit) = flatten(direction).try_normalize() else {
            self.halt();
            return None;
        };
        let (gait, speed) = self.choose_gait(unit);
        self.motion = Motion::Heading {
            direction: unit,
            speed,
        };
        Some(gait)
    }

    /// Walks towards `point` at `speed` units per second.
    pub fn move_to(&mut self, point: Vec3, speed: f32) {
        self.motion = Motion::Target { point, speed };
    }

    pub fn halt(&mut self) {
        self.motion = Motion::Still;
    }

    pub fn step(&mut self, dt: f32) -> Step {
        match self.motion {
            Motion::Still => Step::Idle,
            Motion::Heading { direction, speed } => {
                self.position += direction * speed * dt;
                Step::Moved
            }
            Motion::Target { point, speed } => {
                let offset = point - self.position;
                let distance = offset.length();
                let travel = speed * dt;
                if distance - travel <= self.settings.arrive_epsilon {
                    self.position = point;
                    self.motion = Motion::Still;
                    Step::Arrived
                } else {
                    self.position += offset / distance * travel;
                    Step::Moved
                }
            }
        }
    }
}
