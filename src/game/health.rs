/// Hit points of a character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    hp: f32,
    max_hp: f32,
}

impl Health {
    #[must_use]
    pub fn new(max_hp: f32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    #[must_use]
    pub fn hp(&self) -> f32 {
        self.hp
    }

    #[must_use]
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    /// Remaining health in `0.0..=1.0`, for health bars.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    /// Returns `true` if this hit emptied the health pool.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        let was_depleted = self.is_depleted();
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        !was_depleted && self.is_depleted()
    }

    /// Heals up to `max_hp`. Dead characters are not healed.
    pub fn heal(&mut self, amount: f32) {
        if !self.is_depleted() {
            self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
        }
    }

    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }
}
