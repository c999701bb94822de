use bevy::prelude::*;
use serde::{Deserialize, Serialize};


#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthConfig {
    pub max: i32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { max: 100 }
    }
}


/// Integer hit points. `current` stays within `0..=max`.
#[derive(Component, Reflect, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[reflect(Component)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Removes up to `amount` points and returns how many were removed.
    /// Negative amounts count as zero.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let before = self.current;
        self.current = self.current.saturating_sub(amount).max(0);
        before - self.current
    }

    /// Restores up to `amount` points without exceeding `max`; returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl From<HealthConfig> for Health {
    fn from(value: HealthConfig) -> Self {
        Self::new(value.max)
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum HitZone {
    Body,
    Head,
}

/// Collider region of a damageable actor. Attached once when the actor is
/// built; the weapon side never has to look the owner up again.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    pub owner: Entity,
    pub zone: HitZone,
}

impl Hitbox {
    pub fn hit(&self, amount: i32) -> DamageEvent {
        DamageEvent {
            target: self.owner,
            amount,
            critical: self.zone == HitZone::Head,
        }
    }
}

/// Damage request addressed to an actor. `critical` hits are scaled by the
/// receiver's own multiplier.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: i32,
    pub critical: bool,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut health = Health::new(30);
        assert_eq!(health.take_damage(12), 12);
        assert_eq!(health.current, 18);
        assert_eq!(health.take_damage(50), 18);
        assert_eq!(health.current, 0);
        assert!(health.is_depleted());
        assert_eq!(health.take_damage(5), 0);
    }

    #[test]
    fn negative_damage_never_heals() {
        let mut health = Health::new(100);
        health.take_damage(40);
        assert_eq!(health.take_damage(-25), 0);
        assert_eq!(health.current, 60);
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut health = Health::new(100);
        health.take_damage(30);
        assert_eq!(health.heal(10), 10);
        assert_eq!(health.heal(100), 20);
        assert_eq!(health.current, 100);
        assert_eq!(health.heal(-5), 0);
    }

    #[test]
    fn extreme_amounts_do_not_overflow() {
        let mut health = Health::new(10);
        assert_eq!(health.take_damage(i32::MAX), 10);
        assert_eq!(health.heal(i32::MAX), 10);
    }

    #[test]
    fn head_hitbox_produces_critical_damage() {
        let owner = Entity::from_raw(7);
        let head = Hitbox { owner, zone: HitZone::Head };
        let body = Hitbox { owner, zone: HitZone::Body };

        assert_eq!(head.hit(25), DamageEvent { target: owner, amount: 25, critical: true });
        assert_eq!(body.hit(25), DamageEvent { target: owner, amount: 25, critical: false });
    }
}
