pub mod ai;
pub mod config;
pub mod create;
pub mod ground;
pub mod spawning;
pub mod spawning_ring;


use bevy::prelude::*;
use utils::math::scale_round;

use config::EnemyConfig;


#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub config: EnemyConfig,
    pub last_attack_time: Option<f32>,
}

impl Enemy {
    pub fn new(config: EnemyConfig) -> Self {
        Self { config, last_attack_time: None }
    }

    /// Hit points a hit of `amount` removes. Critical hits are scaled by the
    /// headshot multiplier and rounded to the nearest integer.
    pub fn damage_for(&self, amount: i32, critical: bool) -> i32 {
        let amount = amount.max(0);
        if critical {
            scale_round(amount, self.config.headshot_multiplier).max(0)
        } else {
            amount
        }
    }

    pub fn can_attack(&self, now: f32) -> bool {
        match self.last_attack_time {
            None => true,
            Some(last) => now - last >= self.config.attack_cooldown,
        }
    }
}


#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub enum EnemyState {
    #[default]
    Chase,
    Run,
    Attack,
    HitStun { until: f32 },
    Dead,
}

impl EnemyState {
    pub fn is_dead(&self) -> bool {
        matches!(self, EnemyState::Dead)
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self, EnemyState::HitStun { .. })
    }
}


/// Schedules the random scream. `None` until the first tick sees the agent.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AmbientCue {
    pub next_at: Option<f32>,
}


#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDied {
    pub entity: Entity,
}
