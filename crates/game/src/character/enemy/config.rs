use bevy::{prelude::*, reflect::TypePath};
use serde::Deserialize;

use crate::config::ConfigError;


/// Tunables for one zombie archetype. Every spawned agent carries its own copy.
#[derive(Asset, Resource, TypePath, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: i32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub run_distance: f32,     // Start running once the target is this close
    pub attack_range: f32,
    pub rotation_speed: f32,   // Slerp factor per second
    pub attack_damage: i32,
    pub attack_cooldown: f32,  // Seconds between two strikes
    pub hit_stun_duration: f32,
    pub headshot_multiplier: f32,
    pub scream_interval: (f32, f32), // Uniform range of seconds between two screams
    pub use_navigation: bool,  // Route around obstacles instead of walking straight
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            walk_speed: 3.0,
            run_speed: 6.0,
            run_distance: 10.0,
            attack_range: 2.0,
            rotation_speed: 5.0,
            attack_damage: 10,
            attack_cooldown: 1.5,
            hit_stun_duration: 0.5,
            headshot_multiplier: 2.0,
            scream_interval: (3.0, 8.0),
            use_navigation: false,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health <= 0 {
            return Err(ConfigError::invalid("enemy.max_health", "must be positive"));
        }
        if self.walk_speed < 0.0 || self.run_speed < 0.0 {
            return Err(ConfigError::invalid("enemy.walk_speed", "speeds must not be negative"));
        }
        if self.attack_range < 0.0 || self.run_distance < 0.0 {
            return Err(ConfigError::invalid("enemy.attack_range", "distances must not be negative"));
        }
        if self.attack_damage < 0 {
            return Err(ConfigError::invalid("enemy.attack_damage", "must not be negative"));
        }
        if self.attack_cooldown < 0.0 || self.hit_stun_duration < 0.0 {
            return Err(ConfigError::invalid("enemy.attack_cooldown", "durations must not be negative"));
        }
        if self.headshot_multiplier < 0.0 {
            return Err(ConfigError::invalid("enemy.headshot_multiplier", "must not be negative"));
        }
        let (low, high) = self.scream_interval;
        if low <= 0.0 || high < low {
            return Err(ConfigError::invalid(
                "enemy.scream_interval",
                format!("expected 0 < min <= max, got ({low}, {high})"),
            ));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EnemyConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_reversed_scream_interval() {
        let config = EnemyConfig { scream_interval: (8.0, 3.0), ..default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "enemy.scream_interval", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_health() {
        let config = EnemyConfig { max_health: 0, ..default() };
        assert!(config.validate().is_err());
    }
}
