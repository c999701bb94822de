use bevy::prelude::*;
use serde::Deserialize;
use utils::math::ground_offset;
use utils::rng::GameRng;

use crate::character::movement::PlayArea;
use crate::config::ConfigError;

use super::ground::{GroundHit, GroundProbe};
use super::spawning::{EnemySpawnState, EnemySpawnSystem, SpawnPlacement};


// Implementation for spawning on a ring around the player

#[derive(Asset, TypePath, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnDirectorConfig {
    pub max_population: u32,        // Maximum number of zombies alive at once
    pub start_spawn_interval: f32,  // Seconds between spawns at the start
    pub min_spawn_interval: f32,    // Floor for the ramp
    pub interval_decay_step: f32,   // Seconds removed from the interval per ramp step
    pub decay_every: u32,           // Spawns between ramp steps
    pub min_distance_from_reference: f32,
    pub max_distance_from_reference: f32,
    pub spawn_height: f32,          // Lift above the ground hit
    pub probe_height: f32,
    pub probe_distance: f32,
    pub ground_layer: Option<u32>,
    pub min_ground_normal_y: Option<f32>,
    pub max_attempts: u32,
    pub area_center: Vec3,
    pub area_radius: Option<f32>,
    pub fallback_extent: f32,
}

impl Default for SpawnDirectorConfig {
    fn default() -> Self {
        Self {
            max_population: 20,
            start_spawn_interval: 5.0,
            min_spawn_interval: 1.0,
            interval_decay_step: 0.5,
            decay_every: 5,
            min_distance_from_reference: 15.0,
            max_distance_from_reference: 30.0,
            spawn_height: 0.0,
            probe_height: 100.0,
            probe_distance: 200.0,
            ground_layer: None,
            min_ground_normal_y: None,
            max_attempts: 30,
            area_center: Vec3::ZERO,
            area_radius: None,
            fallback_extent: 20.0,
        }
    }
}

impl SpawnDirectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_population == 0 {
            return Err(ConfigError::invalid("spawner.max_population", "must be at least 1"));
        }
        if self.min_spawn_interval <= 0.0 {
            return Err(ConfigError::invalid("spawner.min_spawn_interval", "must be positive"));
        }
        if self.start_spawn_interval < self.min_spawn_interval {
            return Err(ConfigError::invalid(
                "spawner.start_spawn_interval",
                format!("{} is below the minimum of {}", self.start_spawn_interval, self.min_spawn_interval),
            ));
        }
        if self.interval_decay_step < 0.0 {
            return Err(ConfigError::invalid("spawner.interval_decay_step", "must not be negative"));
        }
        if self.decay_every == 0 {
            return Err(ConfigError::invalid("spawner.decay_every", "must be at least 1"));
        }
        if self.min_distance_from_reference < 0.0 {
            return Err(ConfigError::invalid("spawner.min_distance_from_reference", "must not be negative"));
        }
        if self.max_distance_from_reference < self.min_distance_from_reference {
            return Err(ConfigError::invalid(
                "spawner.max_distance_from_reference",
                format!(
                    "{} is below min_distance_from_reference {}",
                    self.max_distance_from_reference, self.min_distance_from_reference
                ),
            ));
        }
        if self.probe_distance < 0.0 {
            return Err(ConfigError::invalid("spawner.probe_distance", "must not be negative"));
        }
        if let Some(radius) = self.area_radius {
            if radius <= 0.0 {
                return Err(ConfigError::invalid("spawner.area_radius", "must be positive"));
            }
        }
        if self.fallback_extent < 0.0 {
            return Err(ConfigError::invalid("spawner.fallback_extent", "must not be negative"));
        }
        Ok(())
    }
}


pub struct RingSpawnSystem {
    config: SpawnDirectorConfig,
}

impl RingSpawnSystem {
    pub fn new(config: SpawnDirectorConfig) -> Self {
        Self { config }
    }

    fn accepts(&self, hit: &GroundHit) -> bool {
        if let Some(layer) = self.config.ground_layer {
            if hit.layer != layer {
                return false;
            }
        }
        match self.config.min_ground_normal_y {
            Some(min_y) => hit.normal.y > min_y,
            None => true,
        }
    }

    fn in_area(&self, candidate: Vec3, area: Option<&PlayArea>) -> bool {
        if area.is_some_and(|area| !area.contains(candidate)) {
            return false;
        }
        match self.config.area_radius {
            Some(radius) => {
                let offset = candidate - self.config.area_center;
                Vec2::new(offset.x, offset.z).length() <= radius
            }
            None => true,
        }
    }

    fn fallback(&self, rng: &mut GameRng, area: Option<&PlayArea>) -> Vec3 {
        let extent = self.config.fallback_extent;
        let position = self.config.area_center
            + Vec3::new(
                rng.next_f32_symmetric() * extent,
                self.config.spawn_height,
                rng.next_f32_symmetric() * extent,
            );
        match area {
            Some(area) => area.clamp(position),
            None => position,
        }
    }
}

impl EnemySpawnSystem for RingSpawnSystem {
    fn initial_state(&self) -> EnemySpawnState {
        EnemySpawnState::new(self.config.start_spawn_interval)
    }

    fn has_room(&self, state: &EnemySpawnState) -> bool {
        state.population < self.config.max_population
    }

    fn record_spawn(&self, state: &mut EnemySpawnState) {
        state.total_spawned += 1;
        state.population += 1;

        // decay_every == 0 never ramps
        if state.total_spawned.checked_rem(self.config.decay_every) == Some(0) {
            let next = (state.current_interval - self.config.interval_decay_step)
                .max(self.config.min_spawn_interval);
            if next < state.current_interval {
                info!("Spawn interval ramped to {:.2}s after {} spawns", next, state.total_spawned);
            }
            state.current_interval = next;
        }
    }

    fn calculate_spawn_position(
        &self,
        rng: &mut GameRng,
        reference: Vec3,
        ground: Option<&dyn GroundProbe>,
        area: Option<&PlayArea>,
    ) -> SpawnPlacement {
        let config = &self.config;

        for _ in 0..config.max_attempts {
            let angle = rng.angle();
            let distance = rng.range_f32(config.min_distance_from_reference, config.max_distance_from_reference);
            let candidate = reference + ground_offset(angle, distance);

            if !self.in_area(candidate, area) {
                continue;
            }

            let Some(ground) = ground else {
                return SpawnPlacement::Ring(candidate + Vec3::Y * config.spawn_height);
            };

            let origin = candidate + Vec3::Y * config.probe_height;
            match ground.cast_down(origin, config.probe_distance) {
                Some(hit) if self.accepts(&hit) => {
                    return SpawnPlacement::Ring(hit.point + Vec3::Y * config.spawn_height);
                }
                _ => {}
            }
        }

        let position = self.fallback(rng, area);
        debug!(
            "No valid ground found after {} attempts, falling back to {}",
            config.max_attempts, position
        );
        SpawnPlacement::Fallback(position)
    }
}
