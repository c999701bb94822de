use bevy::prelude::*;
use utils::rng::GameRng;

use crate::character::movement::PlayArea;
use crate::character::player::Player;

use super::config::EnemyConfig;
use super::create::spawn_enemy;
use super::ground::{Ground, GroundProbe};
use super::spawning_ring::{RingSpawnSystem, SpawnDirectorConfig};
use super::EnemyDied;


/// Where a spawn landed. `Fallback` means no candidate on the ring passed the ground checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPlacement {
    Ring(Vec3),
    Fallback(Vec3),
}

impl SpawnPlacement {
    pub fn position(&self) -> Vec3 {
        match self {
            SpawnPlacement::Ring(position) | SpawnPlacement::Fallback(position) => *position,
        }
    }
}


pub trait EnemySpawnSystem: Send + Sync + 'static {
    fn initial_state(&self) -> EnemySpawnState;

    fn has_room(&self, state: &EnemySpawnState) -> bool;

    /// Bookkeeping after an agent was created, including the difficulty ramp.
    fn record_spawn(&self, state: &mut EnemySpawnState);

    /// Candidates outside `area` are rejected, so a new agent is never
    /// clamped onto the boundary on its first move.
    fn calculate_spawn_position(
        &self,
        rng: &mut GameRng,
        reference: Vec3,
        ground: Option<&dyn GroundProbe>,
        area: Option<&PlayArea>,
    ) -> SpawnPlacement;
}


#[derive(Resource)]
pub struct EnemySpawner(Box<dyn EnemySpawnSystem>);

impl EnemySpawner {
    pub fn new(system: impl EnemySpawnSystem) -> Self {
        Self(Box::new(system))
    }

    pub fn ring(config: SpawnDirectorConfig) -> Self {
        Self::new(RingSpawnSystem::new(config))
    }

    pub fn system(&self) -> &dyn EnemySpawnSystem {
        self.0.as_ref()
    }
}


#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EnemySpawnState {
    pub current_interval: f32,
    /// `None` until the first tick schedules it, and again once stopped.
    pub next_spawn_at: Option<f32>,
    pub total_spawned: u32,
    pub population: u32,
    pub stopped: bool,
}

impl EnemySpawnState {
    pub fn new(start_interval: f32) -> Self {
        Self {
            current_interval: start_interval,
            next_spawn_at: None,
            total_spawned: 0,
            population: 0,
            stopped: false,
        }
    }

    pub fn stop(&mut self) {
        self.next_spawn_at = None;
        self.stopped = true;
    }
}


pub fn track_enemy_deaths(
    mut died: EventReader<EnemyDied>,
    mut state: ResMut<EnemySpawnState>,
) {
    for _ in died.read() {
        state.population = state.population.saturating_sub(1);
    }
}

pub fn stop_spawning_on_player_death(
    mut state: ResMut<EnemySpawnState>,
    players: Query<&Player>,
) {
    if state.stopped {
        return;
    }
    let Ok(player) = players.get_single() else {
        return;
    };
    if player.is_dead() {
        state.stop();
        info!(
            "Player is dead, spawner stopped after {} zombies ({} alive)",
            state.total_spawned, state.population
        );
    }
}

// Main spawn system that delegates to the configured spawn system
pub fn enemy_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    spawner: Res<EnemySpawner>,
    enemy_config: Res<EnemyConfig>,
    ground: Option<Res<Ground>>,
    area: Option<Res<PlayArea>>,
    mut state: ResMut<EnemySpawnState>,
    mut rng: ResMut<GameRng>,
    players: Query<(&Transform, &Player)>,
) {
    if state.stopped {
        return;
    }
    let Ok((player_transform, player)) = players.get_single() else {
        return;
    };
    if player.is_dead() {
        return;
    }

    let now = time.elapsed_secs();
    let Some(deadline) = state.next_spawn_at else {
        state.next_spawn_at = Some(now + state.current_interval);
        return;
    };
    if now < deadline {
        return;
    }

    let system = spawner.system();
    if system.has_room(&state) {
        let placement = system.calculate_spawn_position(
            &mut rng,
            player_transform.translation,
            ground.as_ref().map(|g| g.probe()),
            area.as_deref(),
        );
        let entity = spawn_enemy(&mut commands, &enemy_config, placement.position());
        system.record_spawn(&mut state);
        debug!(
            "Spawned zombie {:?} at {:?} ({} alive, {} total)",
            entity, placement, state.population, state.total_spawned
        );
    } else {
        debug!("Population cap reached ({}), skipping spawn", state.population);
    }

    state.next_spawn_at = Some(now + state.current_interval);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_latched_and_idempotent() {
        let mut state = EnemySpawnState::new(5.0);
        state.next_spawn_at = Some(12.0);
        state.stop();
        assert!(state.stopped);
        assert_eq!(state.next_spawn_at, None);
        state.stop();
        assert!(state.stopped);
    }

    #[test]
    fn placement_exposes_its_position() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(SpawnPlacement::Ring(p).position(), p);
        assert_eq!(SpawnPlacement::Fallback(p).position(), p);
    }
}
