use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use utils::rng::GameRng;

use crate::{
    audio::{SoundEvent, ZAudioPlugin},
    character::{
        enemy::{
            ai::{
                apply_enemy_damage, enemy_ambient_cue_system, enemy_think_system, move_enemies,
                pathing::{calculate_paths, steer_agents, NavGrid},
            },
            config::EnemyConfig,
            ground::{FlatGround, Ground},
            spawning::{enemy_spawn_system, stop_spawning_on_player_death, track_enemy_deaths, EnemySpawner},
            spawning_ring::SpawnDirectorConfig,
            EnemyDied,
        },
        health::DamageEvent,
        player::{apply_player_damage, create::{create_player, PlayerStart}, player_death_system, PlayerDied},
    },
    config::SessionConfig,
    frame::{advance_game_timer, GameTimer},
    global_asset::{add_global_asset, loading_asset_system},
};

// Navigation grid resolution when the session has a play area
const NAV_CELL_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    InGame,
}

/// Per-tick phases, run in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZombieSet {
    Damage,
    Think,
    Navigate,
    Move,
    Resolve,
}


/// Headless gameplay core: events, resources and the ordered `Update` systems.
/// The host spawns the player and provides a `Ground` if it wants probing.
pub struct ZombieCorePlugin {
    pub session: SessionConfig,
    pub seed: Option<u32>,
}

impl ZombieCorePlugin {
    pub fn new(session: SessionConfig) -> Self {
        Self { session, seed: None }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Plugin for ZombieCorePlugin {
    fn build(&self, app: &mut App) {
        let fallback;
        let session = match self.session.validate() {
            Ok(()) => &self.session,
            Err(err) => {
                error!("Invalid session config, using defaults: {}", err);
                fallback = SessionConfig::default();
                &fallback
            }
        };

        app.add_event::<DamageEvent>()
            .add_event::<EnemyDied>()
            .add_event::<PlayerDied>()
            .add_event::<SoundEvent>();

        let spawner = EnemySpawner::ring(session.spawner.clone());
        app.insert_resource(spawner.system().initial_state())
            .insert_resource(spawner)
            .insert_resource(session.enemy.clone())
            .insert_resource(session.pathfinding.clone())
            .insert_resource(match self.seed {
                Some(seed) => GameRng::new(seed),
                None => GameRng::from_entropy(),
            })
            .init_resource::<GameTimer>();

        if let Some(area) = session.play_area.clone() {
            if session.enemy.use_navigation {
                app.insert_resource(NavGrid::covering(&area, NAV_CELL_SIZE));
            }
            app.insert_resource(area);
        }

        app.configure_sets(
            Update,
            (
                ZombieSet::Damage,
                ZombieSet::Think,
                ZombieSet::Navigate,
                ZombieSet::Move,
                ZombieSet::Resolve,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                (apply_enemy_damage, apply_player_damage).in_set(ZombieSet::Damage),
                (enemy_think_system, enemy_ambient_cue_system).in_set(ZombieSet::Think),
                (calculate_paths, steer_agents).chain().in_set(ZombieSet::Navigate),
                move_enemies.in_set(ZombieSet::Move),
                (
                    player_death_system,
                    advance_game_timer,
                    track_enemy_deaths,
                    stop_spawning_on_player_death,
                    enemy_spawn_system,
                )
                    .chain()
                    .in_set(ZombieSet::Resolve),
            ),
        );
    }
}


/// Full game wiring: RON config assets, audio and the loading state.
pub struct BaseZombieGamePlugin {
    session: SessionConfig,
}

impl BaseZombieGamePlugin {
    pub fn new(session: SessionConfig) -> Self {
        Self { session }
    }
}

impl Plugin for BaseZombieGamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ZAudioPlugin {});

        app.add_plugins((
            RonAssetPlugin::<EnemyConfig>::new(&["enemy.ron"]),
            RonAssetPlugin::<SpawnDirectorConfig>::new(&["spawner.ron"]),
        ));

        app.init_state::<AppState>();

        app.add_plugins(ZombieCorePlugin::new(self.session.clone()));
        app.insert_resource(Ground::new(FlatGround::default()));
        app.insert_resource(PlayerStart {
            position: Vec3::ZERO,
            health: self.session.player.clone(),
        });

        for set in [
            ZombieSet::Damage,
            ZombieSet::Think,
            ZombieSet::Navigate,
            ZombieSet::Move,
            ZombieSet::Resolve,
        ] {
            app.configure_sets(Update, set.run_if(in_state(AppState::InGame)));
        }

        app.add_systems(Startup, add_global_asset);
        app.add_systems(Update, loading_asset_system.run_if(in_state(AppState::Loading)));
        app.add_systems(OnEnter(AppState::InGame), spawn_local_player);
    }
}

fn spawn_local_player(mut commands: Commands, start: Res<PlayerStart>) {
    create_player(&mut commands, start.health.clone(), start.position);
}
