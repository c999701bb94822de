use bevy::{asset::LoadState, prelude::*};

use crate::{
    character::enemy::{
        config::EnemyConfig,
        spawning::EnemySpawner,
        spawning_ring::SpawnDirectorConfig,
    },
    plugins::AppState,
};

const ENEMY_CONFIG_PATH: &str = "config/zombie.enemy.ron";
const SPAWNER_CONFIG_PATH: &str = "config/director.spawner.ron";


#[derive(Resource)]
pub struct GlobalAsset {
    pub enemy: Handle<EnemyConfig>,
    pub spawner: Handle<SpawnDirectorConfig>,
}

impl GlobalAsset {
    pub fn create(asset_server: &AssetServer) -> Self {
        Self {
            enemy: asset_server.load(ENEMY_CONFIG_PATH),
            spawner: asset_server.load(SPAWNER_CONFIG_PATH),
        }
    }
}

pub fn add_global_asset(mut commands: Commands, asset_server: Res<AssetServer>) {
    let global_asset = GlobalAsset::create(&asset_server);

    commands.insert_resource(global_asset);
}

pub fn loading_asset_system(
    mut commands: Commands,
    mut app_state: ResMut<NextState<AppState>>,
    global_assets: Res<GlobalAsset>,
    asset_server: Res<AssetServer>,
    enemy_configs: Res<Assets<EnemyConfig>>,
    spawner_configs: Res<Assets<SpawnDirectorConfig>>,
) {
    for id in [global_assets.enemy.id().untyped(), global_assets.spawner.id().untyped()] {
        let state = asset_server.load_state(id);
        if matches!(state, LoadState::Failed(_)) {
            error!("could not load config asset {:?}, keeping defaults", id);
            continue;
        }
        if !state.is_loaded() {
            return;
        }
    }

    if let Some(config) = enemy_configs.get(&global_assets.enemy) {
        match config.validate() {
            Ok(()) => commands.insert_resource(config.clone()),
            Err(err) => error!("{ENEMY_CONFIG_PATH}: {err}, keeping defaults"),
        }
    }

    if let Some(config) = spawner_configs.get(&global_assets.spawner) {
        match config.validate() {
            Ok(()) => {
                let spawner = EnemySpawner::ring(config.clone());
                commands.insert_resource(spawner.system().initial_state());
                commands.insert_resource(spawner);
            }
            Err(err) => error!("{SPAWNER_CONFIG_PATH}: {err}, keeping defaults"),
        }
    }

    app_state.set(AppState::InGame);
    info!("loading of asset is done, now entering game");
}
