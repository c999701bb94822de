use bevy::prelude::*;

use crate::character::health::{Health, HealthConfig, HitZone, Hitbox};

use super::Player;

/// Where and how the local player enters the game.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerStart {
    pub position: Vec3,
    pub health: HealthConfig,
}

pub fn create_player(commands: &mut Commands, health: HealthConfig, translation: Vec3) -> Entity {
    let entity = commands
        .spawn((
            Transform::from_translation(translation),
            Visibility::default(),
            Player::default(),
            Health::from(health),
        ))
        .id();

    commands.entity(entity).insert(Hitbox { owner: entity, zone: HitZone::Body });

    info!("Adding player {:?} at {}", entity, translation);

    entity
}
