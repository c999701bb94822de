use bevy::prelude::*;

use crate::character::{
    health::{Health, HitZone, Hitbox},
    movement::Velocity,
};

use super::{ai::pathing::NavAgent, config::EnemyConfig, AmbientCue, Enemy, EnemyState};

// Head collider sits on top of a ~1.8 unit tall body
const HEAD_OFFSET: Vec3 = Vec3::new(0.0, 1.6, 0.0);

pub fn spawn_enemy(commands: &mut Commands, config: &EnemyConfig, position: Vec3) -> Entity {
    let mut entity = commands.spawn((
        Transform::from_translation(position),
        Visibility::default(),
        Enemy::new(config.clone()),
        EnemyState::default(),
        Health::new(config.max_health),
        Velocity(Vec3::ZERO),
        AmbientCue::default(),
    ));

    if config.use_navigation {
        entity.insert(NavAgent::new(config.walk_speed));
    }

    let entity = entity.id();

    commands.entity(entity)
        .insert(Hitbox { owner: entity, zone: HitZone::Body })
        .with_children(|parent| {
            parent.spawn((
                Transform::from_translation(HEAD_OFFSET),
                Hitbox { owner: entity, zone: HitZone::Head },
            ));
        });

    entity
}
