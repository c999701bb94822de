pub mod create;

use bevy::prelude::*;

use crate::audio::{SoundCue, SoundEvent};
use crate::character::health::{DamageEvent, Health};


/// The survivor. Death is latched: once `dead_since` is set it never clears.
#[derive(Component, Reflect, Default, Debug, Copy, Clone, PartialEq)]
#[reflect(Component)]
pub struct Player {
    pub dead_since: Option<f32>,
}

impl Player {
    pub fn is_dead(&self) -> bool {
        self.dead_since.is_some()
    }
}


#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PlayerDied {
    pub entity: Entity,
    pub at: f32,
}


/// Applies a hit to a living player and emits the hurt cue. Returns the points removed.
pub fn damage_player(
    entity: Entity,
    player: &Player,
    health: &mut Health,
    amount: i32,
    sounds: &mut EventWriter<SoundEvent>,
) -> i32 {
    if player.is_dead() {
        return 0;
    }
    let dealt = health.take_damage(amount);
    if dealt > 0 {
        sounds.send(SoundEvent::at(SoundCue::PlayerHurt, entity));
    }
    dealt
}

/// Heals a living player. Dead players stay at zero.
pub fn heal_player(player: &Player, health: &mut Health, amount: i32) -> i32 {
    if player.is_dead() {
        return 0;
    }
    health.heal(amount)
}


// Damage addressed to the player from anything other than a zombie strike
pub fn apply_player_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut players: Query<(&Player, &mut Health)>,
    mut sounds: EventWriter<SoundEvent>,
) {
    for event in damage_events.read() {
        if let Ok((player, mut health)) = players.get_mut(event.target) {
            damage_player(event.target, player, &mut health, event.amount, &mut sounds);
        }
    }
}

pub fn player_death_system(
    time: Res<Time>,
    mut players: Query<(Entity, &mut Player, &Health)>,
    mut died: EventWriter<PlayerDied>,
    mut sounds: EventWriter<SoundEvent>,
) {
    let now = time.elapsed_secs();

    for (entity, mut player, health) in players.iter_mut() {
        if player.is_dead() || !health.is_depleted() {
            continue;
        }
        player.dead_since = Some(now);
        died.send(PlayerDied { entity, at: now });
        sounds.send(SoundEvent::global(SoundCue::GameOver));
        info!("Player {:?} died after {:.1}s", entity, now);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_is_ignored_after_death() {
        let mut health = Health::new(100);
        let alive = Player::default();
        health.take_damage(60);
        assert_eq!(heal_player(&alive, &mut health, 30), 30);

        let dead = Player { dead_since: Some(4.0) };
        assert_eq!(heal_player(&dead, &mut health, 30), 0);
        assert_eq!(health.current, 70);
    }
}
