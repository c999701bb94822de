pub mod pathing;

use bevy::prelude::*;
use utils::math::{horizontal_direction, horizontal_distance};
use utils::rng::GameRng;

use crate::audio::{SoundCue, SoundEvent};
use crate::character::health::{DamageEvent, Health};
use crate::character::movement::{face_towards, PlayArea, Velocity};
use crate::character::player::{damage_player, Player};

use super::{AmbientCue, Enemy, EnemyDied, EnemyState};
use pathing::NavAgent;


/// What the agent does with its body this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Hold,
    Advance { speed: f32 },
    Strike,
}

/// State transition for one tick given the horizontal distance to the target.
/// A finished hit-stun drops back to `Chase` and is re-evaluated in the same tick.
pub fn decide(state: EnemyState, enemy: &Enemy, distance: f32, now: f32) -> (EnemyState, Decision) {
    match state {
        EnemyState::Dead => return (EnemyState::Dead, Decision::Hold),
        EnemyState::HitStun { until } if now < until => return (state, Decision::Hold),
        _ => {}
    }

    let config = &enemy.config;
    if distance <= config.attack_range {
        if enemy.can_attack(now) {
            (EnemyState::Attack, Decision::Strike)
        } else {
            (EnemyState::Attack, Decision::Hold)
        }
    } else if distance <= config.run_distance {
        (EnemyState::Run, Decision::Advance { speed: config.run_speed })
    } else {
        (EnemyState::Chase, Decision::Advance { speed: config.walk_speed })
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Ignored,
    Stunned { dealt: i32 },
    Killed { dealt: i32 },
}

/// Applies one hit to an agent. Dead agents and zero-point hits are ignored.
pub fn receive_damage(
    state: &mut EnemyState,
    health: &mut Health,
    enemy: &Enemy,
    amount: i32,
    critical: bool,
    now: f32,
) -> DamageOutcome {
    if state.is_dead() {
        return DamageOutcome::Ignored;
    }
    let effective = enemy.damage_for(amount, critical);
    if effective == 0 {
        return DamageOutcome::Ignored;
    }

    let dealt = health.take_damage(effective);
    if health.is_depleted() {
        *state = EnemyState::Dead;
        DamageOutcome::Killed { dealt }
    } else {
        *state = EnemyState::HitStun { until: now + enemy.config.hit_stun_duration };
        DamageOutcome::Stunned { dealt }
    }
}


pub fn apply_enemy_damage(
    mut commands: Commands,
    time: Res<Time>,
    mut damage_events: EventReader<DamageEvent>,
    mut enemies: Query<(&Enemy, &mut EnemyState, &mut Health, &mut Velocity, Option<&mut NavAgent>)>,
    mut died: EventWriter<EnemyDied>,
    mut sounds: EventWriter<SoundEvent>,
) {
    let now = time.elapsed_secs();

    for event in damage_events.read() {
        let Ok((enemy, mut state, mut health, mut velocity, nav)) = enemies.get_mut(event.target) else {
            continue;
        };

        match receive_damage(&mut state, &mut health, enemy, event.amount, event.critical, now) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Stunned { dealt } => {
                velocity.0 = Vec3::ZERO;
                if let Some(mut nav) = nav {
                    nav.suspend();
                }
                sounds.send(SoundEvent::at(SoundCue::ZombieHit, event.target));
                debug!(
                    "Enemy {:?} took {} damage (critical: {}), health {}/{}",
                    event.target, dealt, event.critical, health.current, health.max
                );
            }
            DamageOutcome::Killed { dealt } => {
                velocity.0 = Vec3::ZERO;
                sounds.send(SoundEvent::at(SoundCue::ZombieHit, event.target));
                sounds.send(SoundEvent::at(SoundCue::ZombieDeath, event.target));
                died.send(EnemyDied { entity: event.target });
                commands.entity(event.target).despawn_recursive();
                info!("Enemy {:?} killed by a {} point hit", event.target, dealt);
            }
        }
    }
}


// State machine step: picks a decision per agent and performs strikes
pub fn enemy_think_system(
    time: Res<Time>,
    mut enemies: Query<
        (Entity, &Transform, &mut Enemy, &mut EnemyState, &mut Velocity, Option<&mut NavAgent>),
        Without<Player>,
    >,
    mut players: Query<(Entity, &Transform, &Player, &mut Health), Without<Enemy>>,
    mut sounds: EventWriter<SoundEvent>,
) {
    let Ok((player_entity, player_transform, player, mut player_health)) = players.get_single_mut() else {
        return;
    };
    let now = time.elapsed_secs();
    let target = player_transform.translation;

    for (entity, transform, mut enemy, mut state, mut velocity, mut nav) in enemies.iter_mut() {
        if state.is_dead() {
            continue;
        }

        let position = transform.translation;
        let distance = horizontal_distance(position, target);
        let was_stunned = state.is_stunned();
        let (next, decision) = match decide(*state, &enemy, distance, now) {
            // nothing left to hit, keep the cooldown untouched
            (next, Decision::Strike) if player.is_dead() => (next, Decision::Hold),
            other => other,
        };

        if was_stunned && !next.is_stunned() {
            if let Some(nav) = nav.as_mut() {
                nav.resume();
            }
            debug!("Enemy {:?} recovered from hit-stun", entity);
        }
        if *state != next {
            *state = next;
        }

        match decision {
            Decision::Hold => {
                velocity.0 = Vec3::ZERO;
                if let Some(nav) = nav.as_mut() {
                    nav.clear_destination();
                }
            }
            Decision::Advance { speed } => {
                if let Some(nav) = nav.as_mut() {
                    nav.speed = speed;
                    nav.set_destination(target);
                } else {
                    velocity.0 = horizontal_direction(position, target) * speed;
                }
            }
            Decision::Strike => {
                enemy.last_attack_time = Some(now);
                velocity.0 = Vec3::ZERO;
                if let Some(nav) = nav.as_mut() {
                    nav.clear_destination();
                }
                sounds.send(SoundEvent::at(SoundCue::ZombieAttack, entity));
                let dealt = damage_player(
                    player_entity,
                    player,
                    &mut player_health,
                    enemy.config.attack_damage,
                    &mut sounds,
                );
                debug!("Enemy {:?} struck the player for {}", entity, dealt);
            }
        }
    }
}


pub fn move_enemies(
    time: Res<Time>,
    area: Option<Res<PlayArea>>,
    mut enemies: Query<
        (&mut Transform, &Enemy, &EnemyState, &mut Velocity, Option<&NavAgent>),
        Without<Player>,
    >,
    players: Query<&Transform, (With<Player>, Without<Enemy>)>,
) {
    let dt = time.delta_secs();
    let target = players.get_single().ok().map(|t| t.translation);

    for (mut transform, enemy, state, mut velocity, nav) in enemies.iter_mut() {
        if state.is_dead() || state.is_stunned() {
            velocity.0 = Vec3::ZERO;
            continue;
        }
        if let Some(nav) = nav {
            velocity.0 = nav.velocity;
        }

        let mut next = transform.translation + velocity.0 * dt;
        if let Some(area) = area.as_ref() {
            next = area.clamp(next);
        }
        transform.translation = next;

        let facing = match target {
            Some(target) => horizontal_direction(transform.translation, target),
            None => velocity.0,
        };
        transform.rotation = face_towards(transform.rotation, facing, enemy.config.rotation_speed, dt);
    }
}


// Random scream, independent of the state machine
pub fn enemy_ambient_cue_system(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut enemies: Query<(Entity, &Enemy, &EnemyState, &mut AmbientCue)>,
    mut sounds: EventWriter<SoundEvent>,
) {
    let now = time.elapsed_secs();

    for (entity, enemy, state, mut cue) in enemies.iter_mut() {
        if state.is_dead() {
            continue;
        }
        let (low, high) = enemy.config.scream_interval;
        match cue.next_at {
            None => cue.next_at = Some(now + rng.range_f32(low, high)),
            Some(at) if now >= at => {
                sounds.send(SoundEvent::at(SoundCue::ZombieScream, entity));
                cue.next_at = Some(now + rng.range_f32(low, high));
            }
            Some(_) => {}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::enemy::config::EnemyConfig;

    fn zombie() -> Enemy {
        Enemy::new(EnemyConfig {
            max_health: 100,
            run_distance: 10.0,
            attack_range: 2.0,
            attack_cooldown: 1.5,
            hit_stun_duration: 0.5,
            headshot_multiplier: 2.0,
            ..Default::default()
        })
    }

    #[test]
    fn far_target_is_chased_at_walk_speed() {
        let enemy = zombie();
        let (state, decision) = decide(EnemyState::Chase, &enemy, 30.0, 0.0);
        assert_eq!(state, EnemyState::Chase);
        assert_eq!(decision, Decision::Advance { speed: enemy.config.walk_speed });
    }

    #[test]
    fn close_target_switches_to_run() {
        let enemy = zombie();
        let (state, decision) = decide(EnemyState::Chase, &enemy, 10.0, 0.0);
        assert_eq!(state, EnemyState::Run);
        assert_eq!(decision, Decision::Advance { speed: enemy.config.run_speed });

        let (state, _) = decide(EnemyState::Run, &enemy, 10.5, 0.0);
        assert_eq!(state, EnemyState::Chase);
    }

    #[test]
    fn in_range_strikes_then_waits_for_cooldown() {
        let mut enemy = zombie();
        let (state, decision) = decide(EnemyState::Run, &enemy, 1.5, 3.0);
        assert_eq!((state, decision), (EnemyState::Attack, Decision::Strike));

        enemy.last_attack_time = Some(3.0);
        let (state, decision) = decide(EnemyState::Attack, &enemy, 1.5, 4.0);
        assert_eq!((state, decision), (EnemyState::Attack, Decision::Hold));

        let (_, decision) = decide(EnemyState::Attack, &enemy, 1.5, 4.5);
        assert_eq!(decision, Decision::Strike);
    }

    #[test]
    fn stun_holds_until_deadline() {
        let enemy = zombie();
        let stunned = EnemyState::HitStun { until: 2.0 };
        assert_eq!(decide(stunned, &enemy, 1.0, 1.99), (stunned, Decision::Hold));

        let (state, decision) = decide(stunned, &enemy, 30.0, 2.0);
        assert_eq!(state, EnemyState::Chase);
        assert!(matches!(decision, Decision::Advance { .. }));
    }

    #[test]
    fn dead_is_terminal() {
        let enemy = zombie();
        assert_eq!(decide(EnemyState::Dead, &enemy, 0.5, 10.0), (EnemyState::Dead, Decision::Hold));
    }

    #[test]
    fn body_then_head_then_body_kills_once() {
        let enemy = zombie();
        let mut state = EnemyState::Chase;
        let mut health = Health::new(100);

        assert_eq!(receive_damage(&mut state, &mut health, &enemy, 25, false, 0.0), DamageOutcome::Stunned { dealt: 25 });
        assert_eq!(health.current, 75);
        assert_eq!(state, EnemyState::HitStun { until: 0.5 });

        assert_eq!(receive_damage(&mut state, &mut health, &enemy, 25, true, 1.0), DamageOutcome::Stunned { dealt: 50 });
        assert_eq!(health.current, 25);

        assert_eq!(receive_damage(&mut state, &mut health, &enemy, 30, false, 2.0), DamageOutcome::Killed { dealt: 25 });
        assert_eq!(health.current, 0);
        assert_eq!(state, EnemyState::Dead);

        assert_eq!(receive_damage(&mut state, &mut health, &enemy, 30, false, 3.0), DamageOutcome::Ignored);
    }

    #[test]
    fn damage_during_stun_restarts_the_window() {
        let enemy = zombie();
        let mut state = EnemyState::Chase;
        let mut health = Health::new(100);
        receive_damage(&mut state, &mut health, &enemy, 5, false, 1.0);
        receive_damage(&mut state, &mut health, &enemy, 5, false, 1.25);
        assert_eq!(state, EnemyState::HitStun { until: 1.75 });
    }

    #[test]
    fn non_positive_hits_are_ignored() {
        let enemy = zombie();
        let mut state = EnemyState::Run;
        let mut health = Health::new(100);
        assert_eq!(receive_damage(&mut state, &mut health, &enemy, 0, true, 0.0), DamageOutcome::Ignored);
        assert_eq!(receive_damage(&mut state, &mut health, &enemy, -40, false, 0.0), DamageOutcome::Ignored);
        assert_eq!(health.current, 100);
        assert_eq!(state, EnemyState::Run);
    }

    #[test]
    fn critical_damage_rounds_to_nearest() {
        let mut enemy = zombie();
        enemy.config.headshot_multiplier = 1.5;
        assert_eq!(enemy.damage_for(25, true), 38);
        assert_eq!(enemy.damage_for(25, false), 25);
        enemy.config.headshot_multiplier = 1.3;
        assert_eq!(enemy.damage_for(10, true), 13);
    }
}
