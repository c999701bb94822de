use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimePlugin;
use game::{
    character::{
        enemy::{
            ground::{FlatGround, Ground},
            spawning::EnemySpawnState,
            Enemy, EnemyDied,
        },
        health::{DamageEvent, Health, HitZone, Hitbox},
        player::{
            create::{create_player, PlayerStart},
            Player,
        },
    },
    config::{load_session_config, ConfigError, SessionConfig},
    frame::GameTimer,
    plugins::{ZombieCorePlugin, ZombieSet},
};
use serde::Serialize;
use thiserror::Error;
use utils::{math::horizontal_distance, rng::GameRng};

use crate::args::SimulateArgs;


#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid argument `{name}`: {reason}")]
    Argument { name: &'static str, reason: String },
    #[error("could not encode report: {0}")]
    Report(#[from] serde_json::Error),
}

impl RunError {
    fn argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Argument { name, reason: reason.into() }
    }
}


#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub seed: u32,
    pub simulated_seconds: f32,
    pub survived: String,
    pub player_dead: bool,
    pub player_health: i32,
    pub shots: u32,
    pub headshots: u32,
    pub kills: u32,
    pub total_spawned: u32,
    pub alive_at_end: u32,
    pub peak_population: u32,
    pub final_spawn_interval: f32,
    pub spawning_stopped: bool,
}


/// Stationary gun on the player's position, always aiming at the nearest zombie.
#[derive(Resource, Debug, Clone)]
struct Turret {
    damage: i32,
    interval: f32,
    range: f32,
    headshot_chance: f32,
    next_shot_at: f32,
}

#[derive(Resource, Debug, Default)]
struct SimulationStats {
    shots: u32,
    headshots: u32,
    kills: u32,
    peak_population: u32,
}


fn spawn_survivor(mut commands: Commands, start: Res<PlayerStart>) {
    create_player(&mut commands, start.health.clone(), start.position);
}

fn turret_fire(
    time: Res<Time>,
    mut turret: ResMut<Turret>,
    mut rng: ResMut<GameRng>,
    mut stats: ResMut<SimulationStats>,
    players: Query<(&Transform, &Player)>,
    enemies: Query<(&Transform, &Hitbox, Option<&Children>), With<Enemy>>,
    hitboxes: Query<&Hitbox, Without<Enemy>>,
    mut damage: EventWriter<DamageEvent>,
) {
    let now = time.elapsed_secs();
    if now < turret.next_shot_at {
        return;
    }
    let Ok((origin, player)) = players.get_single() else {
        return;
    };
    if player.is_dead() {
        return;
    }

    let target = enemies
        .iter()
        .map(|(transform, body, children)| {
            (horizontal_distance(origin.translation, transform.translation), body, children)
        })
        .filter(|(distance, _, _)| *distance <= turret.range)
        .min_by(|a, b| a.0.total_cmp(&b.0));
    let Some((_, body, children)) = target else {
        return;
    };

    let head = children.and_then(|children| {
        children
            .iter()
            .filter_map(|child| hitboxes.get(*child).ok())
            .find(|hitbox| hitbox.zone == HitZone::Head)
    });
    let hitbox = match head {
        Some(head) if rng.next_f32() < turret.headshot_chance => {
            stats.headshots += 1;
            head
        }
        _ => body,
    };

    damage.send(hitbox.hit(turret.damage));
    stats.shots += 1;
    turret.next_shot_at = now + turret.interval;
}

fn record_stats(
    mut died: EventReader<EnemyDied>,
    state: Res<EnemySpawnState>,
    mut stats: ResMut<SimulationStats>,
) {
    stats.kills += died.read().count() as u32;
    stats.peak_population = stats.peak_population.max(state.population);
}


pub fn load_session(args: &SimulateArgs) -> Result<SessionConfig, RunError> {
    let session = match args.config.as_ref() {
        Some(path) => load_session_config(path)?,
        None => SessionConfig::default(),
    };
    session.validate()?;
    Ok(session)
}

fn validate_args(args: &SimulateArgs) -> Result<(), RunError> {
    if args.fps == 0 {
        return Err(RunError::argument("fps", "must be at least 1"));
    }
    if args.seconds < 0.0 {
        return Err(RunError::argument("seconds", "must not be negative"));
    }
    if !(0.0..=1.0).contains(&args.headshot_chance) {
        return Err(RunError::argument("headshot-chance", "must be within [0, 1]"));
    }
    if args.turret_interval <= 0.0 {
        return Err(RunError::argument("turret-interval", "must be positive"));
    }
    Ok(())
}

pub fn build_app(session: SessionConfig, args: &SimulateArgs) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.build().disable::<TimePlugin>());
    app.insert_resource(Time::<()>::default());

    app.insert_resource(PlayerStart {
        position: Vec3::ZERO,
        health: session.player.clone(),
    });
    app.add_plugins(ZombieCorePlugin::new(session).with_seed(args.seed));
    app.insert_resource(Ground::new(FlatGround::default()));

    app.insert_resource(Turret {
        damage: args.turret_damage,
        interval: args.turret_interval,
        range: args.turret_range,
        headshot_chance: args.headshot_chance,
        next_shot_at: 0.0,
    });
    app.init_resource::<SimulationStats>();

    app.add_systems(Startup, spawn_survivor);
    app.add_systems(Update, (
        turret_fire.before(ZombieSet::Damage),
        record_stats.after(ZombieSet::Resolve),
    ));
    app
}

/// Runs a whole session. `log` is only passed by the binary; tests run without a subscriber.
pub fn run_simulation(args: &SimulateArgs, log: Option<LogPlugin>) -> Result<SimulationReport, RunError> {
    validate_args(args)?;
    let session = load_session(args)?;
    let mut app = build_app(session, args);
    if let Some(log) = log {
        app.add_plugins(log);
    }

    let frames = (args.seconds * args.fps as f32).round() as u64;
    let step = Duration::from_secs_f64(1.0 / args.fps as f64);
    info!("Simulating {} frames at {} fps (seed {})", frames, args.fps, args.seed);

    for _ in 0..frames {
        app.world_mut().resource_mut::<Time>().advance_by(step);
        app.update();
        if app.world().resource::<GameTimer>().game_over {
            break;
        }
    }

    Ok(report(&mut app, args.seed))
}

fn report(app: &mut App, seed: u32) -> SimulationReport {
    let world = app.world_mut();
    let (player_dead, player_health) = world
        .query::<(&Player, &Health)>()
        .get_single(world)
        .map(|(player, health)| (player.is_dead(), health.current))
        .unwrap_or((false, 0));
    let alive_at_end = world.query::<&Enemy>().iter(world).count() as u32;

    let elapsed = world.resource::<Time>().elapsed_secs();
    let timer = *world.resource::<GameTimer>();
    let state = world.resource::<EnemySpawnState>().clone();
    let stats = world.resource::<SimulationStats>();

    SimulationReport {
        seed,
        simulated_seconds: elapsed,
        survived: timer.clock(),
        player_dead,
        player_health,
        shots: stats.shots,
        headshots: stats.headshots,
        kills: stats.kills,
        total_spawned: state.total_spawned,
        alive_at_end,
        peak_population: stats.peak_population,
        final_spawn_interval: state.current_interval,
        spawning_stopped: state.stopped,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use game::character::{enemy::spawning_ring::SpawnDirectorConfig, health::HealthConfig};

    fn short(seconds: f32) -> SimulateArgs {
        SimulateArgs { seconds, fps: 30, ..Default::default() }
    }

    #[test]
    fn same_seed_replays_the_same_session() {
        let first = run_simulation(&short(40.0), None).unwrap();
        let second = run_simulation(&short(40.0), None).unwrap();
        assert_eq!(first, second);
        assert!(first.total_spawned > 0);
    }

    #[test]
    fn turret_kills_zombies() {
        let args = SimulateArgs { turret_damage: 50, turret_interval: 0.5, turret_range: 40.0, ..short(60.0) };
        let report = run_simulation(&args, None).unwrap();
        assert!(report.kills > 0);
        assert!(report.shots >= report.kills);
        assert!(report.peak_population <= SpawnDirectorConfig::default().max_population);
    }

    #[test]
    fn unarmed_player_dies_and_spawning_stops() {
        let session = SessionConfig {
            player: HealthConfig { max: 50 },
            spawner: SpawnDirectorConfig {
                start_spawn_interval: 1.0,
                min_spawn_interval: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let args = SimulateArgs { turret_damage: 0, ..short(120.0) };
        let mut app = build_app(session, &args);
        for _ in 0..(120 * 30) {
            app.world_mut().resource_mut::<Time>().advance_by(Duration::from_millis(33));
            app.update();
        }

        let report = report(&mut app, args.seed);
        assert!(report.player_dead);
        assert_eq!(report.player_health, 0);
        assert!(report.spawning_stopped);
        assert_eq!(report.kills, 0);
        assert!(report.total_spawned < 100);
    }

    #[test]
    fn rejects_bad_arguments() {
        let err = run_simulation(&SimulateArgs { fps: 0, ..Default::default() }, None).unwrap_err();
        assert!(matches!(err, RunError::Argument { name: "fps", .. }));
        let err = run_simulation(&SimulateArgs { headshot_chance: 1.5, ..Default::default() }, None).unwrap_err();
        assert!(matches!(err, RunError::Argument { name: "headshot-chance", .. }));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = SimulateArgs { config: Some("nope/missing.ron".into()), ..Default::default() };
        assert!(matches!(run_simulation(&args, None), Err(RunError::Config(ConfigError::Io { .. }))));
    }
}
