use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioPlugin, SpatialAudioEmitter, SpatialAudioReceiver};
use serde::{Deserialize, Serialize};

use crate::character::{enemy::Enemy, player::Player};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum SoundCue {
    ZombieScream,
    ZombieAttack,
    ZombieHit,
    ZombieDeath,
    PlayerHurt,
    GameOver,
}

/// A cue to play, optionally positioned on an entity.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEvent {
    pub cue: SoundCue,
    pub emitter: Option<Entity>,
}

impl SoundEvent {
    pub fn at(cue: SoundCue, emitter: Entity) -> Self {
        Self { cue, emitter: Some(emitter) }
    }

    pub fn global(cue: SoundCue) -> Self {
        Self { cue, emitter: None }
    }
}


#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub background_loop: Option<String>,
    pub zombie_scream: String,
    pub zombie_attack: String,
    pub zombie_hit: String,
    pub zombie_death: String,
    pub player_hurt: String,
    pub game_over: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            background_loop: Some("sounds/loop.ogg".into()),
            zombie_scream: "sounds/zombie_scream.ogg".into(),
            zombie_attack: "sounds/zombie_attack.ogg".into(),
            zombie_hit: "sounds/zombie_hit.ogg".into(),
            zombie_death: "sounds/zombie_death.ogg".into(),
            player_hurt: "sounds/player_hurt.ogg".into(),
            game_over: "sounds/game_over.ogg".into(),
        }
    }
}

impl AudioConfig {
    pub fn clip(&self, cue: SoundCue) -> &str {
        match cue {
            SoundCue::ZombieScream => &self.zombie_scream,
            SoundCue::ZombieAttack => &self.zombie_attack,
            SoundCue::ZombieHit => &self.zombie_hit,
            SoundCue::ZombieDeath => &self.zombie_death,
            SoundCue::PlayerHurt => &self.player_hurt,
            SoundCue::GameOver => &self.game_over,
        }
    }
}


/// Plays `SoundEvent`s through kira. The core plugin only emits the events,
/// so headless runs work without this plugin.
pub struct ZAudioPlugin {}

impl Plugin for ZAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin);
        app.init_resource::<AudioConfig>();
        app.add_systems(Startup, play_loop);
        app.add_systems(Update, (attach_emitters, play_sound_events).chain());
    }
}

// `Audio` is an alias for `AudioChannel<MainTrack>`, the default channel added by the audio plugin
fn play_loop(asset_server: Res<AssetServer>, audio: Res<Audio>, config: Res<AudioConfig>) {
    if let Some(path) = config.background_loop.as_ref() {
        audio.play(asset_server.load(path.clone())).looped();
    }
}

// first person: the player is the listener
fn attach_emitters(
    mut commands: Commands,
    enemies: Query<Entity, Added<Enemy>>,
    players: Query<Entity, Added<Player>>,
) {
    for entity in enemies.iter() {
        commands.entity(entity).insert(SpatialAudioEmitter { instances: vec![] });
    }
    for entity in players.iter() {
        commands.entity(entity).insert(SpatialAudioReceiver);
    }
}

pub fn play_sound_events(
    mut events: EventReader<SoundEvent>,
    audio: Res<Audio>,
    asset_server: Res<AssetServer>,
    config: Res<AudioConfig>,
    mut emitters: Query<&mut SpatialAudioEmitter>,
) {
    for event in events.read() {
        let handle = audio.play(asset_server.load(config.clip(event.cue).to_string())).handle();

        // despawned emitters (a zombie dying this tick) fall back to a flat sound
        if let Some(mut emitter) = event.emitter.and_then(|e| emitters.get_mut(e).ok()) {
            emitter.instances.push(handle);
        }
    }
}
