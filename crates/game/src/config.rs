use std::path::{Path, PathBuf};

use bevy::scene::ron;
use serde::Deserialize;
use thiserror::Error;

use crate::character::{
    enemy::{ai::pathing::PathfindingConfig, config::EnemyConfig, spawning_ring::SpawnDirectorConfig},
    health::HealthConfig,
    movement::PlayArea,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid { field, reason: reason.into() }
    }
}

/// Everything needed to start a survival session, as one RON document.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub player: HealthConfig,
    pub enemy: EnemyConfig,
    pub spawner: SpawnDirectorConfig,
    pub pathfinding: PathfindingConfig,
    pub play_area: Option<PlayArea>,
}

impl SessionConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.max <= 0 {
            return Err(ConfigError::invalid("player.max", "must be positive"));
        }
        self.enemy.validate()?;
        self.spawner.validate()?;
        self.pathfinding.validate()?;
        if let Some(area) = &self.play_area {
            area.validate()?;
        }
        Ok(())
    }
}

pub fn load_session_config(path: impl AsRef<Path>) -> Result<SessionConfig, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SessionConfig::from_ron_str(&source)
}
