use bevy::prelude::Entity;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons an avatar could not be presented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("avatar {avatar} has no camera in its hierarchy")]
    MissingCamera { avatar: Entity },
    #[error("avatar {avatar} has no audio listener in its hierarchy")]
    MissingAudioListener { avatar: Entity },
}

impl PresentationError {
    pub fn avatar(&self) -> Entity {
        match self {
            Self::MissingCamera { avatar } | Self::MissingAudioListener { avatar } => *avatar,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}
