//! Runtime configuration for the presentation toggle.
//!
//! Settings are stored as RON, for example:
//!
//! ```ron
//! (
//!     missing_components: Fail,
//!     demote_main_camera: true,
//!     listener_ear_gap: 4.0,
//!     warn_multiple_listeners: true,
//! )
//! ```

use crate::error::SettingsError;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when an avatar's hierarchy lacks a camera or audio listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum MissingComponentPolicy {
    /// Skip the missing piece without a trace.
    Ignore,
    /// Skip the missing piece and log a warning.
    #[default]
    Warn,
    /// Leave the whole avatar untouched and report a `PresentationFailed` message.
    Fail,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct AvatarViewSettings {
    pub missing_components: MissingComponentPolicy,
    /// Deactivate the scene's main camera when a local avatar takes over.
    pub demote_main_camera: bool,
    /// Distance between the ears of a default `AudioListener`.
    pub listener_ear_gap: f32,
    pub warn_multiple_listeners: bool,
}

impl Default for AvatarViewSettings {
    fn default() -> Self {
        Self {
            missing_components: MissingComponentPolicy::Warn,
            demote_main_camera: true,
            listener_ear_gap: 4.0,
            warn_multiple_listeners: true,
        }
    }
}

impl AvatarViewSettings {
    pub const FILE_NAME: &'static str = "avatar_view.ron";

    pub fn from_ron(path: &Path, text: &str) -> Result<Self, SettingsError> {
        ron::from_str(text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(path, &text)
    }

    /// Loads settings, falling back to defaults when the file is absent or broken.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                info!("Loaded avatar view settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(SettingsError::Parse { path, source }) => {
                error!("Invalid settings in {}: {source}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                error!("{err}, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = AvatarViewSettings::default();
        assert_eq!(settings.missing_components, MissingComponentPolicy::Warn);
        assert!(settings.demote_main_camera);
        assert_eq!(settings.listener_ear_gap, 4.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings =
            AvatarViewSettings::from_ron(Path::new("inline"), "(missing_components: Fail)")
                .unwrap();
        assert_eq!(settings.missing_components, MissingComponentPolicy::Fail);
        assert!(settings.demote_main_camera);
        assert!(settings.warn_multiple_listeners);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "(missing_components: Ignore, demote_main_camera: false, listener_ear_gap: 0.3)"
        )
        .unwrap();

        let settings = AvatarViewSettings::load(file.path()).unwrap();
        assert_eq!(settings.missing_components, MissingComponentPolicy::Ignore);
        assert!(!settings.demote_main_camera);
        assert_eq!(settings.listener_ear_gap, 0.3);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = AvatarViewSettings::from_ron(Path::new("broken.ron"), "(missing_components: ")
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AvatarViewSettings::FILE_NAME);

        assert!(matches!(
            AvatarViewSettings::load(&path),
            Err(SettingsError::Io { .. })
        ));
        assert_eq!(
            AvatarViewSettings::load_or_default(&path),
            AvatarViewSettings::default()
        );
    }
}
