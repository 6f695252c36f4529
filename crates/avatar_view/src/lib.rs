//! Ownership-based presentation for networked avatars.
//!
//! When an avatar appears, this crate decides whether its camera and audio
//! listener should be the ones the player sees and hears:
//! - the avatar of this process takes over from the scene's [`MainCamera`];
//! - avatars of other participants get their camera and listener switched off.
//!
//! Ownership is read through the [`Ownership`] capability, so any networking
//! layer can plug in its own component. [`Avatar`] is the default carrier and
//! [`PlayerIdentityPlugin`] fills it from replicated [`PlayerIdentity`] ids.
//!
//! # Example
//! ```no_run
//! use avatar_view::prelude::*;
//! use bevy::prelude::*;
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins((AvatarViewPlugin::<Avatar>::default(), PlayerIdentityPlugin))
//!     .insert_resource(LocalClient(42))
//!     .run();
//! ```

pub mod audio;
pub mod avatar;
pub mod camera;
pub mod error;
pub mod identity;
pub mod presentation;
pub mod settings;

pub use audio::AudioListener;
pub use avatar::{Avatar, AvatarRole, LocalPlayer, Ownership, PresentationApplied};
pub use camera::MainCamera;
pub use error::{PresentationError, SettingsError};
pub use identity::{LocalClient, PlayerIdentity, PlayerIdentityPlugin};
pub use presentation::{AvatarPresented, AvatarRig, PresentationFailed};
pub use settings::{AvatarViewSettings, MissingComponentPolicy};

pub mod prelude {
    pub use crate::{
        AudioListener, Avatar, AvatarPresented, AvatarRole, AvatarViewPlugin, AvatarViewSet,
        AvatarViewSettings, LocalClient, LocalPlayer, MainCamera, MissingComponentPolicy,
        Ownership, PlayerIdentity, PlayerIdentityPlugin, PresentationApplied,
        PresentationFailed,
    };
}

use bevy::prelude::*;
use std::marker::PhantomData;

/// Ordering of the avatar view systems inside `Update`.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum AvatarViewSet {
    /// Ownership flags are populated.
    Identify,
    /// Cameras and listeners of new avatars are switched.
    Present,
    /// Listener state is mirrored onto the audio engine.
    Sync,
}

/// Registers the presentation toggle for avatars carrying ownership component `O`.
///
/// Settings are taken from an [`AvatarViewSettings`] resource if one was inserted
/// before the plugin, otherwise defaults are used.
pub struct AvatarViewPlugin<O: Ownership = Avatar> {
    _marker: PhantomData<fn() -> O>,
}

impl<O: Ownership> Default for AvatarViewPlugin<O> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<O: Ownership> Plugin for AvatarViewPlugin<O> {
    fn build(&self, app: &mut App) {
        app.init_resource::<AvatarViewSettings>()
            .register_type::<AvatarViewSettings>()
            .register_type::<Avatar>()
            .register_type::<MainCamera>()
            .register_type::<AudioListener>()
            .register_type::<PresentationApplied>()
            .add_message::<AvatarPresented>()
            .add_message::<PresentationFailed>()
            .configure_sets(
                Update,
                (
                    AvatarViewSet::Identify,
                    AvatarViewSet::Present,
                    AvatarViewSet::Sync,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                presentation::apply_avatar_presentation::<O>.in_set(AvatarViewSet::Present),
            )
            .add_systems(
                Update,
                (
                    audio::sync_spatial_listeners,
                    audio::detect_multiple_listeners.pipe(audio::warn_multiple_listeners),
                )
                    .in_set(AvatarViewSet::Sync),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_builds() {
        let mut app = App::new();
        app.add_plugins(AvatarViewPlugin::<Avatar>::default());

        assert!(app.world().contains_resource::<AvatarViewSettings>());
        assert!(app.world().contains_resource::<Messages<AvatarPresented>>());
    }

    #[test]
    fn test_plugin_keeps_inserted_settings() {
        let mut app = App::new();
        app.insert_resource(AvatarViewSettings {
            demote_main_camera: false,
            ..default()
        })
        .add_plugins(AvatarViewPlugin::<Avatar>::default());

        assert!(!app.world().resource::<AvatarViewSettings>().demote_main_camera);
    }
}
