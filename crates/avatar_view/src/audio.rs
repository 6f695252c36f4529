//! Switchable audio listener.
//!
//! Bevy's spatial audio uses whichever entity carries a [`SpatialListener`], so
//! "disabling" a listener means removing that component. [`AudioListener`]
//! marks the entity as a listener while it is switched off.

use crate::settings::AvatarViewSettings;
use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AudioListener {
    pub enabled: bool,
}

impl Default for AudioListener {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AudioListener {
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Mirrors [`AudioListener::enabled`] onto the presence of a [`SpatialListener`].
///
/// Removing an `AudioListener` also removes the `SpatialListener` it put there.
pub fn sync_spatial_listeners(
    mut commands: Commands,
    settings: Res<AvatarViewSettings>,
    listeners: Query<(Entity, &AudioListener, Has<SpatialListener>), Changed<AudioListener>>,
    mut removed: RemovedComponents<AudioListener>,
    stray: Query<(), (With<SpatialListener>, Without<AudioListener>)>,
) {
    for (entity, listener, has_spatial) in &listeners {
        match (listener.enabled, has_spatial) {
            (true, false) => {
                commands
                    .entity(entity)
                    .insert(SpatialListener::new(settings.listener_ear_gap));
            }
            (false, true) => {
                commands.entity(entity).remove::<SpatialListener>();
            }
            _ => {}
        }
    }

    for entity in removed.read() {
        if stray.contains(entity) {
            commands.entity(entity).try_remove::<SpatialListener>();
        }
    }
}

/// Enabled listeners in iteration order.
pub fn enabled_listeners<'a>(
    listeners: impl IntoIterator<Item = (Entity, &'a AudioListener)>,
) -> Vec<Entity> {
    listeners
        .into_iter()
        .filter(|(_, listener)| listener.enabled)
        .map(|(entity, _)| entity)
        .collect()
}

/// Reports every enabled listener when more than one is on after a change.
/// Only one listener should hear the scene at a time; this is not enforced.
pub fn detect_multiple_listeners(
    settings: Res<AvatarViewSettings>,
    changed: Query<(), Changed<AudioListener>>,
    listeners: Query<(Entity, &AudioListener)>,
) -> Option<Vec<Entity>> {
    if !settings.warn_multiple_listeners || changed.is_empty() {
        return None;
    }

    let enabled = enabled_listeners(&listeners);
    (enabled.len() > 1).then_some(enabled)
}

pub fn warn_multiple_listeners(In(enabled): In<Option<Vec<Entity>>>) {
    if let Some(enabled) = enabled {
        warn!(
            "{} audio listeners are enabled at once: {:?}",
            enabled.len(),
            enabled
        );
    }
}
