use bevy::prelude::*;

/// Marker for the scene-wide default camera, the one a local avatar takes over from.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MainCamera;

/// Returns the first active main camera that is not part of `exclude`.
///
/// Inactive main cameras are skipped, so a camera that was already switched off
/// is never reported.
pub fn find_main_camera<'a>(
    cameras: impl IntoIterator<Item = (Entity, &'a Camera, bool)>,
    exclude: &[Entity],
) -> Option<Entity> {
    cameras
        .into_iter()
        .find(|(entity, camera, is_main)| {
            *is_main && camera.is_active && !exclude.contains(entity)
        })
        .map(|(entity, _, _)| entity)
}
