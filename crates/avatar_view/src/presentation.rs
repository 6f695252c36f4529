//! Ownership-based presentation toggle.
//!
//! Every avatar is handled exactly once, on the first update after it appears:
//! - local: the scene's main camera is switched off (if one is active), then the
//!   avatar's own camera and audio listener are switched on;
//! - remote: the avatar's own camera and audio listener are switched off and the
//!   main camera is left alone.
//!
//! Camera and listener are looked up on the avatar root and all of its
//! descendants, hidden ones included.

use crate::audio::AudioListener;
use crate::avatar::{AvatarRole, LocalPlayer, Ownership, PresentationApplied};
use crate::camera::{find_main_camera, MainCamera};
use crate::error::PresentationError;
use crate::settings::{AvatarViewSettings, MissingComponentPolicy};
use bevy::prelude::*;

/// Written after an avatar's camera and listener were switched.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct AvatarPresented {
    pub avatar: Entity,
    pub role: AvatarRole,
    /// Main camera that was switched off for a local avatar.
    pub demoted_main_camera: Option<Entity>,
}

/// Written when [`MissingComponentPolicy::Fail`] rejected an avatar.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct PresentationFailed {
    pub error: PresentationError,
}

/// Camera and listener found in an avatar hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvatarRig {
    /// Root first, then descendants depth first.
    pub members: Vec<Entity>,
    pub camera: Option<Entity>,
    pub listener: Option<Entity>,
    /// Cameras and listeners found beyond the first one.
    pub extra_cameras: usize,
    pub extra_listeners: usize,
}

impl AvatarRig {
    /// Collects the rig below `root`. The first camera and listener in
    /// hierarchy order win; extras are logged.
    pub fn locate(
        root: Entity,
        children: &Query<&Children>,
        is_camera: impl Fn(Entity) -> bool,
        is_listener: impl Fn(Entity) -> bool,
    ) -> Self {
        let members: Vec<Entity> = std::iter::once(root)
            .chain(children.iter_descendants_depth_first(root))
            .collect();

        let cameras: Vec<Entity> = members.iter().copied().filter(|&e| is_camera(e)).collect();
        let listeners: Vec<Entity> = members
            .iter()
            .copied()
            .filter(|&e| is_listener(e))
            .collect();

        if cameras.len() > 1 {
            warn!(
                "Avatar {:?} has {} cameras, using {:?}",
                root,
                cameras.len(),
                cameras[0]
            );
        }
        if listeners.len() > 1 {
            warn!(
                "Avatar {:?} has {} audio listeners, using {:?}",
                root,
                listeners.len(),
                listeners[0]
            );
        }

        Self {
            camera: cameras.first().copied(),
            listener: listeners.first().copied(),
            extra_cameras: cameras.len().saturating_sub(1),
            extra_listeners: listeners.len().saturating_sub(1),
            members,
        }
    }

    /// Applies `policy` to missing pieces. Only [`MissingComponentPolicy::Fail`]
    /// turns a gap into an error.
    pub fn check(
        &self,
        avatar: Entity,
        policy: MissingComponentPolicy,
    ) -> Result<(), PresentationError> {
        let gaps = [
            (self.camera.is_none(), PresentationError::MissingCamera { avatar }),
            (
                self.listener.is_none(),
                PresentationError::MissingAudioListener { avatar },
            ),
        ];

        for (missing, error) in gaps {
            if !missing {
                continue;
            }
            match policy {
                MissingComponentPolicy::Ignore => {}
                MissingComponentPolicy::Warn => warn!("{error}, skipping it"),
                MissingComponentPolicy::Fail => return Err(error),
            }
        }
        Ok(())
    }
}

/// Switches camera and listener of every new avatar according to its ownership.
pub fn apply_avatar_presentation<O: Ownership>(
    mut commands: Commands,
    settings: Res<AvatarViewSettings>,
    avatars: Query<(Entity, &O), Without<PresentationApplied>>,
    children: Query<&Children>,
    mut cameras: Query<(Entity, &mut Camera, Has<MainCamera>)>,
    mut listeners: Query<&mut AudioListener>,
    mut visibilities: Query<&mut Visibility, With<MainCamera>>,
    mut presented: MessageWriter<AvatarPresented>,
    mut failed: MessageWriter<PresentationFailed>,
) {
    for (avatar, ownership) in &avatars {
        let role = AvatarRole::from(ownership.is_local());
        commands
            .entity(avatar)
            .insert(PresentationApplied { role });

        let rig = AvatarRig::locate(
            avatar,
            &children,
            |e| cameras.contains(e),
            |e| listeners.contains(e),
        );

        if let Err(error) = rig.check(avatar, settings.missing_components) {
            error!("Cannot present avatar: {error}");
            failed.write(PresentationFailed { error });
            continue;
        }

        let mut demoted_main_camera = None;
        if role == AvatarRole::Local && settings.demote_main_camera {
            demoted_main_camera = find_main_camera(cameras.iter(), &rig.members);
            if let Some(main) = demoted_main_camera {
                demote_main_camera(
                    main,
                    &children,
                    &mut cameras,
                    &mut listeners,
                    &mut visibilities,
                );
            }
        }

        let enabled = role == AvatarRole::Local;
        if let Some(camera) = rig.camera {
            if let Ok((_, mut camera, _)) = cameras.get_mut(camera) {
                camera.is_active = enabled;
            }
        }
        if let Some(listener) = rig.listener {
            if let Ok(mut listener) = listeners.get_mut(listener) {
                listener.enabled = enabled;
            }
        }

        if role == AvatarRole::Local {
            commands.entity(avatar).insert(LocalPlayer);
        }

        info!(
            "Presented {:?} avatar {:?} (camera {:?}, listener {:?})",
            role, avatar, rig.camera, rig.listener
        );
        presented.write(AvatarPresented {
            avatar,
            role,
            demoted_main_camera,
        });
    }
}

/// Switches off the whole main camera object: every camera and listener on it
/// or below it, and its visibility.
fn demote_main_camera(
    main: Entity,
    children: &Query<&Children>,
    cameras: &mut Query<(Entity, &mut Camera, Has<MainCamera>)>,
    listeners: &mut Query<&mut AudioListener>,
    visibilities: &mut Query<&mut Visibility, With<MainCamera>>,
) {
    let subtree: Vec<Entity> = std::iter::once(main)
        .chain(children.iter_descendants(main))
        .collect();

    for entity in subtree {
        if let Ok((_, mut camera, _)) = cameras.get_mut(entity) {
            camera.is_active = false;
        }
        if let Ok(mut listener) = listeners.get_mut(entity) {
            listener.enabled = false;
        }
    }
    if let Ok(mut visibility) = visibilities.get_mut(main) {
        *visibility = Visibility::Hidden;
    }
    debug!("Main camera {:?} deactivated", main);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn locate(world: &mut World, root: Entity) -> AvatarRig {
        world
            .run_system_once(
                move |children: Query<&Children>,
                      cameras: Query<(), With<Camera>>,
                      listeners: Query<(), With<AudioListener>>| {
                    AvatarRig::locate(
                        root,
                        &children,
                        |e| cameras.contains(e),
                        |e| listeners.contains(e),
                    )
                },
            )
            .unwrap()
    }

    #[test]
    fn test_locate_prefers_hierarchy_order() {
        let mut world = World::new();
        let root = world.spawn(Name::new("root")).id();
        let arm = world.spawn(ChildOf(root)).id();
        let deep_camera = world.spawn((Camera::default(), ChildOf(arm))).id();
        let late_camera = world.spawn((Camera::default(), ChildOf(root))).id();
        let listener = world.spawn((AudioListener::default(), ChildOf(root))).id();

        let rig = locate(&mut world, root);
        assert_eq!(rig.camera, Some(deep_camera));
        assert_eq!(rig.listener, Some(listener));
        assert_eq!(rig.extra_cameras, 1);
        assert_eq!(rig.extra_listeners, 0);
        assert_eq!(rig.members.len(), 5);
        assert_eq!(rig.members[0], root);
        assert!(rig.members.contains(&late_camera));
    }

    #[test]
    fn test_locate_includes_root() {
        let mut world = World::new();
        let root = world
            .spawn((Camera::default(), AudioListener::default()))
            .id();
        world.spawn((AudioListener::default(), ChildOf(root)));

        let rig = locate(&mut world, root);
        assert_eq!(rig.camera, Some(root));
        assert_eq!(rig.listener, Some(root));
        assert_eq!(rig.extra_cameras, 0);
        assert_eq!(rig.extra_listeners, 1);
    }

    #[test]
    fn test_check_policies() {
        let avatar = Entity::PLACEHOLDER;
        let rig = AvatarRig {
            members: vec![avatar],
            camera: Some(avatar),
            ..default()
        };

        assert!(rig.check(avatar, MissingComponentPolicy::Ignore).is_ok());
        assert!(rig.check(avatar, MissingComponentPolicy::Warn).is_ok());
        assert_eq!(
            rig.check(avatar, MissingComponentPolicy::Fail),
            Err(PresentationError::MissingAudioListener { avatar })
        );

        let empty = AvatarRig::default();
        assert_eq!(
            empty.check(avatar, MissingComponentPolicy::Fail),
            Err(PresentationError::MissingCamera { avatar })
        );
    }
}
