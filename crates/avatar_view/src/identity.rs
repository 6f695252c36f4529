//! Populates [`Avatar::is_local`] from replicated player identities.

use crate::avatar::Avatar;
use crate::AvatarViewSet;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifies which client owns a replicated player entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct PlayerIdentity {
    /// Globally unique identifier of the owning client.
    pub client_id: u64,
}

/// Client id of this process. Identities wait for it before they become avatars.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct LocalClient(pub u64);

/// Attaches an [`Avatar`] to every player entity that arrives with a
/// [`PlayerIdentity`] and no avatar yet.
pub struct PlayerIdentityPlugin;

impl Plugin for PlayerIdentityPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerIdentity>()
            .register_type::<LocalClient>()
            .add_systems(
                Update,
                attach_avatar_from_identity
                    .run_if(resource_exists::<LocalClient>)
                    .in_set(AvatarViewSet::Identify),
            );
    }
}

pub fn attach_avatar_from_identity(
    mut commands: Commands,
    local: Res<LocalClient>,
    identities: Query<(Entity, &PlayerIdentity), Without<Avatar>>,
) {
    for (entity, identity) in &identities {
        let is_local = local.0 == identity.client_id;
        debug!(
            "Player {:?} (client {}) identified as {}",
            entity,
            identity.client_id,
            if is_local { "local" } else { "remote" }
        );
        commands.entity(entity).insert(Avatar { is_local });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_to_avatar() {
        let mut app = App::new();
        app.insert_resource(LocalClient(7))
            .add_systems(Update, attach_avatar_from_identity);

        let mine = app.world_mut().spawn(PlayerIdentity { client_id: 7 }).id();
        let theirs = app.world_mut().spawn(PlayerIdentity { client_id: 8 }).id();
        app.update();

        assert_eq!(app.world().get::<Avatar>(mine), Some(&Avatar::LOCAL));
        assert_eq!(app.world().get::<Avatar>(theirs), Some(&Avatar::REMOTE));
    }

    #[test]
    fn test_identities_wait_for_local_client() {
        let mut app = App::new();
        app.add_plugins(PlayerIdentityPlugin);

        // Replicated before the handshake assigned our id.
        let mine = app.world_mut().spawn(PlayerIdentity { client_id: 5 }).id();
        let theirs = app.world_mut().spawn(PlayerIdentity { client_id: 6 }).id();
        app.update();
        assert!(app.world().get::<Avatar>(mine).is_none());
        assert!(app.world().get::<Avatar>(theirs).is_none());

        app.insert_resource(LocalClient(5));
        app.update();
        assert_eq!(app.world().get::<Avatar>(mine), Some(&Avatar::LOCAL));
        assert_eq!(app.world().get::<Avatar>(theirs), Some(&Avatar::REMOTE));
    }

    #[test]
    fn test_existing_avatar_is_kept() {
        let mut app = App::new();
        app.insert_resource(LocalClient(1))
            .add_systems(Update, attach_avatar_from_identity);

        let player = app
            .world_mut()
            .spawn((PlayerIdentity { client_id: 2 }, Avatar::LOCAL))
            .id();
        app.update();

        assert_eq!(app.world().get::<Avatar>(player), Some(&Avatar::LOCAL));
    }
}
