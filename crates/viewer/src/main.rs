mod app;

use avatar_view::prelude::*;
use bevy::prelude::*;

/// Client id this demo pretends to have been assigned by the server.
const LOCAL_CLIENT_ID: u64 = 1;

fn main() -> anyhow::Result<()> {
    let (mut app, _log_guard) = app::init()?;

    app.add_plugins((AvatarViewPlugin::<Avatar>::default(), PlayerIdentityPlugin))
        .insert_resource(LocalClient(LOCAL_CLIENT_ID))
        .add_systems(Startup, (spawn_world, spawn_players))
        .add_systems(Update, (log_presentation, spin_avatars));

    app.run();
    Ok(())
}

fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Overview camera, active until the local player shows up.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-12.0, 8.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        AudioListener::default(),
        Name::new("Main Camera"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Name::new("Ground"),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Spawns the local player and one remote player. Both rigs start with their
/// camera switched off; the presentation toggle decides which one goes live.
fn spawn_players(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let players = [
        (LOCAL_CLIENT_ID, Vec3::new(-2.0, 1.0, 0.0), Color::srgb(0.2, 0.4, 0.9)),
        (2, Vec3::new(2.0, 1.0, 0.0), Color::srgb(0.9, 0.3, 0.2)),
    ];

    for (client_id, position, color) in players {
        commands
            .spawn((
                PlayerIdentity { client_id },
                Transform::from_translation(position),
                Mesh3d(meshes.add(Capsule3d::default())),
                MeshMaterial3d(materials.add(color)),
                Name::new(format!("Player {client_id}")),
            ))
            .with_children(|player| {
                player.spawn((
                    Camera3d::default(),
                    Camera {
                        is_active: false,
                        order: 1,
                        ..default()
                    },
                    Transform::from_xyz(0.0, 4.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
                    Name::new("Avatar Camera"),
                ));
                player.spawn((
                    AudioListener::disabled(),
                    Transform::from_xyz(0.0, 0.7, 0.0),
                    Visibility::Hidden,
                    Name::new("Avatar Ears"),
                ));
            });
    }
}

fn log_presentation(
    mut presented: MessageReader<AvatarPresented>,
    mut failed: MessageReader<PresentationFailed>,
    names: Query<&Name>,
) {
    for event in presented.read() {
        let name = names
            .get(event.avatar)
            .map(Name::as_str)
            .unwrap_or("<unnamed>");
        info!(
            "{name} is {:?}, main camera demoted: {}",
            event.role,
            event.demoted_main_camera.is_some()
        );
    }
    for event in failed.read() {
        error!("{}", event.error);
    }
}

fn spin_avatars(time: Res<Time>, mut avatars: Query<&mut Transform, With<Avatar>>) {
    for mut transform in &mut avatars {
        transform.rotate_y(0.3 * time.delta_secs());
    }
}
