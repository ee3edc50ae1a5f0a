mod shared;
mod config;
mod cove;
mod host;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Fishing Cove".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(ClearColor(Color::srgb(0.08, 0.10, 0.12)))
        // Screen and game state
        .init_state::<Screen>()
        .init_state::<GameState>()
        // Host ↔ renderer events
        .add_event::<MoveAttemptEvent>()
        .add_event::<PlayerMovedEvent>()
        .add_event::<CanFishChangedEvent>()
        // Config first: the host seeds its props from it
        .add_plugins(config::ConfigPlugin)
        .add_plugins(host::HostPlugin)
        .add_plugins(cove::CovePlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
