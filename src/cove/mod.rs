//! Cove renderer plugin.
//!
//! Responsible for:
//! - Mounting the drawing surface and its layers when the cove screen opens
//! - Per-frame water, player glide, particle and lighting updates
//! - Reactive redraws of the player pose and the fishing line
//! - Resolving move attempts and reporting the "facing water" signal
//! - Releasing everything it spawned when the screen closes
//!
//! Layers stack in a fixed order, from the bottom: tiles, water,
//! decorations, player, particles, lighting, fishing overlay.

use bevy::prelude::*;

use crate::config::CoveConfig;
use crate::shared::*;

pub mod fishing_line;
pub mod lighting;
pub mod map;
pub mod movement;
pub mod particles;
pub mod player;
pub mod tiles;
pub mod water;

use map::CoveMap;
use movement::WaterAdjacency;
use water::WaveClock;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct CovePlugin;

impl Plugin for CovePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CoveMap>()
            .add_systems(OnEnter(Screen::Cove), mount_cove)
            .add_systems(OnExit(Screen::Cove), unmount_cove)
            .add_systems(
                Update,
                (
                    movement::handle_move_attempts,
                    movement::report_water_adjacency,
                    water::advance_wave_clock,
                    water::animate_water,
                    player::interpolate_visual_position,
                    player::sync_player_pose,
                    player::redraw_player_pose,
                    particles::update_particles,
                    lighting::update_lighting,
                    fishing_line::recompute_fishing_line,
                    fishing_line::animate_bobber,
                )
                    .chain()
                    .in_set(CoveSystems)
                    .run_if(in_state(Screen::Cove)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES / COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

/// The mounted drawing surface. Every render entity is a descendant of
/// `root`; despawning it releases them all.
#[derive(Resource, Debug)]
pub struct CoveSurface {
    pub root: Entity,
}

#[derive(Component, Debug)]
pub struct CoveRoot;

// ═══════════════════════════════════════════════════════════════════════
// MOUNT / UNMOUNT
// ═══════════════════════════════════════════════════════════════════════

fn mount_cove(
    mut commands: Commands,
    map: Res<CoveMap>,
    config: Res<CoveConfig>,
    position: Res<PlayerPosition>,
    state: Res<State<GameState>>,
    time_of_day: Res<TimeOfDay>,
) {
    let root = commands
        .spawn((CoveRoot, Transform::default(), Visibility::default()))
        .with_children(|surface| {
            tiles::spawn_tile_layer(surface, &map);
            water::spawn_water_layer(surface, &map);
            tiles::spawn_decoration_layer(surface, &map);
            player::spawn_player_layer(surface, *position, *state.get());
            particles::spawn_particle_layer(surface, &config);
            lighting::spawn_lighting_layer(surface, &config, *time_of_day);
            fishing_line::spawn_fishing_layer(surface);
        })
        .id();

    commands.insert_resource(CoveSurface { root });
    commands.insert_resource(WaveClock::default());
    commands.insert_resource(WaterAdjacency::default());

    info!(
        "[Cove] Mounted {}x{} map with {} ambient particles",
        map.width(),
        map.height(),
        config.particle_total()
    );
}

fn unmount_cove(mut commands: Commands, surface: Option<Res<CoveSurface>>) {
    if let Some(surface) = surface {
        commands.entity(surface.root).despawn_recursive();
    }
    commands.remove_resource::<CoveSurface>();
    commands.remove_resource::<WaveClock>();
    commands.remove_resource::<WaterAdjacency>();
    info!("[Cove] Unmounted");
}
