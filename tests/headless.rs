//! Headless integration tests for the fishing cove.
//!
//! These tests run the real host and renderer plugins without a window or
//! GPU. They use Bevy's `MinimalPlugins` with a fixed time step to tick the
//! app, drive it through events and simulated key presses, and inspect the
//! spawned entities and host resources.
//!
//! Run with: `cargo test --test headless`

use std::marker::PhantomData;
use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use fishing_cove::config::CoveConfig;
use fishing_cove::cove::fishing_line::{Bobber, FishingLine};
use fishing_cove::cove::lighting::{tint_for, LightingTint, Vignette};
use fishing_cove::cove::map::CoveMap;
use fishing_cove::cove::movement::WaterAdjacency;
use fishing_cove::cove::particles::{AmbientParticle, ParticleKind};
use fishing_cove::cove::player::{CovePlayer, PlayerPart, PlayerPose, VisualPosition};
use fishing_cove::cove::tiles::MapTile;
use fishing_cove::cove::water::{WaterShimmer, WaveClock};
use fishing_cove::cove::{CovePlugin, CoveRoot, CoveSurface};
use fishing_cove::host::{CoveClock, FishingSession, HostPlugin};
use fishing_cove::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Short bite window so a full cast fits in a few hundred frames.
fn test_config() -> CoveConfig {
    CoveConfig {
        bite_wait_min: 0.2,
        bite_wait_max: 0.3,
        minutes_per_second: 0.0,
        ..Default::default()
    }
}

/// Builds the app the way main.rs does, minus windowing and rendering.
/// The config is inserted up front so the host seeds its props from it.
fn build_test_app(config: CoveConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        1.0 / 60.0,
    )));

    // Keyboard state without the input plugin; tests press and clear keys.
    app.init_resource::<ButtonInput<KeyCode>>();

    app.init_state::<Screen>().init_state::<GameState>();

    app.add_event::<MoveAttemptEvent>()
        .add_event::<PlayerMovedEvent>()
        .add_event::<CanFishChangedEvent>();

    app.insert_resource(config);
    app.add_plugins(HostPlugin);
    app.add_plugins(CovePlugin);

    // First update runs the initial transition into the cove.
    app.update();
    app
}

fn count<C: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<C>>();
    query.iter(world).count()
}

fn current_state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn current_screen(app: &App) -> Screen {
    *app.world().resource::<State<Screen>>().get()
}

fn position(app: &App) -> PlayerPosition {
    *app.world().resource::<PlayerPosition>()
}

/// Press a key for exactly one frame.
fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
}

fn send_move(app: &mut App, facing: Facing) {
    let (dx, dy) = facing.offset();
    app.world_mut().send_event(MoveAttemptEvent { dx, dy, facing });
    app.update();
}

/// Update until `done` holds or `max_frames` pass. Returns whether it held.
fn run_until(app: &mut App, max_frames: usize, done: impl Fn(&App) -> bool) -> bool {
    for _ in 0..max_frames {
        if done(app) {
            return true;
        }
        app.update();
    }
    done(app)
}

/// Walk from the default start (10,5) onto the dock at (10,8), facing the
/// water below it.
fn walk_to_dock(app: &mut App) {
    for _ in 0..3 {
        send_move(app, Facing::Down);
    }
    assert_eq!(
        position(app),
        PlayerPosition {
            x: 10,
            y: 8,
            facing: Facing::Down
        }
    );
    // The adjacency check reacts to the position change on the next frame.
    app.update();
}

fn line_visible(app: &mut App) -> bool {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&Visibility, With<FishingLine>>();
    query
        .iter(world)
        .all(|visibility| *visibility != Visibility::Hidden)
}

fn rod_visible(app: &mut App) -> bool {
    let world = app.world_mut();
    let mut query = world.query::<(&PlayerPart, &Visibility)>();
    query
        .iter(world)
        .filter(|(part, _)| **part == PlayerPart::Rod)
        .all(|(_, visibility)| *visibility != Visibility::Hidden)
}

/// Seconds left on the current fishing phase, if any.
fn phase_remaining(app: &App) -> Option<f32> {
    app.world()
        .resource::<FishingSession>()
        .timer
        .as_ref()
        .map(|timer| timer.remaining_secs())
}

/// Frames in which any `C` was written, counted after the renderer ran.
#[derive(Resource)]
struct ChangedFrames<C: Component> {
    frames: u32,
    _marker: PhantomData<C>,
}

impl<C: Component> Default for ChangedFrames<C> {
    fn default() -> Self {
        Self {
            frames: 0,
            _marker: PhantomData,
        }
    }
}

fn count_changed_frames<C: Component>(query: Query<Ref<C>>, mut seen: ResMut<ChangedFrames<C>>) {
    if query.iter().any(|component| component.is_changed()) {
        seen.frames += 1;
    }
}

fn track_changes<C: Component>(app: &mut App) {
    app.init_resource::<ChangedFrames<C>>();
    app.add_systems(Update, count_changed_frames::<C>.after(CoveSystems));
    // Spawn-time values count once; start from zero afterwards.
    app.update();
    app.world_mut().resource_mut::<ChangedFrames<C>>().frames = 0;
}

fn changed_frames<C: Component>(app: &App) -> u32 {
    app.world().resource::<ChangedFrames<C>>().frames
}

// ─────────────────────────────────────────────────────────────────────────────
// Mount / unmount
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_mount_builds_every_layer() {
    let mut app = build_test_app(test_config());

    assert!(app.world().get_resource::<CoveSurface>().is_some());
    assert!(app.world().get_resource::<WaveClock>().is_some());
    assert_eq!(count::<CoveRoot>(&mut app), 1);
    assert_eq!(count::<MapTile>(&mut app), MAP_WIDTH * MAP_HEIGHT);
    assert_eq!(count::<CovePlayer>(&mut app), 1);
    assert_eq!(count::<LightingTint>(&mut app), 1);
    assert!(count::<Vignette>(&mut app) > 0);
    assert_eq!(count::<FishingLine>(&mut app), 1);
    assert_eq!(count::<Bobber>(&mut app), 1);

    let water_cells = CoveMap::default()
        .cells()
        .filter(|(_, _, kind)| kind.is_water())
        .count();
    assert_eq!(count::<WaterShimmer>(&mut app), water_cells);

    let config = test_config();
    assert_eq!(count::<AmbientParticle>(&mut app), config.particle_total());
}

#[test]
fn test_spawned_layers_stack_in_draw_order() {
    let mut app = build_test_app(test_config());
    let world = app.world_mut();

    let mut tint = world.query_filtered::<&Transform, With<LightingTint>>();
    let lighting_z = tint.single(world).translation.z;

    let mut particles = world.query_filtered::<&Transform, With<AmbientParticle>>();
    let particle_top = particles
        .iter(world)
        .map(|transform| transform.translation.z)
        .fold(f32::MIN, f32::max);

    let mut player = world.query_filtered::<&Transform, With<CovePlayer>>();
    let player_z = player.single(world).translation.z;

    let mut tiles = world.query_filtered::<&Transform, With<MapTile>>();
    let tile_top = tiles
        .iter(world)
        .map(|transform| transform.translation.z)
        .fold(f32::MIN, f32::max);

    let mut shimmer = world.query_filtered::<&Transform, With<WaterShimmer>>();
    let water_bottom = shimmer
        .iter(world)
        .map(|transform| transform.translation.z)
        .fold(f32::MAX, f32::min);

    let mut line = world.query_filtered::<&Transform, With<FishingLine>>();
    let line_z = line.single(world).translation.z;
    let mut bobber = world.query_filtered::<&Transform, With<Bobber>>();
    let bobber_z = bobber.single(world).translation.z;

    assert!(tile_top < water_bottom);
    assert!(player_z < particle_top);
    assert!(particle_top < lighting_z, "particles {} vs lighting {}", particle_top, lighting_z);
    assert!(player_z < lighting_z);
    assert!(lighting_z < line_z);
    assert!(lighting_z < bobber_z);
}

#[test]
fn test_particle_pool_size_is_constant() {
    let mut app = build_test_app(test_config());
    let total = test_config().particle_total();

    // Several seconds of simulated time: every particle expires at least once.
    for _ in 0..900 {
        app.update();
    }
    assert_eq!(count::<AmbientParticle>(&mut app), total);
}

#[test]
fn test_water_clock_advances() {
    let mut app = build_test_app(test_config());
    let before = app.world().resource::<WaveClock>().elapsed;
    for _ in 0..10 {
        app.update();
    }
    let after = app.world().resource::<WaveClock>().elapsed;
    assert!(after > before);
}

#[test]
fn test_leaving_the_screen_releases_everything() {
    let mut app = build_test_app(test_config());

    tap(&mut app, KeyCode::Escape);
    app.update();

    assert_eq!(current_screen(&app), Screen::Away);
    assert_eq!(count::<CoveRoot>(&mut app), 0);
    assert_eq!(count::<MapTile>(&mut app), 0);
    assert_eq!(count::<AmbientParticle>(&mut app), 0);
    assert_eq!(count::<CovePlayer>(&mut app), 0);
    assert_eq!(count::<FishingLine>(&mut app), 0);
    assert!(app.world().get_resource::<CoveSurface>().is_none());
    assert!(app.world().get_resource::<WaveClock>().is_none());
    assert!(app.world().get_resource::<WaterAdjacency>().is_none());
}

#[test]
fn test_remount_does_not_duplicate_layers() {
    let mut app = build_test_app(test_config());
    let total = test_config().particle_total();

    tap(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(current_screen(&app), Screen::Away);

    tap(&mut app, KeyCode::Enter);
    app.update();
    assert_eq!(current_screen(&app), Screen::Cove);

    assert_eq!(count::<CoveRoot>(&mut app), 1);
    assert_eq!(count::<MapTile>(&mut app), MAP_WIDTH * MAP_HEIGHT);
    assert_eq!(count::<AmbientParticle>(&mut app), total);
    assert!(app.world().get_resource::<CoveSurface>().is_some());
}

// ─────────────────────────────────────────────────────────────────────────────
// Movement and the "facing water" signal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_start_cell_seeds_player() {
    let config = CoveConfig {
        start_x: 4,
        start_y: 6,
        ..test_config()
    };
    let app = build_test_app(config);
    let pos = position(&app);
    assert_eq!((pos.x, pos.y), (4, 6));
}

#[test]
fn test_move_attempt_updates_host_position() {
    let mut app = build_test_app(test_config());
    assert_eq!((position(&app).x, position(&app).y), (10, 5));

    send_move(&mut app, Facing::Down);
    assert_eq!(
        position(&app),
        PlayerPosition {
            x: 10,
            y: 6,
            facing: Facing::Down
        }
    );
}

#[test]
fn test_blocked_move_still_turns_player() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);

    // Step onto the sand beside the dock, then try to walk into the pond.
    send_move(&mut app, Facing::Left);
    assert_eq!(position(&app).facing, Facing::Left);
    send_move(&mut app, Facing::Down);
    let pos = position(&app);
    assert_eq!((pos.x, pos.y), (9, 8));
    assert_eq!(pos.facing, Facing::Down);

    app.update();
    assert!(app.world().resource::<CastAvailability>().0);
}

#[test]
fn test_moves_ignored_while_fishing() {
    let mut app = build_test_app(test_config());
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Waiting);
    app.update();
    assert_eq!(current_state(&app), GameState::Waiting);

    send_move(&mut app, Facing::Down);
    assert_eq!(
        position(&app),
        PlayerPosition {
            x: 10,
            y: 5,
            facing: Facing::Down
        }
    );
}

#[test]
fn test_dock_facing_water_enables_cast() {
    let mut app = build_test_app(test_config());
    assert!(!app.world().resource::<CastAvailability>().0);

    walk_to_dock(&mut app);
    assert!(app.world().resource::<CastAvailability>().0);

    // Back up the dock: the path above is not water.
    send_move(&mut app, Facing::Up);
    app.update();
    assert!(!app.world().resource::<CastAvailability>().0);
}

#[test]
fn test_pose_redrawn_only_when_it_changes() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    track_changes::<PlayerPose>(&mut app);

    // Into the pond with the same facing: nothing to redraw.
    send_move(&mut app, Facing::Down);
    app.update();
    app.update();
    assert_eq!(changed_frames::<PlayerPose>(&app), 0);

    // Turning does redraw, once.
    send_move(&mut app, Facing::Up);
    app.update();
    app.update();
    assert_eq!(changed_frames::<PlayerPose>(&app), 1);
}

#[test]
fn test_visual_position_glides_toward_cell() {
    let mut app = build_test_app(test_config());
    send_move(&mut app, Facing::Down);
    // The host applies the move after the renderer ran this frame.
    app.update();

    let world = app.world_mut();
    let mut query = world.query_filtered::<&VisualPosition, With<CovePlayer>>();
    let visual = query.single(world).0;
    // One blend step in: past the old row, not yet on the new one.
    assert!(visual.y > 5.0 && visual.y < 6.0, "visual y = {}", visual.y);

    for _ in 0..120 {
        app.update();
    }
    let world = app.world_mut();
    let visual = query.single(world).0;
    assert!((visual.y - 6.0).abs() < 0.01);
}

// ─────────────────────────────────────────────────────────────────────────────
// Fishing flow
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_cast_needs_water_in_front() {
    let mut app = build_test_app(test_config());
    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Walking);
    assert!(!line_visible(&mut app));
}

#[test]
fn test_cast_shows_line_at_cast_distance() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    assert!(!line_visible(&mut app));
    assert!(!rod_visible(&mut app));

    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Casting);
    assert!(line_visible(&mut app));
    assert!(rod_visible(&mut app));

    // Player centre on the canvas is (336, 272); 30px below it while casting.
    let world = app.world_mut();
    let mut query = world.query::<&Bobber>();
    let base = query.single(world).base;
    assert_eq!(base, canvas_to_world(Vec2::new(336.0, 302.0)));
}

#[test]
fn test_line_extends_once_waiting() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);
    assert!(run_until(&mut app, 120, |app| current_state(app) == GameState::Waiting));
    app.update();

    let world = app.world_mut();
    let mut query = world.query::<&Bobber>();
    let base = query.single(world).base;
    assert_eq!(base, canvas_to_world(Vec2::new(336.0, 342.0)));
}

#[test]
fn test_full_catch_returns_to_walking() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);

    assert!(run_until(&mut app, 200, |app| {
        current_state(app) == GameState::FishAppeared
    }));
    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Reeling);

    assert!(run_until(&mut app, 200, |app| current_state(app) == GameState::Caught));
    assert_eq!(app.world().resource::<FishingSession>().catches, 1);

    assert!(run_until(&mut app, 200, |app| current_state(app) == GameState::Walking));
    app.update();
    assert!(!line_visible(&mut app));
}

#[test]
fn test_hook_on_last_frame_of_bite_still_reels() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);

    assert!(run_until(&mut app, 200, |app| {
        current_state(app) == GameState::FishAppeared
    }));
    // Stop with one frame left in the reaction window.
    assert!(run_until(&mut app, 200, |app| {
        phase_remaining(app).is_some_and(|secs| secs <= 1.0 / 60.0 + 1e-4)
    }));
    assert_eq!(current_state(&app), GameState::FishAppeared);

    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Reeling);
    let session = app.world().resource::<FishingSession>();
    assert_eq!(session.escapes, 0);
}

#[test]
fn test_cancel_on_last_frame_of_cast_wins() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Casting);

    assert!(run_until(&mut app, 120, |app| {
        phase_remaining(app).is_some_and(|secs| secs <= 1.0 / 60.0 + 1e-4)
    }));
    assert_eq!(current_state(&app), GameState::Casting);

    tap(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(current_state(&app), GameState::Walking);
    assert_eq!(current_screen(&app), Screen::Cove);
}

#[test]
fn test_line_recomputed_once_for_move_and_cast_together() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    track_changes::<Bobber>(&mut app);

    // Turn toward the pond on the left while casting in the same frame.
    app.world_mut().send_event(MoveAttemptEvent {
        dx: -1,
        dy: 0,
        facing: Facing::Left,
    });
    tap(&mut app, KeyCode::Space);
    app.update();
    app.update();
    app.update();

    assert_eq!(current_state(&app), GameState::Casting);
    assert_eq!(changed_frames::<Bobber>(&app), 1);
}

#[test]
fn test_unanswered_bite_escapes() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);

    assert!(run_until(&mut app, 200, |app| current_state(app) == GameState::Escaped));
    let session = app.world().resource::<FishingSession>();
    assert_eq!(session.escapes, 1);
    assert_eq!(session.catches, 0);
}

#[test]
fn test_escape_reels_in_without_leaving() {
    let mut app = build_test_app(test_config());
    walk_to_dock(&mut app);
    tap(&mut app, KeyCode::Space);
    app.update();
    assert_eq!(current_state(&app), GameState::Casting);

    tap(&mut app, KeyCode::Escape);
    app.update();
    assert_eq!(current_state(&app), GameState::Walking);
    assert_eq!(current_screen(&app), Screen::Cove);
    assert!(!line_visible(&mut app));
}

// ─────────────────────────────────────────────────────────────────────────────
// Time of day
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_night_tint_and_fireflies() {
    let config = CoveConfig {
        start_hour: 22.0,
        ..test_config()
    };
    let mut app = build_test_app(config);
    assert_eq!(*app.world().resource::<TimeOfDay>(), TimeOfDay::Night);
    app.update();

    let (r, g, b, a) = tint_for(TimeOfDay::Night);
    let world = app.world_mut();
    let mut tint = world.query_filtered::<&Sprite, With<LightingTint>>();
    assert_eq!(tint.single(world).color, Color::srgba(r, g, b, a));

    let mut particles = world.query::<(&AmbientParticle, &Visibility)>();
    for (particle, visibility) in particles.iter(world) {
        match particle.kind {
            ParticleKind::Firefly => assert_ne!(*visibility, Visibility::Hidden),
            ParticleKind::Butterfly => assert_eq!(*visibility, Visibility::Hidden),
            ParticleKind::Leaf => {}
        }
    }
}

#[test]
fn test_skip_hour_moves_day_into_dusk() {
    let config = CoveConfig {
        start_hour: 16.5,
        ..test_config()
    };
    let mut app = build_test_app(config);
    assert_eq!(*app.world().resource::<TimeOfDay>(), TimeOfDay::Day);

    tap(&mut app, KeyCode::KeyT);
    assert_eq!(*app.world().resource::<TimeOfDay>(), TimeOfDay::Dusk);
    assert!((app.world().resource::<CoveClock>().hour - 17.5).abs() < 1e-3);
}
