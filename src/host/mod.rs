//! Host screen for the cove minigame.
//!
//! Owns everything the renderer treats as props: the logical player
//! position, the game state, and the time of day. Turns keyboard input into
//! move attempts and fishing actions, and applies the renderer's callbacks.

use bevy::prelude::*;

use crate::config::CoveConfig;
use crate::shared::*;

pub mod clock;
pub mod fishing;
pub mod hud;
pub mod input;

pub use clock::CoveClock;
pub use fishing::FishingSession;
pub use input::HostInput;

pub struct HostPlugin;

impl Plugin for HostPlugin {
    fn build(&self, app: &mut App) {
        // The initial OnEnter(Screen::Cove) runs before Startup, so the props
        // the renderer mounts with are seeded here.
        let config = app
            .world()
            .get_resource::<CoveConfig>()
            .cloned()
            .unwrap_or_default();
        let (position, clock, time_of_day) = host_props_from_config(&config);
        info!(
            "[Host] Player starts at ({}, {}) at {:.1}h ({})",
            position.x,
            position.y,
            clock.hour,
            time_of_day.label()
        );

        app.insert_resource(position)
            .insert_resource(clock)
            .insert_resource(time_of_day)
            .init_resource::<CastAvailability>()
            .init_resource::<FishingSession>()
            .init_resource::<HostInput>()
            .add_systems(
                PreUpdate,
                input::read_host_input.after(bevy::input::InputSystem),
            )
            // Input → intents, before the renderer sees this frame's events.
            .add_systems(
                Update,
                (
                    send_move_attempts,
                    fishing::handle_cast_input,
                    fishing::handle_cancel_input,
                    clock::handle_skip_hour,
                )
                    .chain()
                    .before(CoveSystems)
                    .run_if(in_state(Screen::Cove)),
            )
            // Renderer callbacks and timers, after the renderer ran.
            .add_systems(
                Update,
                (
                    apply_player_moved,
                    apply_can_fish_changed,
                    fishing::arm_phase_timer.run_if(state_changed::<GameState>),
                    fishing::tick_phase_timer,
                    clock::tick_clock,
                )
                    .chain()
                    .after(CoveSystems)
                    .run_if(in_state(Screen::Cove)),
            )
            .add_systems(Update, input::handle_return_to_cove.run_if(in_state(Screen::Away)))
            .add_systems(OnEnter(Screen::Cove), hud::spawn_hud)
            .add_systems(Update, hud::update_hud.run_if(in_state(Screen::Cove)))
            .add_systems(OnExit(Screen::Cove), (hud::despawn_hud, reset_host_on_leave));
    }
}

/// Host-owned props seeded from the loaded config.
pub fn host_props_from_config(config: &CoveConfig) -> (PlayerPosition, CoveClock, TimeOfDay) {
    let position = PlayerPosition {
        x: config.start_x,
        y: config.start_y,
        facing: Facing::Down,
    };
    let clock = CoveClock {
        hour: config.start_hour,
        minutes_per_second: config.minutes_per_second,
    };
    let time_of_day = TimeOfDay::from_hour(clock.hour);
    (position, clock, time_of_day)
}

fn send_move_attempts(input: Res<HostInput>, mut attempts: EventWriter<MoveAttemptEvent>) {
    if let Some(facing) = input.step {
        let (dx, dy) = facing.offset();
        attempts.send(MoveAttemptEvent { dx, dy, facing });
    }
}

fn apply_player_moved(mut events: EventReader<PlayerMovedEvent>, mut position: ResMut<PlayerPosition>) {
    for ev in events.read() {
        position.set_if_neq(PlayerPosition {
            x: ev.x,
            y: ev.y,
            facing: ev.facing,
        });
    }
}

fn apply_can_fish_changed(
    mut events: EventReader<CanFishChangedEvent>,
    mut availability: ResMut<CastAvailability>,
) {
    for ev in events.read() {
        availability.set_if_neq(CastAvailability(ev.can_fish));
    }
}

/// Leaving the screen drops any cast in progress.
fn reset_host_on_leave(
    mut next_state: ResMut<NextState<GameState>>,
    mut session: ResMut<FishingSession>,
) {
    next_state.set(GameState::Walking);
    session.timer = None;
}
