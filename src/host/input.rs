use bevy::prelude::*;

use crate::shared::*;

/// Seconds a movement key must be held before it repeats.
const STEP_REPEAT_DELAY: f32 = 0.22;
/// Seconds between repeated steps while held.
const STEP_REPEAT_INTERVAL: f32 = 0.14;

/// This frame's keyboard intents. Rebuilt from scratch every frame.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct HostInput {
    /// One grid step in this direction.
    pub step: Option<Facing>,
    /// Space: cast while walking, hook while a fish shows.
    pub action: bool,
    /// Escape: reel in, or leave the cove while walking.
    pub cancel: bool,
    /// T: jump the clock forward an hour.
    pub skip_hour: bool,
    /// Enter: come back to the cove.
    pub enter: bool,
}

const STEP_KEYS: [(Facing, KeyCode, KeyCode); 4] = [
    (Facing::Up, KeyCode::KeyW, KeyCode::ArrowUp),
    (Facing::Down, KeyCode::KeyS, KeyCode::ArrowDown),
    (Facing::Left, KeyCode::KeyA, KeyCode::ArrowLeft),
    (Facing::Right, KeyCode::KeyD, KeyCode::ArrowRight),
];

/// The single point where hardware input becomes host intents.
pub fn read_host_input(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<HostInput>,
    mut held_for: Local<f32>,
    mut since_step: Local<f32>,
) {
    *input = HostInput::default();

    let just = STEP_KEYS
        .iter()
        .find(|(_, a, b)| keys.just_pressed(*a) || keys.just_pressed(*b))
        .map(|(facing, _, _)| *facing);
    let held = STEP_KEYS
        .iter()
        .find(|(_, a, b)| keys.pressed(*a) || keys.pressed(*b))
        .map(|(facing, _, _)| *facing);

    if let Some(facing) = just {
        input.step = Some(facing);
        *held_for = 0.0;
        *since_step = 0.0;
    } else if let Some(facing) = held {
        let dt = time.delta_secs();
        *held_for += dt;
        *since_step += dt;
        if *held_for >= STEP_REPEAT_DELAY && *since_step >= STEP_REPEAT_INTERVAL {
            input.step = Some(facing);
            *since_step = 0.0;
        }
    } else {
        *held_for = 0.0;
        *since_step = 0.0;
    }

    input.action = keys.just_pressed(KeyCode::Space);
    input.cancel = keys.just_pressed(KeyCode::Escape);
    input.skip_hour = keys.just_pressed(KeyCode::KeyT);
    input.enter = keys.just_pressed(KeyCode::Enter);
}

pub fn handle_return_to_cove(input: Res<HostInput>, mut next_screen: ResMut<NextState<Screen>>) {
    if input.enter {
        info!("[Host] Returning to the cove");
        next_screen.set(Screen::Cove);
    }
}
