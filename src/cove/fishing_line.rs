//! Fishing line and bobber overlay, drawn above the lighting layer.
//!
//! Geometry is recomputed only when the game state, the player's cell or the
//! facing changes. The bobber's bob is animated every frame.

use bevy::prelude::*;

use crate::shared::*;
use super::CoveSurface;

/// Line length while the cast is in flight.
pub const CAST_DISTANCE: f32 = 30.0;
/// Line length once the bobber has landed.
pub const WAITING_DISTANCE: f32 = 70.0;

#[derive(Component, Debug)]
pub struct FishingLine;

#[derive(Component, Debug, Default)]
pub struct Bobber {
    /// Resting world position, set by the last recompute.
    pub base: Vec2,
}

/// Canvas-space endpoint of the line for a player centred at `origin`.
/// `None` while walking: no line is drawn.
pub fn line_endpoint(origin: Vec2, facing: Facing, state: GameState) -> Option<Vec2> {
    let distance = match state {
        GameState::Walking => return None,
        GameState::Casting => CAST_DISTANCE,
        _ => WAITING_DISTANCE,
    };
    let (dx, dy) = facing.offset();
    let offset = if facing.is_horizontal() {
        Vec2::new(dx as f32 * distance, 0.0)
    } else {
        Vec2::new(0.0, dy as f32 * distance)
    };
    Some(origin + offset)
}

pub fn spawn_fishing_layer(parent: &mut ChildBuilder) {
    parent.spawn((
        FishingLine,
        Sprite {
            color: Color::srgba(0.95, 0.95, 0.95, 0.85),
            custom_size: Some(Vec2::new(1.0, 1.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_FISHING),
        Visibility::Hidden,
    ));
    parent
        .spawn((
            Bobber::default(),
            Sprite {
                color: Color::srgb(0.92, 0.22, 0.20),
                custom_size: Some(Vec2::new(6.0, 6.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, Z_FISHING + 0.1),
            Visibility::Hidden,
        ))
        .with_children(|bobber| {
            bobber.spawn((
                Sprite {
                    color: Color::WHITE,
                    custom_size: Some(Vec2::new(6.0, 2.0)),
                    ..default()
                },
                Transform::from_xyz(0.0, 2.0, 0.1),
            ));
        });
}

/// Rebuild line and bobber geometry from state, cell and facing. Skips
/// frames where none of them changed and the surface was not just mounted.
pub fn recompute_fishing_line(
    state: Res<State<GameState>>,
    position: Res<PlayerPosition>,
    surface: Option<Res<CoveSurface>>,
    mut line_query: Query<(&mut Transform, &mut Sprite, &mut Visibility), (With<FishingLine>, Without<Bobber>)>,
    mut bobber_query: Query<(&mut Bobber, &mut Transform, &mut Visibility), Without<FishingLine>>,
) {
    let mounted = surface.is_some_and(|surface| surface.is_added());
    if !(state.is_changed() || position.is_changed() || mounted) {
        return;
    }

    let origin = grid_to_canvas(Vec2::new(position.x as f32, position.y as f32));
    let endpoint = line_endpoint(origin, position.facing, *state.get());

    let Some(end) = endpoint else {
        for (_, _, mut visibility) in line_query.iter_mut() {
            *visibility = Visibility::Hidden;
        }
        for (_, _, mut visibility) in bobber_query.iter_mut() {
            *visibility = Visibility::Hidden;
        }
        return;
    };

    let start_w = canvas_to_world(origin);
    let end_w = canvas_to_world(end);
    let span = end_w - start_w;
    let mid = (start_w + end_w) / 2.0;

    for (mut transform, mut sprite, mut visibility) in line_query.iter_mut() {
        sprite.custom_size = Some(Vec2::new(span.length(), 1.0));
        transform.translation.x = mid.x;
        transform.translation.y = mid.y;
        transform.rotation = Quat::from_rotation_z(span.y.atan2(span.x));
        *visibility = Visibility::Inherited;
    }
    for (mut bobber, mut transform, mut visibility) in bobber_query.iter_mut() {
        bobber.base = end_w;
        transform.translation.x = end_w.x;
        transform.translation.y = end_w.y;
        *visibility = Visibility::Inherited;
    }
}

/// Gentle bob on the water; a fast deep dip once a fish shows up.
pub fn animate_bobber(
    time: Res<Time>,
    state: Res<State<GameState>>,
    mut query: Query<(&Bobber, &mut Transform)>,
) {
    let bite = *state.get() == GameState::FishAppeared;
    let bob_speed = if bite { 9.0 } else { 2.0 };
    let bob_amplitude = if bite { 3.0 } else { 1.0 };
    let bob_y = (time.elapsed_secs() * bob_speed).sin() * bob_amplitude;

    for (bobber, mut transform) in query.iter_mut() {
        transform.translation.y = bobber.base.y + bob_y;
    }
}
