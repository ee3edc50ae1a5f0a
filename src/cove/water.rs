//! Animated water layer.
//!
//! Every water and lily cell owns one shimmer sprite that is redrawn each
//! frame from a global wave clock. Lily cells also carry a pad that bobs.
//! Each cell's phase is offset by `(x + y) * 0.5` so neighbours never move
//! in lockstep.

use bevy::prelude::*;

use crate::shared::*;
use super::map::CoveMap;

const SHIMMER_SPEED: f32 = 2.0;
const SHIMMER_TRAVEL: f32 = 5.0;
const LILY_BOB_SPEED: f32 = 1.3;
const LILY_BOB_AMOUNT: f32 = 1.5;

/// Global wave-time accumulator in seconds.
#[derive(Resource, Debug, Default)]
pub struct WaveClock {
    pub elapsed: f32,
}

#[derive(Component, Debug)]
pub struct WaterShimmer {
    pub phase_offset: f32,
    pub base: Vec2,
}

#[derive(Component, Debug)]
pub struct LilyPad {
    pub phase_offset: f32,
    pub base: Vec2,
}

pub fn cell_phase(x: i32, y: i32) -> f32 {
    (x + y) as f32 * 0.5
}

/// Wave value in -1.0..=1.0 for a cell at a given wave time.
pub fn wave(wave_time: f32, phase_offset: f32) -> f32 {
    (wave_time * SHIMMER_SPEED + phase_offset).sin()
}

/// Opacity of the highlight stripe. Always visible, never opaque.
pub fn shimmer_alpha(wave_value: f32) -> f32 {
    0.14 + 0.10 * wave_value
}

pub fn spawn_water_layer(parent: &mut ChildBuilder, map: &CoveMap) {
    for (x, y, kind) in map.cells().filter(|c| c.2.is_water()) {
        let base = grid_to_world(Vec2::new(x as f32, y as f32));
        let phase_offset = cell_phase(x, y);

        parent.spawn((
            WaterShimmer { phase_offset, base },
            Sprite {
                color: Color::srgba(1.0, 1.0, 1.0, shimmer_alpha(0.0)),
                custom_size: Some(Vec2::new(TILE_SIZE * 0.55, 2.0)),
                ..default()
            },
            Transform::from_translation(base.extend(Z_WATER)),
        ));

        if kind == TileKind::Lily {
            parent
                .spawn((
                    LilyPad { phase_offset, base },
                    Sprite {
                        color: Color::srgb(0.30, 0.62, 0.30),
                        custom_size: Some(Vec2::new(18.0, 14.0)),
                        ..default()
                    },
                    Transform::from_translation(base.extend(Z_WATER + 1.0)),
                ))
                .with_children(|pad| {
                    pad.spawn((
                        Sprite {
                            color: Color::srgb(0.97, 0.75, 0.85),
                            custom_size: Some(Vec2::splat(5.0)),
                            ..default()
                        },
                        Transform::from_xyz(3.0, 2.0, 0.1),
                    ));
                });
        }
    }
}

pub fn advance_wave_clock(time: Res<Time>, mut clock: ResMut<WaveClock>) {
    clock.elapsed += time.delta_secs();
}

pub fn animate_water(
    clock: Res<WaveClock>,
    mut shimmer_query: Query<(&WaterShimmer, &mut Transform, &mut Sprite)>,
    mut lily_query: Query<(&LilyPad, &mut Transform), Without<WaterShimmer>>,
) {
    let t = clock.elapsed;

    for (shimmer, mut transform, mut sprite) in shimmer_query.iter_mut() {
        let w = wave(t, shimmer.phase_offset);
        transform.translation.x = shimmer.base.x + w * 3.0;
        transform.translation.y = shimmer.base.y + (t * 1.1 + shimmer.phase_offset).cos() * SHIMMER_TRAVEL;
        transform.scale.x = 0.7 + 0.3 * w.abs();
        sprite.color = Color::srgba(1.0, 1.0, 1.0, shimmer_alpha(w));
    }

    for (lily, mut transform) in lily_query.iter_mut() {
        let bob = (t * LILY_BOB_SPEED + lily.phase_offset).sin();
        transform.translation.y = lily.base.y + bob * LILY_BOB_AMOUNT;
        transform.rotation = Quat::from_rotation_z(bob * 0.08);
    }
}
