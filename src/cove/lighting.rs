//! Time-of-day lighting overlay.
//!
//! A full-canvas tint sprite sits above every layer except the fishing
//! overlay and is recoloured every frame from the host's time of day. A
//! constant vignette darkens the edges.

use bevy::prelude::*;

use crate::config::CoveConfig;
use crate::shared::*;

const VIGNETTE_DEPTH: f32 = 40.0;
/// Each band is this many nested strips, fading toward the centre.
const VIGNETTE_STEPS: usize = 4;

#[derive(Component, Debug)]
pub struct LightingTint;

#[derive(Component, Debug)]
pub struct Vignette;

/// Overlay colour for a time of day as straight (r, g, b, a).
pub fn tint_for(time_of_day: TimeOfDay) -> (f32, f32, f32, f32) {
    match time_of_day {
        TimeOfDay::Day => (1.0, 1.0, 1.0, 0.0),
        TimeOfDay::Dawn => (1.0, 0.78, 0.55, 0.12),
        TimeOfDay::Dusk => (1.0, 0.50, 0.18, 0.25),
        TimeOfDay::Night => (0.04, 0.07, 0.26, 0.48),
    }
}

pub fn spawn_lighting_layer(parent: &mut ChildBuilder, config: &CoveConfig, time_of_day: TimeOfDay) {
    let (r, g, b, a) = tint_for(time_of_day);
    parent.spawn((
        LightingTint,
        Sprite {
            color: Color::srgba(r, g, b, a),
            custom_size: Some(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_LIGHTING),
    ));

    if config.vignette_alpha <= 0.0 {
        return;
    }

    // Nested edge strips; overlapping strips stack so the very edge is darkest.
    let step_alpha = config.vignette_alpha / VIGNETTE_STEPS as f32;
    for i in 0..VIGNETTE_STEPS {
        let depth = VIGNETTE_DEPTH * (i + 1) as f32 / VIGNETTE_STEPS as f32;
        let color = Color::srgba(0.0, 0.0, 0.0, step_alpha);
        let z = Z_LIGHTING + 0.1 + i as f32 * 0.01;
        let half_w = SCREEN_WIDTH / 2.0;
        let half_h = SCREEN_HEIGHT / 2.0;
        let strips = [
            (Vec2::new(SCREEN_WIDTH, depth), Vec2::new(0.0, half_h - depth / 2.0)),
            (Vec2::new(SCREEN_WIDTH, depth), Vec2::new(0.0, -half_h + depth / 2.0)),
            (Vec2::new(depth, SCREEN_HEIGHT), Vec2::new(-half_w + depth / 2.0, 0.0)),
            (Vec2::new(depth, SCREEN_HEIGHT), Vec2::new(half_w - depth / 2.0, 0.0)),
        ];
        for (size, offset) in strips {
            parent.spawn((
                Vignette,
                Sprite {
                    color,
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_translation(offset.extend(z)),
            ));
        }
    }
}

pub fn update_lighting(
    time_of_day: Res<TimeOfDay>,
    mut query: Query<&mut Sprite, With<LightingTint>>,
) {
    let (r, g, b, a) = tint_for(*time_of_day);
    for mut sprite in query.iter_mut() {
        sprite.color = Color::srgba(r, g, b, a);
    }
}
