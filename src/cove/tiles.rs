//! Static layers: ground tiles and decorations.
//!
//! Both are spawned once on mount and never touched again.

use bevy::prelude::*;

use crate::shared::*;
use super::map::{ground_color, ground_shade, CoveMap};

/// Marker for ground tile sprites.
#[derive(Component, Debug)]
pub struct MapTile {
    pub x: i32,
    pub y: i32,
}

/// Marker for a decoration group (tree, rock, bush, flowers, tall grass).
#[derive(Component, Debug)]
pub struct Decoration {
    pub kind: TileKind,
}

const TRUNK: Color = Color::srgb(0.45, 0.30, 0.18);
const CANOPY: Color = Color::srgb(0.20, 0.50, 0.25);
const CANOPY_LIGHT: Color = Color::srgb(0.30, 0.62, 0.32);
const ROCK: Color = Color::srgb(0.55, 0.55, 0.58);
const ROCK_LIGHT: Color = Color::srgb(0.68, 0.68, 0.70);
const BUSH: Color = Color::srgb(0.26, 0.56, 0.28);
const BERRY: Color = Color::srgb(0.85, 0.25, 0.35);
const GRASS_BLADE: Color = Color::srgb(0.28, 0.52, 0.26);
const PETALS: [Color; 3] = [
    Color::srgb(0.98, 0.85, 0.30),
    Color::srgb(0.95, 0.55, 0.70),
    Color::srgb(0.95, 0.95, 0.95),
];

fn cell_translation(x: i32, y: i32, z: f32) -> Vec3 {
    grid_to_world(Vec2::new(x as f32, y as f32)).extend(z)
}

fn rect(color: Color, w: f32, h: f32, x: f32, y: f32, z: f32) -> (Sprite, Transform) {
    (
        Sprite {
            color,
            custom_size: Some(Vec2::new(w, h)),
            ..default()
        },
        Transform::from_translation(Vec3::new(x, y, z)),
    )
}

/// One sprite per map cell. Water and lily cells get their base colour here;
/// their animation lives on the water layer above.
pub fn spawn_tile_layer(parent: &mut ChildBuilder, map: &CoveMap) {
    for (x, y, kind) in map.cells() {
        let base = ground_color(kind).to_srgba();
        let shade = ground_shade(x, y);
        parent.spawn((
            Sprite {
                color: Color::srgb(base.red * shade, base.green * shade, base.blue * shade),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(cell_translation(x, y, Z_TILES)),
            MapTile { x, y },
        ));

        // Dock planks.
        if kind == TileKind::Dock {
            for i in 0..3 {
                let py = TILE_SIZE / 2.0 - 5.0 - i as f32 * 11.0;
                let (sprite, mut transform) = rect(
                    Color::srgb(0.40, 0.27, 0.15),
                    TILE_SIZE,
                    1.5,
                    0.0,
                    py,
                    0.1,
                );
                transform.translation += cell_translation(x, y, Z_TILES);
                parent.spawn((sprite, transform));
            }
        }
    }
}

/// Trees, rocks, bushes, flowers and tall grass drawn over the ground.
pub fn spawn_decoration_layer(parent: &mut ChildBuilder, map: &CoveMap) {
    for (x, y, kind) in map.cells().filter(|c| c.2.is_decoration()) {
        // Later rows overlap earlier ones.
        let z = Z_DECOR + y as f32 * 0.01;
        parent
            .spawn((
                Decoration { kind },
                Transform::from_translation(cell_translation(x, y, z)),
                Visibility::default(),
            ))
            .with_children(|deco| match kind {
                TileKind::Tree => {
                    deco.spawn(rect(TRUNK, 6.0, 12.0, 0.0, -10.0, 0.0));
                    deco.spawn(rect(CANOPY, 26.0, 20.0, 0.0, 4.0, 0.1));
                    deco.spawn(rect(CANOPY_LIGHT, 14.0, 8.0, -4.0, 9.0, 0.2));
                }
                TileKind::Rock => {
                    deco.spawn(rect(ROCK, 20.0, 14.0, 0.0, -4.0, 0.0));
                    deco.spawn(rect(ROCK_LIGHT, 10.0, 5.0, -3.0, 0.0, 0.1));
                }
                TileKind::Bush => {
                    deco.spawn(rect(BUSH, 22.0, 16.0, 0.0, -3.0, 0.0));
                    deco.spawn(rect(BERRY, 3.0, 3.0, -5.0, 0.0, 0.1));
                    deco.spawn(rect(BERRY, 3.0, 3.0, 4.0, -4.0, 0.1));
                }
                TileKind::Flowers => {
                    let spots = [(-8.0, 6.0), (6.0, 8.0), (-2.0, -6.0), (9.0, -4.0)];
                    for (i, (fx, fy)) in spots.into_iter().enumerate() {
                        let petal = PETALS[(i + (x + y) as usize) % PETALS.len()];
                        deco.spawn(rect(petal, 4.0, 4.0, fx, fy, 0.0));
                    }
                }
                TileKind::TallGrass => {
                    for i in 0..5 {
                        let bx = -10.0 + i as f32 * 5.0;
                        let h = 10.0 + (i % 2) as f32 * 4.0;
                        deco.spawn(rect(GRASS_BLADE, 2.0, h, bx, -TILE_SIZE / 2.0 + h / 2.0 + 2.0, 0.0));
                    }
                }
                _ => {}
            });
    }
}
