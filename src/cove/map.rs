//! The cove tile map.
//!
//! A fixed 24×14 grid of tile codes compiled into the binary. Row 0 is the
//! top of the screen. The pond fills the bottom rows and a wooden dock runs
//! down the path into it at column 10.

use bevy::prelude::*;

use crate::shared::*;

// Codes: 0 grass, 1 water, 2 sand, 3 flowers, 4 path, 5 tree, 6 rock,
// 7 bush, 8 dock, 9 tall grass, 10 lily.
#[rustfmt::skip]
const COVE_LAYOUT: [[u8; MAP_WIDTH]; MAP_HEIGHT] = [
    [5, 5, 0, 0, 3, 0, 0, 5, 0, 0, 4, 0, 0, 0, 9, 9, 0, 5, 0, 3, 0, 0, 5, 5],
    [5, 0, 0, 9, 0, 0, 3, 0, 0, 0, 4, 0, 0, 7, 0, 0, 0, 0, 0, 0, 6, 0, 0, 5],
    [0, 0, 3, 0, 0, 7, 0, 0, 0, 0, 4, 0, 0, 0, 0, 3, 0, 9, 9, 0, 0, 0, 3, 0],
    [0, 9, 0, 0, 0, 0, 0, 6, 0, 0, 4, 4, 4, 4, 0, 0, 0, 0, 0, 0, 7, 0, 0, 0],
    [0, 9, 9, 0, 3, 0, 0, 0, 0, 0, 4, 0, 0, 4, 0, 0, 6, 0, 0, 0, 0, 0, 9, 0],
    [7, 0, 0, 0, 0, 0, 9, 0, 0, 0, 4, 0, 0, 4, 0, 0, 0, 0, 3, 0, 0, 0, 0, 5],
    [0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 4, 4, 0, 0, 0, 0, 0, 9, 0, 0, 5],
    [0, 0, 0, 2, 2, 2, 2, 2, 2, 2, 8, 2, 2, 2, 2, 2, 2, 2, 2, 2, 0, 0, 7, 0],
    [0, 0, 2, 2, 1, 1, 1, 1, 1, 2, 8, 2, 1, 1, 1, 1, 1, 1, 2, 2, 2, 0, 0, 0],
    [0, 2, 2, 1, 1, 10, 1, 1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 1, 1, 2, 2, 0, 6, 0],
    [0, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 2, 0, 0, 0],
    [2, 2, 1, 10, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 0, 3],
    [2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 1, 1, 1, 1, 1, 2, 2, 0],
    [1, 1, 1, 1, 1, 1, 1, 10, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2],
];

/// The immutable tile map for the session.
#[derive(Resource, Debug, Clone)]
pub struct CoveMap {
    /// Row-major tile data: tiles[y * MAP_WIDTH + x]
    tiles: Vec<TileKind>,
}

impl Default for CoveMap {
    fn default() -> Self {
        Self::from_codes(&COVE_LAYOUT)
    }
}

impl CoveMap {
    /// Builds a map from raw codes. Unknown codes read as grass.
    pub fn from_codes(rows: &[[u8; MAP_WIDTH]; MAP_HEIGHT]) -> Self {
        let tiles = rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|&code| TileKind::from_code(code).unwrap_or(TileKind::Grass))
            .collect();
        Self { tiles }
    }

    pub fn width(&self) -> usize {
        MAP_WIDTH
    }

    pub fn height(&self) -> usize {
        MAP_HEIGHT
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < MAP_WIDTH as i32 && y < MAP_HEIGHT as i32
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<TileKind> {
        if self.in_bounds(x, y) {
            Some(self.tiles[y as usize * MAP_WIDTH + x as usize])
        } else {
            None
        }
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_some_and(TileKind::is_walkable)
    }

    /// True iff the single cell in front of `(x, y)` is water or a lily pad.
    pub fn is_water_adjacent(&self, x: i32, y: i32, facing: Facing) -> bool {
        let (dx, dy) = facing.offset();
        self.get_tile(x + dx, y + dy).is_some_and(TileKind::is_water)
    }

    /// Iterate `(x, y, kind)` over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(|(i, &kind)| {
            ((i % MAP_WIDTH) as i32, (i / MAP_WIDTH) as i32, kind)
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TILE COLORS
// ═══════════════════════════════════════════════════════════════════════

/// Ground colour drawn on the static tile layer. Decorations sit on grass;
/// lily pads sit on water.
pub fn ground_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Grass | TileKind::Tree | TileKind::Rock | TileKind::Bush => {
            Color::srgb(0.42, 0.70, 0.38)
        }
        TileKind::Flowers => Color::srgb(0.45, 0.72, 0.40),
        TileKind::TallGrass => Color::srgb(0.36, 0.62, 0.32),
        TileKind::Water | TileKind::Lily => Color::srgb(0.27, 0.55, 0.80),
        TileKind::Sand => Color::srgb(0.93, 0.85, 0.62),
        TileKind::Path => Color::srgb(0.78, 0.66, 0.48),
        TileKind::Dock => Color::srgb(0.58, 0.40, 0.24),
    }
}

/// Subtle checkerboard so the grid reads without outlines.
pub fn ground_shade(x: i32, y: i32) -> f32 {
    if (x + y) % 2 == 0 {
        1.0
    } else {
        0.95
    }
}
