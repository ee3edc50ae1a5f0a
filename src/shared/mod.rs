//! Shared components, resources, events, and states for Fishing Cove.
//!
//! This is the type contract between the host screen and the cove renderer.
//! The renderer reads host-owned state from here and reports back through
//! the events defined below. Neither domain imports from the other directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// SCREEN: mount / unmount of the minigame
// ═══════════════════════════════════════════════════════════════════════

/// Which screen is mounted. The cove renderer only exists while `Cove` is
/// active; leaving it tears down every render entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum Screen {
    #[default]
    Cove,
    Away,
}

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: owned by the host, read by the renderer
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Walking,
    Casting,
    Waiting,
    FishAppeared,
    Reeling,
    Caught,
    Escaped,
}

impl GameState {
    /// Every state except `Walking` shows the rod and the fishing line.
    pub fn is_fishing(self) -> bool {
        self != GameState::Walking
    }

    pub fn label(self) -> &'static str {
        match self {
            GameState::Walking => "walking",
            GameState::Casting => "casting",
            GameState::Waiting => "waiting",
            GameState::FishAppeared => "fish_appeared",
            GameState::Reeling => "reeling",
            GameState::Caught => "caught",
            GameState::Escaped => "escaped",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TIME OF DAY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeOfDay {
    Dawn,
    #[default]
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// Buckets an hour (0.0 - 24.0, wrapping) into a time-of-day label.
    pub fn from_hour(hour: f32) -> Self {
        let h = hour.rem_euclid(24.0);
        if (5.0..8.0).contains(&h) {
            TimeOfDay::Dawn
        } else if (8.0..17.0).contains(&h) {
            TimeOfDay::Day
        } else if (17.0..20.0).contains(&h) {
            TimeOfDay::Dusk
        } else {
            TimeOfDay::Night
        }
    }

    /// Fireflies come out after sunset.
    pub fn is_dark(self) -> bool {
        matches!(self, TimeOfDay::Dusk | TimeOfDay::Night)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Dawn => "dawn",
            TimeOfDay::Day => "day",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Night => "night",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Grid delta for one step in this direction. Rows grow downward.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Facing::Left | Facing::Right)
    }
}

/// Logical grid position of the player. Owned by the host screen; the
/// renderer reads it and asks for changes through `PlayerMovedEvent`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPosition {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

impl Default for PlayerPosition {
    fn default() -> Self {
        Self {
            x: 10,
            y: 5,
            facing: Facing::Down,
        }
    }
}

/// Host-side copy of the renderer's "facing water" signal. Enables casting.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastAvailability(pub bool);

// ═══════════════════════════════════════════════════════════════════════
// TILES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Grass,
    Water,
    Sand,
    Flowers,
    Path,
    Tree,
    Rock,
    Bush,
    Dock,
    TallGrass,
    Lily,
}

impl TileKind {
    pub const ALL: [TileKind; 11] = [
        TileKind::Grass,
        TileKind::Water,
        TileKind::Sand,
        TileKind::Flowers,
        TileKind::Path,
        TileKind::Tree,
        TileKind::Rock,
        TileKind::Bush,
        TileKind::Dock,
        TileKind::TallGrass,
        TileKind::Lily,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        match self {
            TileKind::Grass => 0,
            TileKind::Water => 1,
            TileKind::Sand => 2,
            TileKind::Flowers => 3,
            TileKind::Path => 4,
            TileKind::Tree => 5,
            TileKind::Rock => 6,
            TileKind::Bush => 7,
            TileKind::Dock => 8,
            TileKind::TallGrass => 9,
            TileKind::Lily => 10,
        }
    }

    pub fn is_walkable(self) -> bool {
        !matches!(
            self,
            TileKind::Water | TileKind::Tree | TileKind::Rock | TileKind::Lily
        )
    }

    /// Water and lily cells: animated every frame, valid cast targets.
    pub fn is_water(self) -> bool {
        matches!(self, TileKind::Water | TileKind::Lily)
    }

    /// Cells that get a sprite on the decoration layer above the ground.
    pub fn is_decoration(self) -> bool {
        matches!(
            self,
            TileKind::Tree | TileKind::Rock | TileKind::Bush | TileKind::Flowers | TileKind::TallGrass
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Host → renderer: try to step by `(dx, dy)` while turning to `facing`.
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveAttemptEvent {
    pub dx: i32,
    pub dy: i32,
    pub facing: Facing,
}

/// Renderer → host: the result of a move attempt changed position or facing.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMovedEvent {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

/// Renderer → host: the player started or stopped facing water.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanFishChangedEvent {
    pub can_fish: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM SETS
// ═══════════════════════════════════════════════════════════════════════

/// The renderer's per-frame chain. Host input runs before it; host
/// callbacks that consume renderer events run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoveSystems;

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const MAP_WIDTH: usize = 24;
pub const MAP_HEIGHT: usize = 14;
pub const TILE_SIZE: f32 = 32.0;
pub const SCREEN_WIDTH: f32 = MAP_WIDTH as f32 * TILE_SIZE;
pub const SCREEN_HEIGHT: f32 = MAP_HEIGHT as f32 * TILE_SIZE;

// Layer order. Later layers composite over earlier ones; lighting tints
// everything below it and the fishing overlay stays readable on top.
pub const Z_TILES: f32 = 0.0;
pub const Z_WATER: f32 = 10.0;
pub const Z_DECOR: f32 = 20.0;
pub const Z_PLAYER: f32 = 30.0;
pub const Z_PARTICLES: f32 = 40.0;
pub const Z_LIGHTING: f32 = 50.0;
pub const Z_FISHING: f32 = 60.0;

/// Converts a pixel position on the canvas (origin top-left, y down) into
/// Bevy world space (origin at the canvas centre, y up).
pub fn canvas_to_world(px: Vec2) -> Vec2 {
    Vec2::new(px.x - SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0 - px.y)
}

/// Pixel centre of a (possibly fractional) grid cell on the canvas.
pub fn grid_to_canvas(grid: Vec2) -> Vec2 {
    grid * TILE_SIZE + Vec2::splat(TILE_SIZE / 2.0)
}

pub fn grid_to_world(grid: Vec2) -> Vec2 {
    canvas_to_world(grid_to_canvas(grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_stack_in_draw_order() {
        let order = [
            Z_TILES,
            Z_WATER,
            Z_DECOR,
            Z_PLAYER,
            Z_PARTICLES,
            Z_LIGHTING,
            Z_FISHING,
        ];
        for pair in order.windows(2) {
            assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_grid_to_world_centres_the_map() {
        let top_left = grid_to_world(Vec2::ZERO);
        assert_eq!(top_left, Vec2::new(-368.0, 208.0));
    }
}
