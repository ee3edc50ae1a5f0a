//! Grid movement and the "facing water" signal.
//!
//! The renderer never writes the host's `PlayerPosition` directly. It
//! resolves move attempts against the map and reports the outcome through
//! `PlayerMovedEvent`; the host applies it.

use bevy::prelude::*;

use crate::shared::*;
use super::map::CoveMap;

/// Last water-adjacency value reported to the host. `None` until the first
/// report after mounting, so the host always hears the initial value.
#[derive(Resource, Debug, Default)]
pub struct WaterAdjacency(pub Option<bool>);

/// Resolve a single move attempt.
///
/// Outside `Walking` nothing changes. While walking the facing always turns
/// to `facing`; the position only changes if the destination is on the map
/// and walkable. Blocked moves are silently ignored.
pub fn try_move(
    map: &CoveMap,
    state: GameState,
    pos: PlayerPosition,
    dx: i32,
    dy: i32,
    facing: Facing,
) -> PlayerPosition {
    if state != GameState::Walking {
        return pos;
    }

    let mut next = PlayerPosition { facing, ..pos };
    let (tx, ty) = (pos.x + dx, pos.y + dy);
    if map.is_walkable(tx, ty) {
        next.x = tx;
        next.y = ty;
    }
    next
}

/// Resolve this frame's move attempts and tell the host about any change.
pub fn handle_move_attempts(
    mut attempts: EventReader<MoveAttemptEvent>,
    mut moved: EventWriter<PlayerMovedEvent>,
    map: Res<CoveMap>,
    state: Res<State<GameState>>,
    position: Res<PlayerPosition>,
) {
    let start = *position;
    let mut current = start;
    for attempt in attempts.read() {
        current = try_move(&map, *state.get(), current, attempt.dx, attempt.dy, attempt.facing);
    }

    if current != start {
        debug!(
            "[Cove] Player ({}, {}) {:?} -> ({}, {}) {:?}",
            start.x, start.y, start.facing, current.x, current.y, current.facing
        );
        moved.send(PlayerMovedEvent {
            x: current.x,
            y: current.y,
            facing: current.facing,
        });
    }
}

/// Recompute whether the player faces water after a move or a fresh mount;
/// report only when it flips.
pub fn report_water_adjacency(
    map: Res<CoveMap>,
    position: Res<PlayerPosition>,
    mut last: ResMut<WaterAdjacency>,
    mut events: EventWriter<CanFishChangedEvent>,
) {
    if !(position.is_changed() || last.is_added()) {
        return;
    }
    let can_fish = map.is_water_adjacent(position.x, position.y, position.facing);
    if last.0 != Some(can_fish) {
        last.0 = Some(can_fish);
        events.send(CanFishChangedEvent { can_fish });
    }
}
