//! Player sprite: smooth glide toward the logical cell, and pose redraws
//! that happen only when facing or fishing changes.

use bevy::prelude::*;

use crate::shared::*;

/// Fraction of the remaining distance covered on each update.
pub const VISUAL_BLEND: f32 = 0.2;

#[derive(Component, Debug)]
pub struct CovePlayer;

/// Floating-point grid position the sprite is drawn at. Chases the host's
/// logical position; nothing outside this module reads it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct VisualPosition(pub Vec2);

impl VisualPosition {
    pub fn step_toward(&mut self, target: Vec2) {
        self.0 += (target - self.0) * VISUAL_BLEND;
    }
}

/// The inputs the pose depends on. Writing an equal value is skipped, so
/// `Changed<PlayerPose>` only fires on a real change.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerPose {
    pub facing: Facing,
    pub is_fishing: bool,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPart {
    Eyes,
    Rod,
}

/// Where the pose-dependent parts sit relative to the player's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseLayout {
    /// Hidden when facing away from the camera.
    pub eyes: Option<Vec2>,
    /// Offset and z-rotation; only while fishing.
    pub rod: Option<(Vec2, f32)>,
}

pub fn pose_layout(pose: PlayerPose) -> PoseLayout {
    use std::f32::consts::FRAC_PI_4;

    let eyes = match pose.facing {
        Facing::Up => None,
        Facing::Down => Some(Vec2::new(0.0, 7.0)),
        Facing::Left => Some(Vec2::new(-3.0, 7.0)),
        Facing::Right => Some(Vec2::new(3.0, 7.0)),
    };

    let rod = pose.is_fishing.then(|| match pose.facing {
        Facing::Up => (Vec2::new(6.0, 12.0), 0.0),
        Facing::Down => (Vec2::new(6.0, -10.0), 0.0),
        Facing::Left => (Vec2::new(-10.0, 4.0), FRAC_PI_4),
        Facing::Right => (Vec2::new(10.0, 4.0), -FRAC_PI_4),
    });

    PoseLayout { eyes, rod }
}

fn part(color: Color, size: Vec2, offset: Vec2, z: f32) -> (Sprite, Transform) {
    (
        Sprite {
            color,
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(offset.extend(z)),
    )
}

pub fn spawn_player_layer(parent: &mut ChildBuilder, position: PlayerPosition, state: GameState) {
    let grid = Vec2::new(position.x as f32, position.y as f32);
    parent
        .spawn((
            CovePlayer,
            VisualPosition(grid),
            PlayerPose {
                facing: position.facing,
                is_fishing: state.is_fishing(),
            },
            Transform::from_translation(grid_to_world(grid).extend(Z_PLAYER)),
            Visibility::default(),
        ))
        .with_children(|p| {
            p.spawn(part(Color::srgba(0.0, 0.0, 0.0, 0.25), Vec2::new(16.0, 4.0), Vec2::new(0.0, -13.0), 0.0));
            p.spawn(part(Color::srgb(0.25, 0.45, 0.75), Vec2::new(14.0, 12.0), Vec2::new(0.0, -4.0), 0.1));
            p.spawn(part(Color::srgb(0.98, 0.82, 0.66), Vec2::new(12.0, 10.0), Vec2::new(0.0, 7.0), 0.2));
            p.spawn(part(Color::srgb(0.90, 0.78, 0.40), Vec2::new(16.0, 4.0), Vec2::new(0.0, 12.0), 0.3));
            p.spawn((
                PlayerPart::Eyes,
                part(Color::srgb(0.15, 0.12, 0.10), Vec2::new(6.0, 2.0), Vec2::new(0.0, 7.0), 0.4),
            ));
            p.spawn((
                PlayerPart::Rod,
                part(Color::srgb(0.50, 0.34, 0.20), Vec2::new(2.0, 18.0), Vec2::ZERO, 0.5),
                Visibility::Hidden,
            ));
        });
}

/// Glide the sprite toward the logical cell.
pub fn interpolate_visual_position(
    position: Res<PlayerPosition>,
    mut query: Query<(&mut VisualPosition, &mut Transform), With<CovePlayer>>,
) {
    let target = Vec2::new(position.x as f32, position.y as f32);
    for (mut visual, mut transform) in query.iter_mut() {
        visual.step_toward(target);
        let world = grid_to_world(visual.0);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Copy facing and fishing into the pose, leaving it untouched if equal.
pub fn sync_player_pose(
    position: Res<PlayerPosition>,
    state: Res<State<GameState>>,
    mut query: Query<&mut PlayerPose, With<CovePlayer>>,
) {
    let desired = PlayerPose {
        facing: position.facing,
        is_fishing: state.get().is_fishing(),
    };
    for mut pose in query.iter_mut() {
        pose.set_if_neq(desired);
    }
}

/// Redraw the pose-dependent parts. Runs for a player only on the frame its
/// pose changed (and on the frame it was spawned).
pub fn redraw_player_pose(
    players: Query<(&PlayerPose, &Children), (With<CovePlayer>, Changed<PlayerPose>)>,
    mut parts: Query<(&PlayerPart, &mut Transform, &mut Visibility)>,
) {
    for (pose, children) in players.iter() {
        let layout = pose_layout(*pose);
        for &child in children.iter() {
            let Ok((part, mut transform, mut visibility)) = parts.get_mut(child) else {
                continue;
            };
            let placement = match part {
                PlayerPart::Eyes => layout.eyes.map(|offset| (offset, 0.0)),
                PlayerPart::Rod => layout.rod,
            };
            match placement {
                Some((offset, angle)) => {
                    transform.translation.x = offset.x;
                    transform.translation.y = offset.y;
                    transform.rotation = Quat::from_rotation_z(angle);
                    *visibility = Visibility::Inherited;
                }
                None => *visibility = Visibility::Hidden,
            }
        }
    }
}
