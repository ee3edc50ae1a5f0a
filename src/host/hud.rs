use bevy::prelude::*;

use crate::shared::*;
use super::{CoveClock, FishingSession};

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

/// Clock, time of day and catch count.
#[derive(Component)]
pub struct HudStatusText;

/// What the player can do right now.
#[derive(Component)]
pub struct HudHintText;

pub fn hint_for(state: GameState, can_fish: bool) -> &'static str {
    match state {
        GameState::Walking if can_fish => "Space: cast   Esc: leave",
        GameState::Walking => "WASD: walk   T: +1 hour   Esc: leave",
        GameState::Casting => "Casting...",
        GameState::Waiting => "Waiting for a bite...   Esc: reel in",
        GameState::FishAppeared => "A fish! Press Space!",
        GameState::Reeling => "Reeling...",
        GameState::Caught => "Caught it!",
        GameState::Escaped => "It got away...",
    }
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(8.0),
                top: Val::Px(6.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            },
            // Above the day/night overlay.
            ZIndex(900),
        ))
        .with_children(|parent| {
            parent.spawn((
                HudStatusText,
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                HudHintText,
                Text::new(""),
                TextFont {
                    font_size: 12.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.92, 0.6)),
            ));
        });
}

pub fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn update_hud(
    clock: Res<CoveClock>,
    time_of_day: Res<TimeOfDay>,
    state: Res<State<GameState>>,
    availability: Res<CastAvailability>,
    session: Res<FishingSession>,
    mut status_query: Query<&mut Text, (With<HudStatusText>, Without<HudHintText>)>,
    mut hint_query: Query<&mut Text, (With<HudHintText>, Without<HudStatusText>)>,
) {
    for mut text in status_query.iter_mut() {
        let status = format!(
            "{} ({})   Fish: {}",
            clock.display(),
            time_of_day.label(),
            session.catches
        );
        if **text != status {
            **text = status;
        }
    }
    for mut text in hint_query.iter_mut() {
        let hint = hint_for(*state.get(), availability.0);
        if text.as_str() != hint {
            **text = hint.to_string();
        }
    }
}
