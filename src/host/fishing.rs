//! Cast, bite and reel flow driven by per-phase timers.

use bevy::prelude::*;
use rand::Rng;

use crate::config::CoveConfig;
use crate::shared::*;
use super::HostInput;

// ─── Constants ───────────────────────────────────────────────────────────────

const CAST_SECONDS: f32 = 0.6;
const REACTION_WINDOW: f32 = 1.0; // seconds to press Space after the bite
const REEL_SECONDS: f32 = 1.2;
const RESULT_SECONDS: f32 = 1.5;

// ─── Resource ────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Default)]
pub struct FishingSession {
    /// Counts down the current phase. `None` while walking.
    pub timer: Option<Timer>,
    pub catches: u32,
    pub escapes: u32,
}

/// Where a phase goes when its timer runs out.
pub fn phase_after_timer(state: GameState) -> Option<GameState> {
    match state {
        GameState::Walking => None,
        GameState::Casting => Some(GameState::Waiting),
        GameState::Waiting => Some(GameState::FishAppeared),
        GameState::FishAppeared => Some(GameState::Escaped),
        GameState::Reeling => Some(GameState::Caught),
        GameState::Caught | GameState::Escaped => Some(GameState::Walking),
    }
}

/// How long a phase lasts. The wait for a bite is random.
pub fn phase_duration(state: GameState, config: &CoveConfig, rng: &mut impl Rng) -> Option<f32> {
    match state {
        GameState::Walking => None,
        GameState::Casting => Some(CAST_SECONDS),
        GameState::Waiting => {
            let (min, max) = (config.bite_wait_min, config.bite_wait_max);
            Some(if max > min { rng.gen_range(min..max) } else { min })
        }
        GameState::FishAppeared => Some(REACTION_WINDOW),
        GameState::Reeling => Some(REEL_SECONDS),
        GameState::Caught | GameState::Escaped => Some(RESULT_SECONDS),
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Space casts while walking and facing water, and hooks a fish that showed.
pub fn handle_cast_input(
    input: Res<HostInput>,
    state: Res<State<GameState>>,
    availability: Res<CastAvailability>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.action {
        return;
    }
    match state.get() {
        GameState::Walking if availability.0 => {
            info!("[Fishing] Cast");
            next_state.set(GameState::Casting);
        }
        GameState::FishAppeared => {
            info!("[Fishing] Hooked");
            next_state.set(GameState::Reeling);
        }
        _ => {}
    }
}

/// Escape reels the line in; while walking it leaves the cove.
pub fn handle_cancel_input(
    input: Res<HostInput>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut next_screen: ResMut<NextState<Screen>>,
) {
    if !input.cancel {
        return;
    }
    if state.get().is_fishing() {
        info!("[Fishing] Line reeled in from {}", state.get().label());
        next_state.set(GameState::Walking);
    } else {
        info!("[Host] Leaving the cove");
        next_screen.set(Screen::Away);
    }
}

/// Start the countdown for the phase just entered.
pub fn arm_phase_timer(
    state: Res<State<GameState>>,
    config: Res<CoveConfig>,
    mut session: ResMut<FishingSession>,
) {
    let mut rng = rand::thread_rng();
    session.timer = phase_duration(*state.get(), &config, &mut rng)
        .map(|secs| Timer::from_seconds(secs, TimerMode::Once));
}

pub fn tick_phase_timer(
    time: Res<Time>,
    state: Res<State<GameState>>,
    mut session: ResMut<FishingSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // A key press this frame already picked the next phase.
    if matches!(*next_state, NextState::Pending(_)) {
        return;
    }
    let finished = match session.timer.as_mut() {
        Some(timer) => {
            timer.tick(time.delta());
            timer.just_finished()
        }
        None => false,
    };
    if !finished {
        return;
    }
    session.timer = None;

    let Some(next) = phase_after_timer(*state.get()) else {
        return;
    };
    match next {
        GameState::Caught => {
            session.catches += 1;
            info!("[Fishing] Caught a fish ({} so far)", session.catches);
        }
        GameState::Escaped => {
            session.escapes += 1;
            info!("[Fishing] The fish got away");
        }
        _ => {}
    }
    next_state.set(next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_fishing_phase_returns_to_walking() {
        for start in [GameState::Casting, GameState::Reeling] {
            let mut state = start;
            let mut hops = 0;
            while let Some(next) = phase_after_timer(state) {
                state = next;
                hops += 1;
                assert!(hops < 10, "loop from {:?}", start);
                if state == GameState::Walking {
                    break;
                }
            }
            assert_eq!(state, GameState::Walking);
        }
    }

    #[test]
    fn test_unanswered_bite_escapes() {
        assert_eq!(phase_after_timer(GameState::FishAppeared), Some(GameState::Escaped));
    }

    #[test]
    fn test_walking_has_no_timer() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(phase_duration(GameState::Walking, &CoveConfig::default(), &mut rng).is_none());
    }

    #[test]
    fn test_bite_wait_within_config_window() {
        let config = CoveConfig {
            bite_wait_min: 1.0,
            bite_wait_max: 2.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let wait = phase_duration(GameState::Waiting, &config, &mut rng).unwrap();
            assert!((1.0..2.0).contains(&wait));
        }
    }

    #[test]
    fn test_empty_bite_window_uses_minimum() {
        let config = CoveConfig {
            bite_wait_min: 4.0,
            bite_wait_max: 4.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(phase_duration(GameState::Waiting, &config, &mut rng), Some(4.0));
    }
}
