//! In-game clock. The time-of-day label handed to the renderer is derived
//! from the hour.

use bevy::prelude::*;

use crate::shared::*;
use super::HostInput;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CoveClock {
    /// 0.0 - 24.0, wrapping.
    pub hour: f32,
    /// In-game minutes per real second.
    pub minutes_per_second: f32,
}

impl Default for CoveClock {
    fn default() -> Self {
        Self {
            hour: 9.0,
            minutes_per_second: 4.0,
        }
    }
}

impl CoveClock {
    pub fn advance_minutes(&mut self, minutes: f32) {
        self.hour = (self.hour + minutes / 60.0).rem_euclid(24.0);
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour)
    }

    /// "h:mm" for the HUD.
    pub fn display(&self) -> String {
        let total = (self.hour * 60.0) as u32;
        format!("{}:{:02}", total / 60 % 24, total % 60)
    }
}

fn publish_time_of_day(clock: &CoveClock, time_of_day: &mut ResMut<TimeOfDay>) {
    let now = clock.time_of_day();
    if **time_of_day != now {
        info!("[Clock] {} -> {} at {}", time_of_day.label(), now.label(), clock.display());
        **time_of_day = now;
    }
}

pub fn tick_clock(time: Res<Time>, mut clock: ResMut<CoveClock>, mut time_of_day: ResMut<TimeOfDay>) {
    if clock.minutes_per_second <= 0.0 {
        return;
    }
    let minutes = clock.minutes_per_second * time.delta_secs();
    clock.advance_minutes(minutes);
    publish_time_of_day(&clock, &mut time_of_day);
}

pub fn handle_skip_hour(
    input: Res<HostInput>,
    mut clock: ResMut<CoveClock>,
    mut time_of_day: ResMut<TimeOfDay>,
) {
    if !input.skip_hour {
        return;
    }
    clock.advance_minutes(60.0);
    publish_time_of_day(&clock, &mut time_of_day);
}
