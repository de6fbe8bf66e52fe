#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic clock system responsible for emitting zombie tick commands.

use std::time::Duration;

use zombie_rescue_core::{Command, Event, SessionPhase};

/// Pure system that converts post-grace time into zombie ticks.
///
/// The clock starts primed when a session begins, so zombies take their
/// first step as soon as the grace period ends.
#[derive(Debug)]
pub struct ZombieClock {
    interval: Duration,
    accumulator: Duration,
}

impl ZombieClock {
    /// Creates a clock ticking at the provided cadence.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: interval,
        }
    }

    /// Cadence currently applied between zombie ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Consumes world events to emit zombie tick commands.
    pub fn handle(&mut self, events: &[Event], phase: SessionPhase, out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        let mut grace_ended = false;
        for event in events {
            match event {
                Event::SessionStarted { profile, .. } => {
                    *self = Self::new(profile.zombie_move_interval);
                    accumulated = Duration::ZERO;
                }
                Event::GracePeriodEnded => grace_ended = true,
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if phase != SessionPhase::Active {
            return;
        }

        if accumulated.is_zero() && !grace_ended {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.resolve_tick_count() {
            out.push(Command::TickZombies);
        }
    }

    fn resolve_tick_count(&mut self) -> usize {
        if self.interval.is_zero() {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        ticks
    }
}

impl Default for ZombieClock {
    fn default() -> Self {
        Self::new(zombie_rescue_core::Difficulty::default().profile().zombie_move_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primed_clock_ticks_once_interval_is_known() {
        let mut clock = ZombieClock::new(Duration::from_millis(260));
        assert_eq!(clock.resolve_tick_count(), 1);
        assert_eq!(clock.resolve_tick_count(), 0);
    }

    #[test]
    fn zero_interval_never_ticks() {
        let mut clock = ZombieClock::new(Duration::ZERO);
        clock.accumulator = Duration::from_secs(10);
        assert_eq!(clock.resolve_tick_count(), 0);
    }

    #[test]
    fn grace_phase_holds_the_accumulator() {
        let mut clock = ZombieClock::new(Duration::from_millis(100));
        let mut commands = Vec::new();
        clock.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_millis(500),
            }],
            SessionPhase::Grace,
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(clock.accumulator, Duration::from_millis(100));
    }
}
