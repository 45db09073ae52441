//! Repeating fire: the Idle / Firing state machine around one periodic timer

use std::time::Duration;

use crate::foundation::collections::TimerHandle;
use crate::scheduler::TaskScheduler;

/// Shortest allowed period between two shots
pub const MIN_FIRE_INTERVAL: Duration = Duration::from_millis(50);

/// Clamp a requested fire period to [`MIN_FIRE_INTERVAL`]
pub fn clamp_interval(interval: Duration) -> Duration {
    interval.max(MIN_FIRE_INTERVAL)
}

/// Whether repeating fire is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    /// No schedule installed
    Idle,
    /// One periodic timer is installed
    Firing(TimerHandle),
}

/// Owns the single repeating-fire schedule
///
/// `task` is what the scheduler hands back every period.
#[derive(Debug, Clone)]
pub struct FireControl<T> {
    state: FireState,
    interval: Duration,
    task: T,
}

impl<T: Clone> FireControl<T> {
    /// Idle control that will fire `task` every `interval` once enabled
    pub fn new(interval: Duration, task: T) -> Self {
        Self {
            state: FireState::Idle,
            interval: clamp_interval(interval),
            task,
        }
    }

    /// Current state
    pub fn state(&self) -> FireState {
        self.state
    }

    /// Whether a schedule is installed
    pub fn is_firing(&self) -> bool {
        matches!(self.state, FireState::Firing(_))
    }

    /// Effective (clamped) period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Install the periodic schedule, replacing any existing one
    pub fn enable<S: TaskScheduler<T> + ?Sized>(&mut self, scheduler: &mut S) {
        self.cancel_schedule(scheduler);
        let handle = scheduler.schedule_repeating(self.interval, self.task.clone());
        self.state = FireState::Firing(handle);
        log::info!("Turret fire enabled every {} ms", self.interval.as_millis());
    }

    /// Cancel the schedule; no-op while idle
    pub fn disable<S: TaskScheduler<T> + ?Sized>(&mut self, scheduler: &mut S) {
        if self.cancel_schedule(scheduler) {
            log::info!("Turret fire disabled");
        }
    }

    /// Change the period; while firing the schedule is replaced in one go
    pub fn set_interval<S: TaskScheduler<T> + ?Sized>(&mut self, scheduler: &mut S, interval: Duration) {
        let clamped = clamp_interval(interval);
        if clamped != interval {
            log::debug!("Fire interval {:?} clamped to {:?}", interval, clamped);
        }
        self.interval = clamped;
        if self.is_firing() {
            self.enable(scheduler);
        }
    }

    fn cancel_schedule<S: TaskScheduler<T> + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        match std::mem::replace(&mut self.state, FireState::Idle) {
            FireState::Firing(handle) => {
                if !scheduler.cancel(handle) {
                    log::warn!("Fire schedule {:?} was already gone", handle);
                }
                true
            }
            FireState::Idle => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_interval_is_clamped() {
        let mut scheduler = Scheduler::new();
        let mut fire = FireControl::new(ms(300), "fire");
        fire.set_interval(&mut scheduler, ms(10));
        assert_eq!(fire.interval(), ms(50));
        assert!(!fire.is_firing());
        assert_eq!(scheduler.pending(), 0);

        assert_eq!(FireControl::new(ms(0), ()).interval(), MIN_FIRE_INTERVAL);
    }

    #[test]
    fn test_enabling_twice_keeps_one_schedule() {
        let mut scheduler = Scheduler::new();
        let mut fire = FireControl::new(ms(100), "fire");

        fire.enable(&mut scheduler);
        fire.enable(&mut scheduler);

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance_to(ms(100)), vec!["fire"]);
    }

    #[test]
    fn test_disable_cancels() {
        let mut scheduler = Scheduler::new();
        let mut fire = FireControl::new(ms(100), "fire");
        fire.enable(&mut scheduler);
        fire.disable(&mut scheduler);
        fire.disable(&mut scheduler);

        assert_eq!(fire.state(), FireState::Idle);
        assert_eq!(scheduler.pending(), 0);
        assert!(scheduler.advance_to(ms(1000)).is_empty());
    }

    #[test]
    fn test_new_interval_replaces_running_schedule() {
        let mut scheduler = Scheduler::new();
        let mut fire = FireControl::new(ms(300), "fire");
        fire.enable(&mut scheduler);
        let FireState::Firing(old) = fire.state() else {
            panic!("expected firing");
        };

        scheduler.advance_to(ms(100));
        fire.set_interval(&mut scheduler, ms(10));

        assert!(!scheduler.is_pending(old));
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.advance_to(ms(149)).is_empty());
        assert_eq!(scheduler.advance_to(ms(150)), vec!["fire"]);
        assert_eq!(scheduler.advance_to(ms(200)), vec!["fire"]);
    }
}
