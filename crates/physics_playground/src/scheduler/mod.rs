//! Virtual-clock task scheduler
//!
//! Stands in for the host's timers and animation-frame requests. Time only
//! moves when the host calls [`Scheduler::advance_to`], which makes every
//! timing behaviour reproducible in tests.

use std::time::Duration;

use crate::foundation::collections::{SlotMap, TimerHandle};

/// Timer and frame-request services the playground relies on
pub trait TaskScheduler<T> {
    /// Run `task` once after `delay`
    fn schedule_once(&mut self, delay: Duration, task: T) -> TimerHandle;

    /// Run `task` every `period`, first after one period
    fn schedule_repeating(&mut self, period: Duration, task: T) -> TimerHandle;

    /// Cancel a pending timer; returns whether it was still pending
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Ask for one more frame tick
    fn request_next_frame(&mut self);
}

#[derive(Debug, Clone)]
struct Timer<T> {
    due: Duration,
    period: Option<Duration>,
    seq: u64,
    task: T,
}

/// Scheduler driven by an external clock
#[derive(Debug)]
pub struct Scheduler<T> {
    timers: SlotMap<TimerHandle, Timer<T>>,
    now: Duration,
    next_seq: u64,
    frame_requested: bool,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: Duration::ZERO,
            next_seq: 0,
            frame_requested: false,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    /// Create a scheduler whose clock starts at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last [`advance_to`](Self::advance_to)
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Whether the handle names a pending timer
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(handle)
    }

    /// Earliest due time among pending timers
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.due).min()
    }

    /// Consume the pending frame request, if any
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Whether a frame has been requested and not yet taken
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Move the clock to `now` and return the tasks that came due
    ///
    /// Tasks are ordered by due time, then by scheduling order. A repeating
    /// timer fires at most once per call; if it fell more than a period
    /// behind it is re-armed one period after `now` instead of catching up.
    pub fn advance_to(&mut self, now: Duration) -> Vec<T> {
        self.now = self.now.max(now);
        let now = self.now;

        let mut due: Vec<(Duration, u64, TimerHandle)> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(handle, timer)| (timer.due, timer.seq, handle))
            .collect();
        due.sort_unstable_by_key(|&(due, seq, _)| (due, seq));

        let mut tasks = Vec::with_capacity(due.len());
        for (_, _, handle) in due {
            let Some(timer) = self.timers.get_mut(handle) else {
                continue;
            };
            match timer.period {
                Some(period) => {
                    tasks.push(timer.task.clone());
                    let next = timer.due + period;
                    timer.due = if next > now { next } else { now + period };
                }
                None => {
                    if let Some(timer) = self.timers.remove(handle) {
                        tasks.push(timer.task);
                    }
                }
            }
        }

        tasks
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, task: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            due: self.now + delay,
            period,
            seq,
            task,
        })
    }
}

impl<T: Clone> TaskScheduler<T> for Scheduler<T> {
    fn schedule_once(&mut self, delay: Duration, task: T) -> TimerHandle {
        self.insert(delay, None, task)
    }

    fn schedule_repeating(&mut self, period: Duration, task: T) -> TimerHandle {
        self.insert(period, Some(period), task)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.remove(handle).is_some()
    }

    fn request_next_frame(&mut self) {
        self.frame_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_one_shot_tasks_run_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(ms(500), "late");
        scheduler.schedule_once(ms(0), "first");
        scheduler.schedule_once(ms(0), "second");

        assert_eq!(scheduler.advance_to(ms(0)), vec!["first", "second"]);
        assert!(scheduler.advance_to(ms(499)).is_empty());
        assert_eq!(scheduler.advance_to(ms(500)), vec!["late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_repeating_task_fires_once_per_period() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(ms(300), 'f');

        assert!(scheduler.advance_to(ms(299)).is_empty());
        assert_eq!(scheduler.advance_to(ms(300)), vec!['f']);
        assert_eq!(scheduler.advance_to(ms(600)), vec!['f']);
        assert_eq!(scheduler.next_due(), Some(ms(900)));
    }

    #[test]
    fn test_lagging_repeating_task_does_not_catch_up() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_repeating(ms(100), 'f');

        assert_eq!(scheduler.advance_to(ms(1000)), vec!['f']);
        assert_eq!(scheduler.next_due(), Some(ms(1100)));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_repeating(ms(50), 1);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));
        assert!(scheduler.advance_to(ms(1000)).is_empty());
    }

    #[test]
    fn test_delays_are_relative_to_current_time() {
        let mut scheduler = Scheduler::new();
        scheduler.advance_to(ms(1000));
        scheduler.schedule_once(ms(10), ());
        assert_eq!(scheduler.next_due(), Some(ms(1010)));

        // The clock never runs backwards
        scheduler.advance_to(ms(5));
        assert_eq!(scheduler.now(), ms(1000));
    }

    #[test]
    fn test_frame_request_is_consumed() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        assert!(!scheduler.take_frame_request());
        scheduler.request_next_frame();
        scheduler.request_next_frame();
        assert!(scheduler.frame_requested());
        assert!(scheduler.take_frame_request());
        assert!(!scheduler.frame_requested());
        assert!(!scheduler.take_frame_request());
    }
}
