//! Periodic tick scheduling.
//!
//! The scheduler never sleeps or spawns anything. The owning loop asks
//! [`Scheduler::poll`] whether a tick is due, the same way the TUI main loop
//! compares `last_refresh.elapsed()` against the refresh interval.

use std::time::Duration;

use crate::error::{Result, WatchdogError};

/// Tick cadence for one monitor.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    next_due: f64,
    ticks: u64,
}

impl Scheduler {
    /// Create a scheduler whose first tick is one interval after `now`.
    pub fn new(interval: Duration, now: f64) -> Result<Self> {
        if interval.is_zero() {
            return Err(WatchdogError::InvalidInterval);
        }
        Ok(Self {
            interval,
            next_due: now + interval.as_secs_f64(),
            ticks: 0,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Clock time at which the next tick becomes due.
    pub fn next_due(&self) -> f64 {
        self.next_due
    }

    /// Number of ticks fired so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Change the cadence. The next tick is rescheduled one new interval
    /// after `now`, but never later than it was already due, so repeated
    /// changes cannot hold ticks off. Tool timestamps are not touched.
    pub fn set_interval(&mut self, interval: Duration, now: f64) -> Result<()> {
        if interval.is_zero() {
            return Err(WatchdogError::InvalidInterval);
        }
        self.interval = interval;
        self.next_due = self.next_due.min(now + interval.as_secs_f64());
        Ok(())
    }

    pub fn is_due(&self, now: f64) -> bool {
        now >= self.next_due
    }

    /// Returns true and arms the next tick if a tick is due at `now`.
    ///
    /// A late poll fires a single tick and schedules the following one from
    /// `now`, so a stalled loop never produces a burst of catch-up ticks.
    pub fn poll(&mut self, now: f64) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.mark_ticked(now);
        true
    }

    /// Record a tick that ran outside the cadence (e.g. a manual refresh).
    pub fn mark_ticked(&mut self, now: f64) {
        self.ticks += 1;
        self.next_due = now + self.interval.as_secs_f64();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert_eq!(
            Scheduler::new(Duration::ZERO, 0.0).unwrap_err(),
            WatchdogError::InvalidInterval
        );
        let mut scheduler = Scheduler::new(Duration::from_millis(250), 0.0).unwrap();
        assert!(scheduler.set_interval(Duration::ZERO, 1.0).is_err());
        assert_eq!(scheduler.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_ticks_on_cadence() {
        let mut scheduler = Scheduler::new(Duration::from_millis(500), 0.0).unwrap();
        assert!(!scheduler.poll(0.2));
        assert!(scheduler.poll(0.5));
        assert!(!scheduler.poll(0.7));
        assert!(scheduler.poll(1.0));
        assert_eq!(scheduler.ticks(), 2);
    }

    #[test]
    fn test_late_poll_does_not_burst() {
        let mut scheduler = Scheduler::new(Duration::from_secs(1), 0.0).unwrap();
        assert!(scheduler.poll(10.0));
        assert!(!scheduler.poll(10.5));
        assert_eq!(scheduler.next_due(), 11.0);
    }

    #[test]
    fn test_interval_change_reschedules_from_now() {
        let mut scheduler = Scheduler::new(Duration::from_secs(5), 0.0).unwrap();
        scheduler.set_interval(Duration::from_secs(1), 0.5).unwrap();
        assert_eq!(scheduler.next_due(), 1.5);
        assert!(!scheduler.poll(1.0));
        assert!(scheduler.poll(1.5));

        // Growing the interval keeps the tick that is already armed.
        scheduler.set_interval(Duration::from_secs(5), 1.6).unwrap();
        assert_eq!(scheduler.next_due(), 2.5);
        assert!(scheduler.poll(2.5));
        assert_eq!(scheduler.next_due(), 7.5);
    }

    #[test]
    fn test_repeated_interval_changes_do_not_starve_ticks() {
        let mut scheduler = Scheduler::new(Duration::from_secs(1), 0.0).unwrap();
        for step in 1..=20 {
            let now = step as f64 * 0.1;
            let interval = Duration::from_millis(1000 + step * 50);
            scheduler.set_interval(interval, now).unwrap();
        }
        assert!(scheduler.poll(1.0));
    }
}
