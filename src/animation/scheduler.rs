//! Timer abstraction for repeating callbacks
//!
//! The viewport never sleeps or spawns on its own. It asks a [`Scheduler`]
//! for a repeating timer and expects the host to call
//! [`Viewport::tick`](crate::core::viewport::Viewport::tick) with the returned
//! handle once per period until the timer is cleared.

use std::time::Duration;

/// Opaque identifier of one repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// The two independent repeater slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    /// Pan buttons and slides; fixed tick budget
    Scroll,
    /// Held direction keys; runs until every key is released
    KeyRepeat,
}

/// Host capability that fires repeating ticks
pub trait Scheduler {
    /// Starts a repeating timer for `slot` firing every `period`
    fn set_interval(&mut self, slot: TimerSlot, period: Duration) -> TimerHandle;

    /// Stops a timer. Clearing an unknown or already cleared handle is a no-op.
    fn clear_interval(&mut self, handle: TimerHandle);
}

/// A registered timer in a [`ManualScheduler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub handle: TimerHandle,
    pub slot: TimerSlot,
    pub period: Duration,
}

/// Deterministic scheduler that only records timers; the caller fires ticks.
///
/// Used by headless hosts and tests to step animations one tick at a time.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    active: Vec<ScheduledTimer>,
    started: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the running timer for `slot`, if any
    pub fn active(&self, slot: TimerSlot) -> Option<TimerHandle> {
        self.active
            .iter()
            .find(|timer| timer.slot == slot)
            .map(|timer| timer.handle)
    }

    pub fn timers(&self) -> &[ScheduledTimer] {
        &self.active
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.active.iter().any(|timer| timer.handle == handle)
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of timers started over the scheduler's lifetime
    pub fn started(&self) -> usize {
        self.started
    }
}

impl Scheduler for ManualScheduler {
    fn set_interval(&mut self, slot: TimerSlot, period: Duration) -> TimerHandle {
        self.next_id += 1;
        self.started += 1;
        let handle = TimerHandle(self.next_id);
        self.active.push(ScheduledTimer {
            handle,
            slot,
            period,
        });
        handle
    }

    fn clear_interval(&mut self, handle: TimerHandle) {
        self.active.retain(|timer| timer.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_tracks_slots() {
        let mut scheduler = ManualScheduler::new();
        let scroll = scheduler.set_interval(TimerSlot::Scroll, Duration::from_millis(15));
        let keys = scheduler.set_interval(TimerSlot::KeyRepeat, Duration::from_millis(30));

        assert_ne!(scroll, keys);
        assert_eq!(scheduler.active(TimerSlot::Scroll), Some(scroll));
        assert_eq!(scheduler.active(TimerSlot::KeyRepeat), Some(keys));

        scheduler.clear_interval(scroll);
        assert!(!scheduler.is_active(scroll));
        assert_eq!(scheduler.started(), 2);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.set_interval(TimerSlot::Scroll, Duration::from_millis(15));
        scheduler.clear_interval(handle);
        scheduler.clear_interval(handle);
        scheduler.clear_interval(TimerHandle(99));
        assert!(scheduler.is_idle());
    }
}
