//! Time-sliced animation state shared by pan buttons, slides and key repeat.
//!
//! At most one fixed-budget scroll runs at a time. Its step is captured when
//! it starts and never re-targeted: a competing request only zeroes the
//! remaining budget so the running scroll stops on its next tick.

use super::scheduler::{Scheduler, TimerHandle, TimerSlot};
use crate::core::config::AnimationConfig;
use crate::core::geo::Point;
use crate::input::events::Direction;

/// A fixed-budget scroll that moves by `step` on every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRepeater {
    pub handle: TimerHandle,
    pub step: Point,
    remaining: i32,
}

impl ScrollRepeater {
    pub fn remaining(&self) -> u32 {
        self.remaining.max(0) as u32
    }
}

/// What one scroll tick asks the viewport to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTick {
    pub step: Point,
    pub check_load: bool,
    pub finished: bool,
}

/// Direction keys currently held down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub left: bool,
    pub up: bool,
    pub right: bool,
    pub down: bool,
}

impl HeldKeys {
    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
        }
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Up => self.up = held,
            Direction::Right => self.right = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.left || self.up || self.right || self.down)
    }
}

#[derive(Debug, Default)]
pub struct AnimationDriver {
    scroll: Option<ScrollRepeater>,
    key_timer: Option<TimerHandle>,
    held: HeldKeys,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> Option<&ScrollRepeater> {
        self.scroll.as_ref()
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Ticks left in the running scroll; zero when idle
    pub fn scroll_remaining(&self) -> u32 {
        self.scroll.map(|s| s.remaining()).unwrap_or(0)
    }

    pub fn held_keys(&self) -> HeldKeys {
        self.held
    }

    pub fn is_key_repeating(&self) -> bool {
        self.key_timer.is_some()
    }

    /// Starts a scroll unless one is already running; returns whether it started
    pub fn start_scroll(
        &mut self,
        scheduler: &mut dyn Scheduler,
        step: Point,
        config: &AnimationConfig,
    ) -> bool {
        if self.scroll.is_some() {
            return false;
        }

        let handle = scheduler.set_interval(TimerSlot::Scroll, config.tick_period());
        self.scroll = Some(ScrollRepeater {
            handle,
            step,
            remaining: config.tick_budget as i32,
        });
        log::debug!(
            "scroll {:?} started: {} ticks of ({:.2}, {:.2})",
            handle,
            config.tick_budget,
            step.x,
            step.y
        );
        true
    }

    /// Makes the running scroll stop on its next tick
    pub fn interrupt_scroll(&mut self) {
        if let Some(scroll) = self.scroll.as_mut() {
            log::debug!("scroll {:?} interrupted", scroll.handle);
            scroll.remaining = 0;
        }
    }

    /// Advances the scroll owning `handle` by one tick.
    ///
    /// Returns `None` when `handle` is not the running scroll.
    pub fn advance_scroll(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut dyn Scheduler,
        reload_check_interval: u32,
    ) -> Option<ScrollTick> {
        let scroll = self.scroll.as_mut().filter(|s| s.handle == handle)?;

        scroll.remaining -= 1;
        let check_load = scroll.remaining >= 0
            && reload_check_interval > 0
            && scroll.remaining % reload_check_interval as i32 == 0;
        let finished = scroll.remaining <= 0;
        let step = scroll.step;

        if finished {
            scheduler.clear_interval(handle);
            self.scroll = None;
            log::debug!("scroll {:?} finished", handle);
        }

        Some(ScrollTick {
            step,
            check_load,
            finished,
        })
    }

    /// Marks `direction` as held and starts key repeat if needed.
    ///
    /// Returns false when the key was already held.
    pub fn press(
        &mut self,
        direction: Direction,
        scheduler: &mut dyn Scheduler,
        config: &AnimationConfig,
    ) -> bool {
        if self.held.is_held(direction) {
            return false;
        }
        self.held.set(direction, true);

        if self.key_timer.is_none() {
            let handle = scheduler.set_interval(TimerSlot::KeyRepeat, config.key_repeat_period());
            log::debug!("key repeat {:?} started", handle);
            self.key_timer = Some(handle);
        }
        true
    }

    /// Releases `direction`; key repeat stops once nothing is held
    pub fn release(&mut self, direction: Direction, scheduler: &mut dyn Scheduler) {
        self.held.set(direction, false);
        if self.held.is_empty() {
            self.stop_key_repeat(scheduler);
        }
    }

    /// Movement for one key-repeat tick, or `None` if `handle` is not the key timer.
    ///
    /// Directions are applied in the order left, up, right, down and each
    /// applied direction releases its opposite.
    pub fn advance_keys(
        &mut self,
        handle: TimerHandle,
        scheduler: &mut dyn Scheduler,
        arrow_pan: f64,
    ) -> Option<Point> {
        if self.key_timer != Some(handle) {
            return None;
        }
        if self.held.is_empty() {
            self.stop_key_repeat(scheduler);
            return None;
        }

        let mut delta = Point::default();
        for direction in Direction::ALL {
            if self.held.is_held(direction) {
                delta = delta.add(&direction.unit().multiply(arrow_pan));
                self.held.set(direction.opposite(), false);
            }
        }
        Some(delta)
    }

    /// Cancels every running timer and forgets held keys
    pub fn cancel_all(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(scroll) = self.scroll.take() {
            scheduler.clear_interval(scroll.handle);
        }
        self.held = HeldKeys::default();
        self.stop_key_repeat(scheduler);
    }

    fn stop_key_repeat(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.key_timer.take() {
            scheduler.clear_interval(handle);
            log::debug!("key repeat {:?} stopped", handle);
        }
    }
}
