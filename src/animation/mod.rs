pub mod driver;
pub mod scheduler;

// Re-export commonly used types for convenience
pub use driver::{AnimationDriver, HeldKeys, ScrollRepeater, ScrollTick};
pub use scheduler::{ManualScheduler, ScheduledTimer, Scheduler, TimerHandle, TimerSlot};
