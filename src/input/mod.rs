pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{Direction, NavCommand};
