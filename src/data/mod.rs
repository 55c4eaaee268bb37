pub mod init;

// Re-export main types
pub use init::{LocationRecord, MapInit};
