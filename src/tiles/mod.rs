pub mod loader;
pub mod source;

// Re-exports for convenience
pub use loader::{compute_visible_tiles, TileLoader, TilePlacement, TileSet};
pub use source::{StaticAssetSource, TileSource};
