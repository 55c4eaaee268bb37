pub mod frame;
pub mod location;
pub mod path;

// Re-exports for convenience
pub use frame::{render_overlays, MarkerElement, OverlayFrame, PathElement};
pub use location::{Location, LocationKey};
pub use path::{OverlayImage, PathOverlay, PathRecord};
