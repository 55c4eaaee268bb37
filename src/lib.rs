//! # Tileview
//!
//! Viewport and tile-loading engine for pannable, zoomable raster maps.
//!
//! A fixed pyramid of pre-rendered tiles is shown through a single
//! [`Viewport`]: it tracks the pan offset and zoom level, decides which tiles
//! intersect the visible region, positions location markers and a route
//! overlay, and animates pans and slides on a fixed tick budget. Drawing and
//! timers are supplied by the host through the [`MapRenderer`] and
//! [`Scheduler`] traits.

pub mod animation;
pub mod core;
pub mod data;
pub mod input;
pub mod overlay;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::ViewportBuilder,
    config::{NavigationProfile, ViewerConfig},
    geo::{Point, Size, TileCoord},
    share::{ShareLink, ViewMode},
    viewport::{ViewState, Viewport},
    zoom::{BaseMap, ZoomLevel, ZoomTable},
};

pub use animation::{ManualScheduler, Scheduler, TimerHandle};

pub use data::MapInit;

pub use input::{Direction, NavCommand};

pub use overlay::{Location, LocationKey, PathRecord};

pub use rendering::{MapRenderer, RecordingRenderer};

pub use tiles::{StaticAssetSource, TileSource};

#[cfg(feature = "tokio-runtime")]
pub use runtime::{spawn_viewport, TokioScheduler, ViewportHandle};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid initialization data: {0}")]
    InvalidInit(String),

    #[error("Unknown base map: {0}")]
    UnknownBaseMap(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Share link error: {0}")]
    ShareLink(String),

    #[error("Viewport task is no longer running")]
    ViewportClosed,
}

/// Error type alias for convenience
pub type Error = MapError;
