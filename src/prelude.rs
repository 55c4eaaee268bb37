//! Prelude module for common tileview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tileview::prelude::*;`

pub use crate::core::{
    builder::{pick_initial_center, pick_initial_zoom, pick_zoom_for_path, ViewportBuilder},
    config::{
        AnimationConfig, AssetConfig, InitialViewConfig, NavigationProfile, TileGridConfig,
        ViewerConfig,
    },
    geo::{Point, Size, TileCoord},
    share::{format_walking_time, ShareLink, SharedView, ViewMode},
    viewport::{ViewState, Viewport},
    zoom::{BaseMap, ZoomLevel, ZoomTable},
};

pub use crate::animation::{
    AnimationDriver, ManualScheduler, Scheduler, TimerHandle, TimerSlot,
};

pub use crate::data::{LocationRecord, MapInit};

pub use crate::input::{Direction, NavCommand};

pub use crate::overlay::{
    render_overlays, Location, LocationKey, OverlayFrame, OverlayImage, PathOverlay, PathRecord,
};

pub use crate::rendering::{MapRenderer, RecordingRenderer};

pub use crate::tiles::{compute_visible_tiles, StaticAssetSource, TileLoader, TileSet, TileSource};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{spawn_viewport, TokioScheduler, ViewportHandle};

pub use crate::{Error as MapError, Result};

pub use std::time::Duration;
