//! Configuration system for viewer navigation and asset layout
//!
//! This module provides a small hierarchical configuration: presets resolve
//! to a [`ViewerConfig`], and any field can be overridden from JSON.

use crate::core::constants::*;
use crate::core::geo::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationProfile {
    Standard,
    /// Snaps to slide targets instead of animating
    ReducedMotion,
    Custom(ViewerConfig),
}

impl NavigationProfile {
    pub fn resolve(&self) -> ViewerConfig {
        match self {
            Self::Standard => ViewerConfig::default(),
            Self::ReducedMotion => ViewerConfig {
                animation: AnimationConfig {
                    animate_slides: false,
                    ..AnimationConfig::default()
                },
                ..ViewerConfig::default()
            },
            Self::Custom(config) => config.clone(),
        }
    }
}

impl Default for NavigationProfile {
    fn default() -> Self {
        Self::Standard
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub tiles: TileGridConfig,
    pub animation: AnimationConfig,
    pub assets: AssetConfig,
    pub initial_view: InitialViewConfig,
}

impl ViewerConfig {
    /// Parses a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(crate::MapError::from)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileGridConfig {
    pub tile_width: u32,
    pub tile_height: u32,
    pub prefetch_buffer: u32,
}

impl Default for TileGridConfig {
    fn default() -> Self {
        Self {
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            prefetch_buffer: TILE_PREFETCH_BUFFER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub tick_ms: u64,
    pub tick_budget: u32,
    pub reload_check_interval: u32,
    pub button_increment: f64,
    pub key_repeat_ms: u64,
    pub arrow_pan: f64,
    pub slide_snap_factor: f64,
    pub animate_slides: bool,
}

impl AnimationConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn key_repeat_period(&self) -> Duration {
        Duration::from_millis(self.key_repeat_ms)
    }

    /// Total wall-clock time of one fixed-budget animation
    pub fn animation_duration(&self) -> Duration {
        self.tick_period() * self.tick_budget
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: SCROLL_TICK_MS,
            tick_budget: ANIMATION_TICKS,
            reload_check_interval: RELOAD_CHECK_INTERVAL,
            button_increment: BUTTON_INCREMENT,
            key_repeat_ms: KEY_REPEAT_MS,
            arrow_pan: ARROW_PAN,
            slide_snap_factor: SLIDE_SNAP_FACTOR,
            animate_slides: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub grid_dir: String,
    pub paths_dir: String,
    pub share_base_url: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            grid_dir: "/static/tiles".to_string(),
            paths_dir: "/p".to_string(),
            share_base_url: "http://localhost/map".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialViewConfig {
    pub default_zoom: usize,
    pub single_location_zoom: usize,
    pub default_center: Point,
    pub fit_margin: f64,
}

impl Default for InitialViewConfig {
    fn default() -> Self {
        Self {
            default_zoom: 2,
            single_location_zoom: 1,
            default_center: Point::new(3600.0, 3300.0),
            fit_margin: PATH_FIT_MARGIN,
        }
    }
}
