//! Core constants for the tile grid, the navigation controls and the animation timers.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default tile width in pixels.
pub const TILE_WIDTH: u32 = 200;

/// Default tile height in pixels.
pub const TILE_HEIGHT: u32 = 200;

/// Extra tiles loaded on every side of the viewport.
pub const TILE_PREFETCH_BUFFER: u32 = 1;

/// Scale factors of the stock zoom table, most detailed first.
pub const DEFAULT_SCALES: [f64; 4] = [1.0, 0.5, 0.25, 0.125];

/// Number of ticks in a button pan or a slide.
pub const ANIMATION_TICKS: u32 = 30;

/// Fixed-budget animations only re-check tile coverage on every Nth tick.
pub const RELOAD_CHECK_INTERVAL: u32 = 15;

/// Period of the button / slide repeater.
pub const SCROLL_TICK_MS: u64 = 15;

/// Pixels moved per tick by a pan button.
pub const BUTTON_INCREMENT: f64 = 10.0;

/// Period of the keyboard repeater.
pub const KEY_REPEAT_MS: u64 = 30;

/// Pixels moved per keyboard tick.
pub const ARROW_PAN: f64 = 10.0;

/// Slides longer than this many viewport widths snap instead.
pub const SLIDE_SNAP_FACTOR: f64 = 1.5;

/// Margin kept around a path when picking its initial zoom.
pub const PATH_FIT_MARGIN: f64 = 5.0;

/// Walking pace used by share links when none is given, in minutes per mile.
pub const DEFAULT_MINUTES_PER_MILE: u32 = 20;

/// Name of the stock base map.
pub const DEFAULT_MAP_NAME: &str = "map";

/// Zoom-0 width of the stock base map in pixels.
pub const DEFAULT_MAP_WIDTH: u32 = 7200;

/// Zoom-0 height of the stock base map in pixels.
pub const DEFAULT_MAP_HEIGHT: u32 = 6600;
