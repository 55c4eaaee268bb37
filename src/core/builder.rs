//! Viewport builder for fluent configuration
//!
//! This module provides a ViewportBuilder that assembles a viewport from a
//! navigation profile, a zoom table, initial view and overlays, and picks a
//! sensible initial view when none is given.

use crate::{
    animation::Scheduler,
    core::{
        config::{InitialViewConfig, NavigationProfile, ViewerConfig},
        geo::{Point, Size},
        viewport::{Viewport, ViewportParts},
        zoom::{BaseMap, ZoomTable},
    },
    data::MapInit,
    overlay::{Location, LocationKey, PathRecord},
    rendering::MapRenderer,
    tiles::{StaticAssetSource, TileSource},
    Result,
};
use std::collections::BTreeMap;

/// Builder for creating and configuring Viewport instances
pub struct ViewportBuilder {
    profile: NavigationProfile,
    /// Explicit table; takes precedence over `base_map`
    zoom_levels: Option<ZoomTable>,
    base_map: BaseMap,
    size: Size,
    center: Option<Point>,
    zoom: Option<isize>,
    locations: BTreeMap<LocationKey, Location>,
    path: Option<PathRecord>,
    tile_source: Option<Box<dyn TileSource>>,
}

impl ViewportBuilder {
    pub fn new() -> Self {
        Self {
            profile: NavigationProfile::default(),
            zoom_levels: None,
            base_map: BaseMap::default(),
            size: Size::new(0.0, 0.0),
            center: None,
            zoom: None,
            locations: BTreeMap::new(),
            path: None,
            tile_source: None,
        }
    }

    /// Starts from validated init data
    pub fn from_init(init: &MapInit) -> Result<Self> {
        init.validate()?;

        let mut builder = Self::new()
            .with_base_map(init.selected_base_map()?.clone())
            .with_viewport_size(init.container)
            .with_locations(
                init.locations
                    .iter()
                    .map(|record| (LocationKey::Index(record.id), record.to_location())),
            );

        if let Some(center) = init.center {
            builder = builder.with_center(center);
        }
        if let Some(zoom) = init.zoom {
            builder = builder.with_zoom(zoom);
        }
        if let Some(origin) = &init.origin {
            builder = builder.with_location(LocationKey::Origin, origin.clone());
        }
        if let Some(destination) = &init.destination {
            builder = builder.with_location(LocationKey::Destination, destination.clone());
        }
        if let Some(path) = &init.path {
            builder = builder.with_path(path.clone());
        }
        Ok(builder)
    }

    /// Set the navigation profile
    pub fn with_profile(mut self, profile: NavigationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set a fully custom configuration
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.profile = NavigationProfile::Custom(config);
        self
    }

    /// Use a prebuilt zoom table instead of deriving one from the base map
    pub fn with_zoom_table(mut self, zoom_levels: ZoomTable) -> Self {
        self.zoom_levels = Some(zoom_levels);
        self
    }

    pub fn with_base_map(mut self, base_map: BaseMap) -> Self {
        self.base_map = base_map;
        self.zoom_levels = None;
        self
    }

    pub fn with_viewport_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Initial center in zoom-0 map pixels
    pub fn with_center(mut self, center: Point) -> Self {
        self.center = Some(center);
        self
    }

    /// Initial zoom index; corrected into range at build time
    pub fn with_zoom(mut self, zoom: isize) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_location(mut self, key: LocationKey, location: Location) -> Self {
        self.locations.insert(key, location);
        self
    }

    pub fn with_locations(
        mut self,
        locations: impl IntoIterator<Item = (LocationKey, Location)>,
    ) -> Self {
        self.locations.extend(locations);
        self
    }

    pub fn with_path(mut self, path: PathRecord) -> Self {
        self.path = Some(path);
        self
    }

    /// Set where tile and route images come from
    pub fn with_tile_source(mut self, source: Box<dyn TileSource>) -> Self {
        self.tile_source = Some(source);
        self
    }

    /// Build the viewport, drawing the initial view through `renderer`
    pub fn build<R: MapRenderer, S: Scheduler>(
        self,
        renderer: R,
        scheduler: S,
    ) -> Result<Viewport<R, S>> {
        let config = self.profile.resolve();

        let zoom_levels = match self.zoom_levels {
            Some(table) => table,
            None => self
                .base_map
                .zoom_table(config.tiles.tile_width, config.tiles.tile_height)?,
        };

        let initial = &config.initial_view;
        let zoom = self.zoom.unwrap_or_else(|| {
            pick_initial_zoom(
                &zoom_levels,
                self.size,
                self.path.as_ref(),
                &self.locations,
                initial,
            ) as isize
        });
        let center = self
            .center
            .unwrap_or_else(|| pick_initial_center(self.path.as_ref(), &self.locations, initial));

        let source = self
            .tile_source
            .unwrap_or_else(|| {
                Box::new(StaticAssetSource::from_config(&config.assets)) as Box<dyn TileSource>
            });

        Viewport::assemble(ViewportParts {
            zoom_levels,
            config,
            size: self.size,
            center,
            zoom,
            locations: self.locations,
            path: self.path,
            source,
            renderer,
            scheduler,
        })
    }
}

impl Default for ViewportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Preset configurations
impl ViewportBuilder {
    /// Stock campus map with standard animations
    pub fn standard(size: Size) -> Self {
        Self::new()
            .with_viewport_size(size)
            .with_profile(NavigationProfile::Standard)
    }

    /// Stock campus map that snaps instead of sliding
    pub fn reduced_motion(size: Size) -> Self {
        Self::new()
            .with_viewport_size(size)
            .with_profile(NavigationProfile::ReducedMotion)
    }
}

/// Most detailed level at which a `width` x `height` box fits inside the
/// viewport minus `margin`, or the most zoomed-out level if none does
pub fn pick_zoom_for_path(
    zoom_levels: &ZoomTable,
    width: f64,
    height: f64,
    viewport: Size,
    margin: f64,
) -> usize {
    let max_width = viewport.width - margin;
    let max_height = viewport.height - margin;
    zoom_levels
        .iter()
        .position(|level| width * level.scale <= max_width && height * level.scale <= max_height)
        .unwrap_or_else(|| zoom_levels.last_index())
}

/// Initial zoom when the caller gives none: fit the route, zoom in on a
/// lone endpoint, or fall back to the configured default
pub fn pick_initial_zoom(
    zoom_levels: &ZoomTable,
    viewport: Size,
    path: Option<&PathRecord>,
    locations: &BTreeMap<LocationKey, Location>,
    initial: &InitialViewConfig,
) -> usize {
    let zoom = if let Some(path) = path {
        pick_zoom_for_path(
            zoom_levels,
            path.width,
            path.height,
            viewport,
            initial.fit_margin,
        )
    } else {
        let origin = locations.contains_key(&LocationKey::Origin);
        let destination = locations.contains_key(&LocationKey::Destination);
        if origin != destination {
            initial.single_location_zoom
        } else {
            initial.default_zoom
        }
    };
    zoom.min(zoom_levels.last_index())
}

/// Initial center when the caller gives none: the route center, then the
/// origin, then the destination, then the configured default
pub fn pick_initial_center(
    path: Option<&PathRecord>,
    locations: &BTreeMap<LocationKey, Location>,
    initial: &InitialViewConfig,
) -> Point {
    if let Some(path) = path {
        return path.center();
    }
    [LocationKey::Origin, LocationKey::Destination]
        .iter()
        .find_map(|key| locations.get(key))
        .map(Location::position)
        .unwrap_or(initial.default_center)
}
