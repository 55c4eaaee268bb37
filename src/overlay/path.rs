use crate::core::geo::Point;
use crate::core::zoom::ZoomTable;
use crate::tiles::source::TileSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geometry of a computed route as supplied by the server, in zoom-0 coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    pub origin: usize,
    pub destination: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Route length in miles; zero means no route
    pub distance: f64,
}

impl PathRecord {
    /// Center of the route's bounding box
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A pre-scaled route image for one zoom level
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayImage {
    pub zoom: usize,
    pub src: String,
    pub width: f64,
    pub height: f64,
}

/// The live route overlay together with its per-level images
#[derive(Debug, Clone, PartialEq)]
pub struct PathOverlay {
    record: PathRecord,
    images: Vec<OverlayImage>,
}

impl PathOverlay {
    /// Resolves one image per zoom level, each pre-scaled by the level's scale
    pub fn new(record: PathRecord, zoom_levels: &ZoomTable, source: &dyn TileSource) -> Self {
        let images = zoom_levels
            .iter()
            .enumerate()
            .map(|(zoom, level)| OverlayImage {
                zoom,
                src: source.path_image(record.origin, record.destination, zoom),
                width: record.width * level.scale,
                height: record.height * level.scale,
            })
            .collect();

        Self { record, images }
    }

    pub fn record(&self) -> &PathRecord {
        &self.record
    }

    pub fn images(&self) -> &[OverlayImage] {
        &self.images
    }

    pub fn image(&self, zoom: usize) -> Option<&OverlayImage> {
        self.images.get(zoom)
    }

    pub fn distance(&self) -> f64 {
        self.record.distance
    }

    /// A zero-length route exists only to carry endpoints and is never drawn
    pub fn is_drawable(&self) -> bool {
        self.record.distance != 0.0
    }

    /// Time needed to walk the route at `minutes_per_mile`, saturating at [`Duration::MAX`]
    pub fn walking_time(&self, minutes_per_mile: f64) -> Duration {
        let minutes = (self.record.distance * minutes_per_mile).max(0.0);
        Duration::try_from_secs_f64(minutes * 60.0).unwrap_or(Duration::MAX)
    }
}
