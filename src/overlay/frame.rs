use super::location::{Location, LocationKey};
use super::path::PathOverlay;
use crate::core::zoom::ZoomTable;
use std::collections::BTreeMap;

/// A location marker positioned in scaled map pixels
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerElement {
    pub key: LocationKey,
    pub name: String,
    pub left: i64,
    pub top: i64,
}

/// The route element positioned and sized in scaled map pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
    pub src: String,
}

/// Everything drawn above the tiles for one zoom level
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayFrame {
    pub zoom: usize,
    pub markers: Vec<MarkerElement>,
    pub path: Option<PathElement>,
}

/// Lays out all location markers and the live route for `zoom`.
///
/// Positions are rounded while sizes are rounded up, so scaled routes never
/// leave a one pixel gap at the cost of a possible one pixel overdraw.
pub fn render_overlays(
    locations: &BTreeMap<LocationKey, Location>,
    path: Option<&PathOverlay>,
    zoom_levels: &ZoomTable,
    zoom: usize,
) -> OverlayFrame {
    let scale = zoom_levels.scale(zoom);

    let markers = locations
        .iter()
        .map(|(key, location)| MarkerElement {
            key: *key,
            name: location.name.clone(),
            left: (location.x * scale).round() as i64,
            top: (location.y * scale).round() as i64,
        })
        .collect();

    let path = path
        .filter(|path| path.is_drawable())
        .and_then(|path| {
            let image = path.image(zoom)?;
            let record = path.record();
            Some(PathElement {
                left: (record.x * scale).round() as i64,
                top: (record.y * scale).round() as i64,
                width: (record.width * scale).ceil() as i64,
                height: (record.height * scale).ceil() as i64,
                src: image.src.clone(),
            })
        });

    OverlayFrame {
        zoom,
        markers,
        path,
    }
}
