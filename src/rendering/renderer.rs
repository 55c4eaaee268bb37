use crate::core::geo::Point;
use crate::overlay::{OverlayFrame, OverlayImage};
use crate::tiles::TileSet;

/// Render callbacks invoked by the viewport on every visible change.
///
/// Implementations own the actual drawing surface (DOM, canvas, GPU); the
/// viewport only decides what is visible and where.
pub trait MapRenderer {
    /// Moves the map layer so that `offset` sits at the container's top-left corner
    fn move_to(&mut self, offset: Point);

    /// Replaces the whole tile collection
    fn replace_tiles(&mut self, tiles: &TileSet);

    /// Replaces every location marker and the route element
    fn replace_overlays(&mut self, overlays: &OverlayFrame);

    /// Highlights the selected zoom control
    fn select_zoom(&mut self, _zoom: usize) {}

    /// Starts fetching route images ahead of use
    fn preload(&mut self, _images: &[OverlayImage]) {}
}

impl<R: MapRenderer + ?Sized> MapRenderer for Box<R> {
    fn move_to(&mut self, offset: Point) {
        (**self).move_to(offset)
    }

    fn replace_tiles(&mut self, tiles: &TileSet) {
        (**self).replace_tiles(tiles)
    }

    fn replace_overlays(&mut self, overlays: &OverlayFrame) {
        (**self).replace_overlays(overlays)
    }

    fn select_zoom(&mut self, zoom: usize) {
        (**self).select_zoom(zoom)
    }

    fn preload(&mut self, images: &[OverlayImage]) {
        (**self).preload(images)
    }
}
