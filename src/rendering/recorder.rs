use super::renderer::MapRenderer;
use crate::core::geo::Point;
use crate::overlay::{OverlayFrame, OverlayImage};
use crate::tiles::TileSet;

/// Renderer that keeps the latest state of every callback and counts calls.
///
/// Useful for headless hosts, for diffing against a real surface, and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub position: Option<Point>,
    pub tiles: Option<TileSet>,
    pub overlays: Option<OverlayFrame>,
    pub selected_zoom: Option<usize>,
    pub preloaded: Vec<OverlayImage>,
    pub moves: usize,
    pub tile_loads: usize,
    pub overlay_renders: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the call counters while keeping the current state
    pub fn reset_counters(&mut self) {
        self.moves = 0;
        self.tile_loads = 0;
        self.overlay_renders = 0;
    }
}

impl MapRenderer for RecordingRenderer {
    fn move_to(&mut self, offset: Point) {
        self.position = Some(offset);
        self.moves += 1;
    }

    fn replace_tiles(&mut self, tiles: &TileSet) {
        self.tiles = Some(tiles.clone());
        self.tile_loads += 1;
    }

    fn replace_overlays(&mut self, overlays: &OverlayFrame) {
        self.overlays = Some(overlays.clone());
        self.overlay_renders += 1;
    }

    fn select_zoom(&mut self, zoom: usize) {
        self.selected_zoom = Some(zoom);
    }

    /// Keeps only the images of the latest route
    fn preload(&mut self, images: &[OverlayImage]) {
        self.preloaded.clear();
        self.preloaded.extend_from_slice(images);
    }
}
