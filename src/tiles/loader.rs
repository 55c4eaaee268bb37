use super::source::TileSource;
use crate::core::config::TileGridConfig;
use crate::core::geo::{Point, Size, TileCoord};
use crate::core::zoom::ZoomLevel;
use std::ops::RangeInclusive;

/// One tile positioned inside the scaled map
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub coord: TileCoord,
    /// Left edge in scaled map pixels
    pub left: f64,
    /// Top edge in scaled map pixels
    pub top: f64,
    pub src: String,
}

/// The complete tile collection rendered for one load point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TileSet {
    pub zoom: usize,
    /// Offset the set was computed for
    pub origin: Point,
    pub tiles: Vec<TilePlacement>,
}

impl TileSet {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        self.tiles
            .iter()
            .any(|tile| tile.coord.col == col && tile.coord.row == row)
    }
}

/// Inclusive index window along one axis, clipped to `[0, count)`.
///
/// `buffer` extra tiles are taken on both sides of the viewport.
fn axis_window(offset: f64, extent: f64, tile: u32, buffer: u32, count: u32) -> Option<RangeInclusive<u32>> {
    let tile = tile as f64;
    let first = (offset / tile).floor() as i64 - buffer as i64;
    let last = first + (extent / tile).ceil() as i64 + 2 * buffer as i64;

    let first = first.max(0);
    let last = last.min(count as i64 - 1);
    if count == 0 || first > last {
        return None;
    }
    Some(first as u32..=last as u32)
}

/// Grid cells needed to cover a viewport at `offset` plus the prefetch margin.
///
/// Columns run from `floor(offset.x / tile_width) - buffer` to that value plus
/// `ceil(width / tile_width) + 2 * buffer`, intersected with the level's grid;
/// rows likewise. Output is row-major.
pub fn compute_visible_tiles(
    offset: Point,
    viewport: Size,
    level: &ZoomLevel,
    grid: &TileGridConfig,
) -> Vec<(u32, u32)> {
    let cols = axis_window(
        offset.x,
        viewport.width,
        grid.tile_width,
        grid.prefetch_buffer,
        level.grid_columns,
    );
    let rows = axis_window(
        offset.y,
        viewport.height,
        grid.tile_height,
        grid.prefetch_buffer,
        level.grid_rows,
    );

    match (cols, rows) {
        (Some(cols), Some(rows)) => rows
            .flat_map(|row| cols.clone().map(move |col| (col, row)))
            .collect(),
        _ => Vec::new(),
    }
}

/// Turns viewport positions into renderable tile sets
pub struct TileLoader {
    source: Box<dyn TileSource>,
    grid: TileGridConfig,
}

impl TileLoader {
    pub fn new(source: Box<dyn TileSource>, grid: TileGridConfig) -> Self {
        Self { source, grid }
    }

    pub fn grid(&self) -> &TileGridConfig {
        &self.grid
    }

    pub fn source(&self) -> &dyn TileSource {
        self.source.as_ref()
    }

    /// Builds the full replacement tile set for a viewport at `offset`
    pub fn load(&self, offset: Point, viewport: Size, zoom: usize, level: &ZoomLevel) -> TileSet {
        let tiles: Vec<TilePlacement> = compute_visible_tiles(offset, viewport, level, &self.grid)
            .into_iter()
            .map(|(col, row)| TilePlacement {
                coord: TileCoord::new(col, row, zoom),
                left: col as f64 * self.grid.tile_width as f64,
                top: row as f64 * self.grid.tile_height as f64,
                src: self.source.tile_path(&level.map_name, zoom, row, col),
            })
            .collect();

        log::debug!(
            "loading {} tiles at ({:.1}, {:.1}) zoom {}",
            tiles.len(),
            offset.x,
            offset.y,
            zoom
        );

        TileSet {
            zoom,
            origin: offset,
            tiles,
        }
    }
}

impl std::fmt::Debug for TileLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLoader").field("grid", &self.grid).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_SCALES;
    use crate::core::zoom::BaseMap;
    use crate::tiles::source::StaticAssetSource;

    fn level(index: usize) -> ZoomLevel {
        BaseMap::new("map", 7200, 6600, DEFAULT_SCALES.to_vec())
            .zoom_table(200, 200)
            .unwrap()
            .level(index)
            .clone()
    }

    fn viewport() -> Size {
        Size::new(500.0, 375.0)
    }

    #[test]
    fn test_window_clipped_at_origin() {
        let tiles = compute_visible_tiles(
            Point::new(0.0, 0.0),
            viewport(),
            &level(0),
            &TileGridConfig::default(),
        );
        // cols -1..=4 and rows -1..=3, clipped at zero
        assert_eq!(tiles.len(), 5 * 4);
        assert!(tiles.contains(&(0, 0)));
        assert!(tiles.contains(&(4, 3)));
        assert!(!tiles.contains(&(5, 0)));
    }

    #[test]
    fn test_window_interior() {
        let tiles = compute_visible_tiles(
            Point::new(650.0, 637.5),
            viewport(),
            &level(2),
            &TileGridConfig::default(),
        );
        // cols 2..=7, rows 2..=6
        let cols: Vec<u32> = tiles.iter().map(|t| t.0).collect();
        let rows: Vec<u32> = tiles.iter().map(|t| t.1).collect();
        assert_eq!(*cols.iter().min().unwrap(), 2);
        assert_eq!(*cols.iter().max().unwrap(), 7);
        assert_eq!(*rows.iter().min().unwrap(), 2);
        assert_eq!(*rows.iter().max().unwrap(), 6);
        assert_eq!(tiles.len(), 6 * 5);
    }

    #[test]
    fn test_window_clipped_to_grid() {
        let lvl = level(3);
        let tiles = compute_visible_tiles(
            Point::new(400.0, 450.0),
            viewport(),
            &lvl,
            &TileGridConfig::default(),
        );
        assert!(tiles
            .iter()
            .all(|&(c, r)| c < lvl.grid_columns && r < lvl.grid_rows));
        assert!(tiles.contains(&(4, 4)));
    }

    #[test]
    fn test_window_covers_expanded_viewport() {
        let lvl = level(1);
        let grid = TileGridConfig::default();
        let size = viewport();
        for &(x, y) in &[(0.0, 0.0), (123.4, 987.6), (1999.0, 2001.0), (3100.0, 2925.0)] {
            let offset = Point::new(x, y);
            let tiles = compute_visible_tiles(offset, size, &lvl, &grid);
            for row in 0..lvl.grid_rows {
                for col in 0..lvl.grid_columns {
                    let left = col as f64 * 200.0;
                    let top = row as f64 * 200.0;
                    let intersects = left <= x + size.width + 200.0
                        && left + 200.0 >= x - 200.0
                        && top <= y + size.height + 200.0
                        && top + 200.0 >= y - 200.0;
                    if intersects {
                        assert!(
                            tiles.contains(&(col, row)),
                            "missing tile ({col}, {row}) at offset ({x}, {y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_loader_builds_placements() {
        let loader = TileLoader::new(
            Box::new(StaticAssetSource::new("/tiles", "/p")),
            TileGridConfig::default(),
        );
        let set = loader.load(Point::new(650.0, 637.5), viewport(), 2, &level(2));

        assert_eq!(set.zoom, 2);
        assert_eq!(set.origin, Point::new(650.0, 637.5));
        let tile = set
            .tiles
            .iter()
            .find(|t| t.coord.col == 3 && t.coord.row == 4)
            .unwrap();
        assert_eq!(tile.left, 600.0);
        assert_eq!(tile.top, 800.0);
        assert_eq!(tile.src, "/tiles/map-2[4][3].png");
    }
}
