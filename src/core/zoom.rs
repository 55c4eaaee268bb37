//! Static per-level geometry of a base map.
//!
//! A [`ZoomTable`] is built once at startup, either from trusted constants or
//! from a [`BaseMap`] description, and never changes afterwards. Index 0 is
//! full resolution; higher indices are progressively more zoomed out.

use crate::core::constants::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_NAME, DEFAULT_MAP_WIDTH, DEFAULT_SCALES,
};
use crate::core::geo::{Point, Size};
use crate::MapError;
use serde::{Deserialize, Serialize};

/// Geometry of one zoom level of a base map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomLevel {
    /// Name of the base map the tiles belong to
    pub map_name: String,
    /// Size multiplier relative to zoom-0 coordinates
    pub scale: f64,
    /// Number of tile columns; the last column may be partial
    pub grid_columns: u32,
    /// Number of tile rows; the last row may be partial
    pub grid_rows: u32,
    /// Width of the scaled map in pixels
    pub map_pixel_width: u32,
    /// Height of the scaled map in pixels
    pub map_pixel_height: u32,
}

impl ZoomLevel {
    pub fn new(
        map_name: impl Into<String>,
        scale: f64,
        grid_columns: u32,
        grid_rows: u32,
        map_pixel_width: u32,
        map_pixel_height: u32,
    ) -> Self {
        Self {
            map_name: map_name.into(),
            scale,
            grid_columns,
            grid_rows,
            map_pixel_width,
            map_pixel_height,
        }
    }

    /// Largest horizontal offset that keeps the viewport on the map
    pub fn max_offset_x(&self, viewport: Size) -> f64 {
        self.map_pixel_width as f64 - viewport.width
    }

    /// Largest vertical offset that keeps the viewport on the map
    pub fn max_offset_y(&self, viewport: Size) -> f64 {
        self.map_pixel_height as f64 - viewport.height
    }

    pub fn max_offset(&self, viewport: Size) -> Point {
        Point::new(self.max_offset_x(viewport), self.max_offset_y(viewport))
    }
}

/// Ordered list of zoom levels, most detailed first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoomTable")]
pub struct ZoomTable {
    levels: Vec<ZoomLevel>,
}

/// Unchecked wire form of [`ZoomTable`]
#[derive(Deserialize)]
struct RawZoomTable {
    levels: Vec<ZoomLevel>,
}

impl TryFrom<RawZoomTable> for ZoomTable {
    type Error = Box<dyn std::error::Error + Send + Sync>;

    fn try_from(raw: RawZoomTable) -> crate::Result<Self> {
        ZoomTable::new(raw.levels)
    }
}

impl ZoomTable {
    /// Creates a table, checking that scales are positive and strictly decreasing
    pub fn new(levels: Vec<ZoomLevel>) -> crate::Result<Self> {
        if levels.is_empty() {
            return Err(MapError::InvalidInit("zoom table has no levels".to_string()).into());
        }
        validate_scales(levels.iter().map(|level| level.scale))?;
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Level at `index`, saturating to the last level
    pub fn level(&self, index: usize) -> &ZoomLevel {
        &self.levels[index.min(self.last_index())]
    }

    pub fn scale(&self, index: usize) -> f64 {
        self.level(index).scale
    }

    pub fn levels(&self) -> &[ZoomLevel] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoomLevel> {
        self.levels.iter()
    }

    /// Clamps a requested index into range, returning `None` when it was already valid
    pub fn correct_index(&self, requested: isize) -> Option<usize> {
        if requested < 0 {
            Some(0)
        } else if requested as usize > self.last_index() {
            Some(self.last_index())
        } else {
            None
        }
    }
}

fn validate_scales(scales: impl Iterator<Item = f64>) -> crate::Result<()> {
    let mut previous: Option<f64> = None;
    for scale in scales {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(MapError::InvalidInit(format!("invalid zoom scale {scale}")).into());
        }
        if let Some(prev) = previous {
            if scale >= prev {
                return Err(MapError::InvalidInit(format!(
                    "zoom scales must be strictly decreasing ({prev} then {scale})"
                ))
                .into());
            }
        }
        previous = Some(scale);
    }
    Ok(())
}

/// A selectable base map described by its zoom-0 size and its scale list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMap {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub scales: Vec<f64>,
}

impl BaseMap {
    pub fn new(name: impl Into<String>, width: u32, height: u32, scales: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            scales,
        }
    }

    /// Checks the size and the scale list
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MapError::InvalidInit(format!(
                "base map '{}' has an empty size",
                self.name
            ))
            .into());
        }
        if self.scales.is_empty() {
            return Err(
                MapError::InvalidInit(format!("base map '{}' has no scales", self.name)).into(),
            );
        }
        validate_scales(self.scales.iter().copied())
    }

    /// Derives the per-level geometry for tiles of the given size
    pub fn zoom_table(&self, tile_width: u32, tile_height: u32) -> crate::Result<ZoomTable> {
        self.validate()?;
        if tile_width == 0 || tile_height == 0 {
            return Err(MapError::InvalidInit("tile size must be non-zero".to_string()).into());
        }

        let levels = self
            .scales
            .iter()
            .map(|&scale| {
                let pixel_width = (self.width as f64 * scale).ceil() as u32;
                let pixel_height = (self.height as f64 * scale).ceil() as u32;
                ZoomLevel::new(
                    self.name.clone(),
                    scale,
                    pixel_width.div_ceil(tile_width),
                    pixel_height.div_ceil(tile_height),
                    pixel_width,
                    pixel_height,
                )
            })
            .collect();

        ZoomTable::new(levels)
    }
}

impl Default for BaseMap {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAP_NAME,
            DEFAULT_MAP_WIDTH,
            DEFAULT_MAP_HEIGHT,
            DEFAULT_SCALES.to_vec(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus() -> ZoomTable {
        BaseMap::default().zoom_table(200, 200).unwrap()
    }

    #[test]
    fn test_base_map_derives_grid() {
        let table = campus();
        let grids: Vec<(u32, u32)> = table
            .iter()
            .map(|l| (l.grid_columns, l.grid_rows))
            .collect();
        assert_eq!(grids, vec![(36, 33), (18, 17), (9, 9), (5, 5)]);

        let pixels: Vec<(u32, u32)> = table
            .iter()
            .map(|l| (l.map_pixel_width, l.map_pixel_height))
            .collect();
        assert_eq!(
            pixels,
            vec![(7200, 6600), (3600, 3300), (1800, 1650), (900, 825)]
        );
    }

    #[test]
    fn test_max_offset() {
        let table = campus();
        let viewport = Size::new(500.0, 375.0);
        assert_eq!(table.level(2).max_offset(viewport), Point::new(1300.0, 1275.0));
        assert_eq!(table.level(0).max_offset_x(viewport), 6700.0);
    }

    #[test]
    fn test_rejects_non_decreasing_scales() {
        let map = BaseMap::new("map", 100, 100, vec![1.0, 0.5, 0.5]);
        assert!(map.zoom_table(200, 200).is_err());

        let map = BaseMap::new("map", 100, 100, vec![1.0, -0.5]);
        assert!(map.zoom_table(200, 200).is_err());

        assert!(ZoomTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialize_validates_levels() {
        assert!(serde_json::from_str::<ZoomTable>(r#"{"levels": []}"#).is_err());

        let zero_scale = r#"{"levels": [{
            "map_name": "m", "scale": 0.0, "grid_columns": 1, "grid_rows": 1,
            "map_pixel_width": 0, "map_pixel_height": 0
        }]}"#;
        let err = serde_json::from_str::<ZoomTable>(zero_scale).unwrap_err();
        assert!(err.to_string().contains("invalid zoom scale"));

        let json = serde_json::to_string(&campus()).unwrap();
        assert_eq!(serde_json::from_str::<ZoomTable>(&json).unwrap(), campus());
    }

    #[test]
    fn test_correct_index() {
        let table = campus();
        assert_eq!(table.correct_index(-1), Some(0));
        assert_eq!(table.correct_index(9), Some(3));
        assert_eq!(table.correct_index(2), None);
    }
}
