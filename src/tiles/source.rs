use crate::core::config::AssetConfig;

/// Resolves image resources for tiles and path overlays.
///
/// Both functions are pure; the resulting paths are handed to the platform's
/// image primitive and never validated here.
pub trait TileSource: Send + Sync {
    /// Resource path of the tile at `(row, col)` of `map_name` at `zoom`.
    fn tile_path(&self, map_name: &str, zoom: usize, row: u32, col: u32) -> String;

    /// Resource path of the pre-rendered route image between two locations.
    fn path_image(&self, origin: usize, destination: usize, zoom: usize) -> String;
}

/// Static asset layout: `<grid_dir>/<map>-<zoom>[<row>][<col>].png` for tiles
/// and `<paths_dir>/im-<min>-<max>-<zoom>.png` for path overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAssetSource {
    grid_dir: String,
    paths_dir: String,
}

impl StaticAssetSource {
    pub fn new(grid_dir: impl Into<String>, paths_dir: impl Into<String>) -> Self {
        Self {
            grid_dir: grid_dir.into(),
            paths_dir: paths_dir.into(),
        }
    }

    pub fn from_config(assets: &AssetConfig) -> Self {
        Self::new(assets.grid_dir.clone(), assets.paths_dir.clone())
    }
}

impl Default for StaticAssetSource {
    fn default() -> Self {
        Self::from_config(&AssetConfig::default())
    }
}

impl TileSource for StaticAssetSource {
    fn tile_path(&self, map_name: &str, zoom: usize, row: u32, col: u32) -> String {
        format!("{}/{}-{}[{}][{}].png", self.grid_dir, map_name, zoom, row, col)
    }

    fn path_image(&self, origin: usize, destination: usize, zoom: usize) -> String {
        // images are stored once per unordered endpoint pair
        let (min, max) = if origin > destination {
            (destination, origin)
        } else {
            (origin, destination)
        };
        format!("{}/im-{}-{}-{}.png", self.paths_dir, min, max, zoom)
    }
}
