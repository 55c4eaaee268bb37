//! Initialization data handed to the viewer by the page that hosts it.
//!
//! Everything here is parsed and validated once. Invalid data is a fatal
//! startup error; once a viewport is built, navigation never fails.

use crate::core::geo::{Point, Size};
use crate::core::zoom::BaseMap;
use crate::overlay::{Location, PathRecord};
use crate::MapError;
use serde::{Deserialize, Serialize};

/// A selectable location as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: usize,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl LocationRecord {
    pub fn to_location(&self) -> Location {
        Location::new(self.name.clone(), self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapInit {
    /// Size of the visible container in pixels
    pub container: Size,
    #[serde(default)]
    pub center: Option<Point>,
    #[serde(default)]
    pub zoom: Option<isize>,
    /// Name of the selected base map; the first one when absent
    #[serde(default)]
    pub base_map: Option<String>,
    #[serde(default)]
    pub base_maps: Vec<BaseMap>,
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
    #[serde(default)]
    pub origin: Option<Location>,
    #[serde(default)]
    pub destination: Option<Location>,
    #[serde(default)]
    pub path: Option<PathRecord>,
}

impl MapInit {
    pub fn new(container: Size) -> Self {
        Self {
            container,
            center: None,
            zoom: None,
            base_map: None,
            base_maps: vec![BaseMap::default()],
            locations: Vec::new(),
            origin: None,
            destination: None,
            path: None,
        }
    }

    /// Parses and validates init data
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let init: Self = serde_json::from_str(json).map_err(MapError::from)?;
        init.validate()?;
        Ok(init)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !self.container.is_positive() {
            return Err(invalid(format!(
                "container must have a positive size, got {}x{}",
                self.container.width, self.container.height
            )));
        }

        if self.base_maps.is_empty() {
            return Err(invalid("no base maps configured".to_string()));
        }
        for map in &self.base_maps {
            map.validate()?;
        }
        self.selected_base_map()?;

        if let Some(center) = self.center {
            check_finite("center", center.x, center.y)?;
        }
        for record in &self.locations {
            check_finite(&record.name, record.x, record.y)?;
        }
        for endpoint in self.origin.iter().chain(self.destination.iter()) {
            check_finite(&endpoint.name, endpoint.x, endpoint.y)?;
        }
        if let Some(path) = &self.path {
            let values = [path.x, path.y, path.width, path.height, path.distance];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(invalid("path geometry is not finite".to_string()));
            }
            if path.width < 0.0 || path.height < 0.0 {
                return Err(invalid("path has a negative size".to_string()));
            }
        }

        Ok(())
    }

    /// The base map named by `base_map`, or the first one
    pub fn selected_base_map(&self) -> crate::Result<&BaseMap> {
        match &self.base_map {
            Some(name) => match self.base_maps.iter().find(|map| &map.name == name) {
                Some(map) => Ok(map),
                None => Err(MapError::UnknownBaseMap(name.clone()).into()),
            },
            None => self
                .base_maps
                .first()
                .ok_or_else(|| invalid("no base maps configured".to_string())),
        }
    }
}

fn invalid(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    MapError::InvalidInit(message).into()
}

fn check_finite(what: &str, x: f64, y: f64) -> crate::Result<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("coordinates of '{what}' are not finite")))
    }
}
