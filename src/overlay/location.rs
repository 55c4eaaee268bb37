use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Key under which a location is stored.
///
/// Ordinary locations use their externally assigned index; the endpoints of
/// the current route use the reserved keys `src` and `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKey {
    Index(usize),
    Origin,
    Destination,
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Origin => f.write_str("src"),
            Self::Destination => f.write_str("dst"),
        }
    }
}

/// A named point in zoom-0 map coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
