use crate::core::geo::Point;
use crate::overlay::location::LocationKey;
use serde::{Deserialize, Serialize};

/// A panning direction, already normalized from whatever device produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// Order in which held keys are applied on each repeat tick
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Unit step in screen space (y grows downwards)
    pub fn unit(&self) -> Point {
        match self {
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Up => Point::new(0.0, -1.0),
            Direction::Right => Point::new(1.0, 0.0),
            Direction::Down => Point::new(0.0, 1.0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Semantic navigation commands issued by input collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavCommand {
    /// A pan button was pressed
    PanButton { direction: Direction },
    /// A direction key went down
    KeyDown { direction: Direction },
    /// A direction key was released
    KeyUp { direction: Direction },
    /// Move by a pixel delta in current-zoom space
    Pan { dx: f64, dy: f64 },
    ZoomIn,
    ZoomOut,
    /// Jump to a zoom index; out-of-range indices are corrected
    ZoomTo { index: isize },
    /// Return to the initial view
    Recenter,
    /// Snap to a zoom-0 map point
    CenterOn { x: f64, y: f64 },
    /// Animate to a zoom-0 map point
    SlideTo { x: f64, y: f64 },
    /// Animate to a stored location
    SlideToLocation { key: LocationKey },
    DragStart { pointer: Point },
    DragMove { pointer: Point },
    DragEnd,
}
