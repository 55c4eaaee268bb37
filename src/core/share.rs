//! Shareable links that reproduce the current view
//!
//! Encodes the route endpoints, walking pace and map center in the query
//! string of a bookmarkable URL, and reads them back.

use crate::core::constants::DEFAULT_MINUTES_PER_MILE;
use crate::core::geo::Point;
use crate::core::viewport::ViewState;
use crate::MapError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    View,
    Print,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Print => "print",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "print" => Self::Print,
            _ => Self::View,
        }
    }
}

/// Route request carried by a share link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLink {
    pub from: String,
    pub to: String,
    pub minutes_per_mile: u32,
    pub mode: ViewMode,
}

impl Default for ShareLink {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            minutes_per_mile: DEFAULT_MINUTES_PER_MILE,
            mode: ViewMode::View,
        }
    }
}

/// A decoded share link together with the view it points at
#[derive(Debug, Clone, PartialEq)]
pub struct SharedView {
    pub link: ShareLink,
    /// Zoom-0 map center, if present
    pub center: Option<Point>,
    pub zoom: Option<isize>,
}

impl ShareLink {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_minutes_per_mile(mut self, minutes_per_mile: u32) -> Self {
        self.minutes_per_mile = minutes_per_mile;
        self
    }

    pub fn with_mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builds `<base>?from=&to=&xoff=&yoff=&scale=&mpm=&mode=` for `state`
    pub fn to_url(&self, base: &str, state: &ViewState) -> crate::Result<Url> {
        let mut url = Url::parse(base).map_err(|e| MapError::ShareLink(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(MapError::ShareLink(format!("'{base}' cannot carry a query")).into());
        }

        url.query_pairs_mut()
            .clear()
            .append_pair("from", &self.from)
            .append_pair("to", &self.to)
            .append_pair("xoff", &format!("{}", state.center.x as i64))
            .append_pair("yoff", &format!("{}", state.center.y as i64))
            .append_pair("scale", &state.zoom.to_string())
            .append_pair("mpm", &self.minutes_per_mile.to_string())
            .append_pair("mode", self.mode.as_str());

        log::debug!("share link built: {}", url);
        Ok(url)
    }

    /// Reads a share link back; unknown or malformed values fall back to defaults
    pub fn parse(url: &str) -> crate::Result<SharedView> {
        let url = Url::parse(url).map_err(|e| MapError::ShareLink(e.to_string()))?;

        let mut link = ShareLink::default();
        let mut x = None;
        let mut y = None;
        let mut zoom = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "from" => link.from = value.into_owned(),
                "to" => link.to = value.into_owned(),
                "xoff" => x = value.parse::<f64>().ok(),
                "yoff" => y = value.parse::<f64>().ok(),
                "scale" => zoom = value.parse::<isize>().ok(),
                "mpm" => {
                    if let Ok(mpm) = value.parse::<u32>() {
                        link.minutes_per_mile = mpm;
                    }
                }
                "mode" => link.mode = ViewMode::parse(&value),
                other => log::trace!("ignoring share link parameter '{}'", other),
            }
        }

        let center = match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some(Point::new(x, y)),
            _ => None,
        };

        Ok(SharedView { link, center, zoom })
    }
}

/// Formats a walking duration as `M:SS`, rounding to the nearest second
pub fn format_walking_time(duration: Duration) -> String {
    let total = duration.as_secs_f64();
    let mut minutes = (total / 60.0).floor() as u64;
    let mut seconds = (total - minutes as f64 * 60.0).round() as u64;
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }
    format!("{}:{:02}", minutes, seconds)
}
