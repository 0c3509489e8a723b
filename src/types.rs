// src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QuadtrackError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Contours with area at or below this are discarded as noise.
    /// The comparison is strict: area must exceed the threshold.
    pub min_contour_area: f64,
    /// Tracked color bands, iterated in this order on every frame.
    pub bands: Vec<ColorBand>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_contour_area: 500.0,
            bands: default_palette(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// A named closed range in HSV space (OpenCV convention: H in [0,180],
/// S and V in [0,255]). Pixels inside the range are candidate ball pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorBand {
    pub name: String,
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorBand {
    pub fn new(name: &str, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }
}

/// The stock palette. None of these bands wraps the hue seam at 0/180;
/// a wrapped band (e.g. red) would need a two-mask union in the detector.
pub fn default_palette() -> Vec<ColorBand> {
    vec![
        ColorBand::new("orange", [10, 100, 20], [25, 255, 255]),
        ColorBand::new("green", [36, 25, 25], [86, 255, 255]),
        ColorBand::new("yellow", [25, 50, 50], [35, 255, 255]),
        ColorBand::new("white", [0, 0, 200], [180, 20, 255]),
    ]
}

/// One qualifying blob in one frame: the band it matched and the center
/// of its bounding box. Not carried across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub color: String,
    pub centroid: (i32, i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Entry,
    Exit,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Entry => "Entry",
            EventKind::Exit => "Exit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = QuadtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Entry" => Ok(EventKind::Entry),
            "Exit" => Ok(EventKind::Exit),
            other => Err(QuadtrackError::data(format!(
                "unknown event kind '{other}'"
            ))),
        }
    }
}

/// A quadrant entry or exit, appended to the run's event log in the
/// order it was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantEvent {
    /// Seconds from the start of the video: frame index / fps.
    pub timestamp: f64,
    pub quadrant: u32,
    pub color: String,
    pub kind: EventKind,
}
