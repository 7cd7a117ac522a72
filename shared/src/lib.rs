use serde::{Deserialize, Serialize};

pub mod api;
pub mod bound;
pub mod capture;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod session;

pub use config::{ClientConfig, Identity, SubmissionLimits, SurfaceConfig};
pub use error::{ApiError, SubmitError};

/// A finalized sample point: surface-local pixel coordinates plus a
/// millisecond wall-clock timestamp. Travels as `[x, y, t]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(from = "[i64; 3]", into = "[i64; 3]")]
pub struct Point {
    pub x: i64,
    pub y: i64,
    pub t: i64,
}

impl From<[i64; 3]> for Point {
    fn from([x, y, t]: [i64; 3]) -> Self {
        Self { x, y, t }
    }
}

impl From<Point> for [i64; 3] {
    fn from(point: Point) -> Self {
        [point.x, point.y, point.t]
    }
}

pub type Stroke = Vec<Point>;

/// A point as recorded from input, before sanitization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub t: Option<f64>,
}

impl From<Point> for RawPoint {
    fn from(point: Point) -> Self {
        Self {
            x: point.x as f64,
            y: point.y as f64,
            t: Some(point.t as f64),
        }
    }
}

pub type RawStroke = Vec<RawPoint>;

#[cfg(test)]
pub(crate) fn raw_strokes(strokes: &[Stroke]) -> Vec<RawStroke> {
    strokes
        .iter()
        .map(|stroke| stroke.iter().copied().map(RawPoint::from).collect())
        .collect()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SubmissionPayload {
    pub strokes: Vec<Stroke>,
    pub transcription: String,
}
