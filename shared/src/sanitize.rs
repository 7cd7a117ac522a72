use serde_json::Value;

use crate::{Point, RawPoint, RawStroke, Stroke, SubmitError};

#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub strokes: Vec<Stroke>,
    pub dropped_strokes: usize,
    pub dropped_points: usize,
}

/// Coerces captured strokes into finite integer triples.
///
/// Points with a non-finite coordinate or timestamp are dropped, a missing
/// timestamp becomes `now_ms`, and strokes left empty disappear. Fails only
/// when nothing survives.
pub fn sanitize_strokes(strokes: &[RawStroke], now_ms: i64) -> Result<Sanitized, SubmitError> {
    let mut sanitized = Vec::with_capacity(strokes.len());
    let mut dropped_strokes = 0;
    let mut dropped_points = 0;
    for stroke in strokes {
        let points: Stroke = stroke
            .iter()
            .filter_map(|point| sanitize_point(*point, now_ms))
            .collect();
        dropped_points += stroke.len() - points.len();
        if points.is_empty() {
            dropped_strokes += 1;
        } else {
            sanitized.push(points);
        }
    }
    if sanitized.is_empty() {
        return Err(SubmitError::NoValidStrokes);
    }
    Ok(Sanitized {
        strokes: sanitized,
        dropped_strokes,
        dropped_points,
    })
}

/// Same as [`sanitize_strokes`] for loosely typed JSON such as
/// `[[[x, y, t], ...], ...]` handed over by the host page.
pub fn sanitize_json(value: &Value, now_ms: i64) -> Result<Sanitized, SubmitError> {
    let entries = value.as_array().map(Vec::as_slice).unwrap_or_default();
    let mut raw = Vec::with_capacity(entries.len());
    let mut malformed_strokes = 0;
    let mut malformed_points = 0;
    for entry in entries {
        let Some(points) = entry.as_array() else {
            malformed_strokes += 1;
            continue;
        };
        let stroke: RawStroke = points.iter().filter_map(raw_point_from_json).collect();
        malformed_points += points.len() - stroke.len();
        raw.push(stroke);
    }
    let mut sanitized = sanitize_strokes(&raw, now_ms)?;
    sanitized.dropped_strokes += malformed_strokes;
    sanitized.dropped_points += malformed_points;
    Ok(sanitized)
}

fn raw_point_from_json(value: &Value) -> Option<RawPoint> {
    let fields = value.as_array()?;
    let x = fields.first()?.as_f64()?;
    let y = fields.get(1)?.as_f64()?;
    let t = fields.get(2).and_then(Value::as_f64);
    Some(RawPoint { x, y, t })
}

fn sanitize_point(point: RawPoint, now_ms: i64) -> Option<Point> {
    let x = round_half_up(point.x);
    let y = round_half_up(point.y);
    let t = point.t.map(round_half_up).unwrap_or(now_ms as f64);
    Some(Point {
        x: to_integer(x)?,
        y: to_integer(y)?,
        t: to_integer(t)?,
    })
}

/// `None` for NaN, infinities and values an `i64` cannot hold.
fn to_integer(value: f64) -> Option<i64> {
    const RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;
    RANGE.contains(&value).then_some(value as i64)
}

/// Nearest integer, halves toward positive infinity (`-2.5` becomes `-2`).
fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}
