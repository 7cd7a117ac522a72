//! Pointer input to strokes.
//!
//! `CaptureSession` records exact input coordinates and hands back `PathOp`s
//! for the live preview. The ops are cosmetic: they never feed back into the
//! recorded points.

use crate::{RawPoint, RawStroke};

/// Surface-local coordinate in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Viewport (client) position relative to the surface's top-left corner.
    /// Fractions are kept; rounding happens at sanitization.
    pub fn from_client(client_x: f64, client_y: f64, left: f64, top: f64) -> Self {
        Self::new(client_x - left, client_y - top)
    }

    pub fn midpoint(self, other: SurfacePoint) -> SurfacePoint {
        SurfacePoint {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Live path instruction for the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    Begin { at: SurfacePoint },
    /// Quadratic segment anchored at the previous position, ending halfway
    /// to the current one.
    Quad {
        control: SurfacePoint,
        end: SurfacePoint,
    },
    End,
}

pub enum CaptureMode {
    Idle,
    Drawing {
        stroke: RawStroke,
        last: SurfacePoint,
    },
}

pub struct CaptureSession {
    strokes: Vec<RawStroke>,
    mode: CaptureMode,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            mode: CaptureMode::Idle,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, CaptureMode::Drawing { .. })
    }

    /// Committed strokes in drawing order.
    pub fn strokes(&self) -> &[RawStroke] {
        &self.strokes
    }

    pub fn open_stroke(&self) -> Option<&RawStroke> {
        match &self.mode {
            CaptureMode::Drawing { stroke, .. } => Some(stroke),
            CaptureMode::Idle => None,
        }
    }

    pub fn pointer_down(&mut self, at: SurfacePoint, now_ms: f64) -> Option<PathOp> {
        if !at.is_finite() {
            return None;
        }
        // A missed pointer-up must not glue two strokes together.
        self.commit_open();
        self.mode = CaptureMode::Drawing {
            stroke: vec![raw_point(at, now_ms)],
            last: at,
        };
        Some(PathOp::Begin { at })
    }

    pub fn pointer_move(&mut self, at: SurfacePoint, now_ms: f64) -> Option<PathOp> {
        if !at.is_finite() {
            return None;
        }
        let CaptureMode::Drawing { stroke, last } = &mut self.mode else {
            return None;
        };
        stroke.push(raw_point(at, now_ms));
        let control = *last;
        *last = at;
        Some(PathOp::Quad {
            control,
            end: control.midpoint(at),
        })
    }

    /// Pointer up, leave or cancel.
    pub fn pointer_up(&mut self) -> Option<PathOp> {
        if !self.is_drawing() {
            return None;
        }
        self.commit_open();
        Some(PathOp::End)
    }

    /// The surface lost its pixels (resize). Whatever was being drawn is kept
    /// as a finished stroke; the next input starts a fresh path.
    pub fn interrupt(&mut self) {
        self.commit_open();
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.mode = CaptureMode::Idle;
    }

    fn commit_open(&mut self) {
        if let CaptureMode::Drawing { stroke, .. } =
            std::mem::replace(&mut self.mode, CaptureMode::Idle)
        {
            if !stroke.is_empty() {
                self.strokes.push(stroke);
            }
        }
    }
}

/// Path ops that redraw a committed stroke the way it looked while drawn.
pub fn replay(stroke: &[RawPoint]) -> Vec<PathOp> {
    let mut points = stroke
        .iter()
        .map(|point| SurfacePoint::new(point.x, point.y))
        .filter(|point| point.is_finite());
    let Some(first) = points.next() else {
        return Vec::new();
    };
    let mut ops = vec![PathOp::Begin { at: first }];
    let mut last = first;
    for point in points {
        ops.push(PathOp::Quad {
            control: last,
            end: last.midpoint(point),
        });
        last = point;
    }
    ops.push(PathOp::End);
    ops
}

fn raw_point(at: SurfacePoint, now_ms: f64) -> RawPoint {
    RawPoint {
        x: at.x,
        y: at.y,
        t: Some(now_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn p(x: f64, y: f64) -> SurfacePoint {
        SurfacePoint::new(x, y)
    }

    #[test]
    fn stroke_has_one_point_per_move_plus_down() {
        let mut session = CaptureSession::new();
        session.pointer_down(p(1.0, 1.0), 100.0);
        for i in 0..7 {
            session.pointer_move(p(2.0 + i as f64, 3.0), 101.0 + i as f64);
        }
        session.pointer_up();
        assert_eq!(session.strokes().len(), 1);
        assert_eq!(session.strokes()[0].len(), 8);
        assert!(!session.is_drawing());
    }

    #[test]
    fn points_keep_event_order_and_raw_coordinates() {
        let mut session = CaptureSession::new();
        session.pointer_down(p(10.6, 20.4), 1000.0);
        session.pointer_move(p(11.2, 19.9), 1001.0);
        session.pointer_up();
        assert_eq!(
            session.strokes()[0],
            vec![
                RawPoint {
                    x: 10.6,
                    y: 20.4,
                    t: Some(1000.0),
                },
                RawPoint {
                    x: 11.2,
                    y: 19.9,
                    t: Some(1001.0),
                },
            ]
        );
    }

    #[test]
    fn fractional_client_positions_are_recorded_unrounded() {
        let mut session = CaptureSession::new();
        session.pointer_down(SurfacePoint::from_client(10.6, 20.4, 0.0, 0.0), 1000.0);
        session.pointer_move(SurfacePoint::from_client(31.5, 48.5, 20.25, 28.0), 1001.0);
        session.pointer_up();
        let recorded: Vec<(f64, f64)> = session.strokes()[0]
            .iter()
            .map(|point| (point.x, point.y))
            .collect();
        assert_eq!(recorded, vec![(10.6, 20.4), (11.25, 20.5)]);

        let sanitized = crate::sanitize::sanitize_strokes(session.strokes(), 0).unwrap();
        assert_eq!(
            sanitized.strokes[0],
            vec![Point::from([11, 20, 1000]), Point::from([11, 21, 1001])]
        );
    }

    #[test]
    fn move_emits_quad_through_midpoint() {
        let mut session = CaptureSession::new();
        assert_eq!(
            session.pointer_down(p(0.0, 0.0), 0.0),
            Some(PathOp::Begin { at: p(0.0, 0.0) })
        );
        assert_eq!(
            session.pointer_move(p(10.0, 4.0), 1.0),
            Some(PathOp::Quad {
                control: p(0.0, 0.0),
                end: p(5.0, 2.0),
            })
        );
        assert_eq!(
            session.pointer_move(p(20.0, 4.0), 2.0),
            Some(PathOp::Quad {
                control: p(10.0, 4.0),
                end: p(15.0, 4.0),
            })
        );
        assert_eq!(session.pointer_up(), Some(PathOp::End));
    }

    #[test]
    fn moves_and_ups_while_idle_do_nothing() {
        let mut session = CaptureSession::new();
        assert_eq!(session.pointer_move(p(1.0, 1.0), 0.0), None);
        assert_eq!(session.pointer_up(), None);
        assert!(session.strokes().is_empty());
        assert!(session.open_stroke().is_none());
    }

    #[test]
    fn open_stroke_is_not_committed_until_up() {
        let mut session = CaptureSession::new();
        session.pointer_down(p(1.0, 1.0), 0.0);
        session.pointer_move(p(2.0, 2.0), 1.0);
        assert!(session.strokes().is_empty());
        assert_eq!(session.open_stroke().map(|stroke| stroke.len()), Some(2));
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut session = CaptureSession::new();
        assert_eq!(session.pointer_down(p(f64::NAN, 1.0), 0.0), None);
        assert!(!session.is_drawing());
        session.pointer_down(p(1.0, 1.0), 0.0);
        assert_eq!(session.pointer_move(p(1.0, f64::INFINITY), 1.0), None);
        session.pointer_up();
        assert_eq!(session.strokes()[0].len(), 1);
    }

    #[test]
    fn second_down_commits_the_open_stroke() {
        let mut session = CaptureSession::new();
        session.pointer_down(p(1.0, 1.0), 0.0);
        session.pointer_down(p(5.0, 5.0), 1.0);
        session.pointer_up();
        assert_eq!(session.strokes().len(), 2);
    }

    #[test]
    fn clear_after_three_strokes_resets_everything() {
        let mut session = CaptureSession::new();
        for i in 0..3 {
            session.pointer_down(p(i as f64, 0.0), 0.0);
            session.pointer_move(p(i as f64, 1.0), 1.0);
            session.pointer_up();
        }
        session.pointer_down(p(9.0, 9.0), 2.0);
        assert_eq!(session.strokes().len(), 3);
        session.clear();
        assert_eq!(session.strokes().len(), 0);
        assert!(session.open_stroke().is_none());
        assert!(!session.is_drawing());
    }

    #[test]
    fn replay_matches_live_ops() {
        let mut session = CaptureSession::new();
        let mut live = Vec::new();
        live.extend(session.pointer_down(p(0.0, 0.0), 0.0));
        for (x, y) in [(4.0, 2.0), (9.0, 7.0), (12.0, 1.0)] {
            live.extend(session.pointer_move(p(x, y), 1.0));
        }
        live.extend(session.pointer_up());
        assert_eq!(replay(&session.strokes()[0]), live);
        assert!(replay(&[]).is_empty());
    }

    #[test]
    fn interrupt_keeps_committed_and_open_data() {
        let mut session = CaptureSession::new();
        session.pointer_down(p(0.0, 0.0), 0.0);
        session.pointer_up();
        session.pointer_down(p(3.0, 3.0), 1.0);
        session.pointer_move(p(4.0, 4.0), 2.0);
        session.interrupt();
        assert_eq!(session.strokes().len(), 2);
        assert!(!session.is_drawing());
        assert_eq!(session.pointer_move(p(5.0, 5.0), 3.0), None);
    }
}
