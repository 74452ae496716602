//! Curve flattening and area-bounded polyline simplification
//!
//! A path is flattened into a closed polyline by sampling each curve
//! segment at a density set by the `refine` tolerance, then simplified by
//! dropping runs of nearly collinear points whose accumulated drift area
//! stays below the same tolerance.

use serde::{Deserialize, Serialize};

use super::point::{Point, orient2d};
use crate::error::GeometryError;

/// Minimum and maximum recursion depth for curve length estimation
const LENGTH_MIN_DEPTH: u32 = 5;
const LENGTH_MAX_DEPTH: u32 = 16;
const LENGTH_TOLERANCE: f64 = 1e-9;

/// A parametrized path piece evaluated over t in [0, 1]
pub trait PathSegment {
    fn start(&self) -> Point;
    fn end(&self) -> Point;
    fn length(&self) -> f64;
    fn point(&self, t: f64) -> Point;
    /// Straight segments are emitted as their start point only
    fn is_line(&self) -> bool;
}

/// One segment of an authored path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Circular arc; angles in radians, positive sweep is CCW
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
}

impl Segment {
    pub fn line(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Segment::Line {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl PathSegment for Segment {
    fn start(&self) -> Point {
        match *self {
            Segment::Line { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Cubic { start, .. } => start,
            Segment::Arc { .. } => self.point(0.0),
        }
    }

    fn end(&self) -> Point {
        match *self {
            Segment::Line { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Cubic { end, .. } => end,
            Segment::Arc { .. } => self.point(1.0),
        }
    }

    fn length(&self) -> f64 {
        match *self {
            Segment::Line { start, end } => start.distance(end),
            Segment::Arc { radius, sweep, .. } => (radius * sweep).abs(),
            _ => {
                let (p0, p1) = (self.point(0.0), self.point(1.0));
                curve_length(self, 0.0, 1.0, p0, p1, 0)
            }
        }
    }

    fn point(&self, t: f64) -> Point {
        match *self {
            Segment::Line { start, end } => start.lerp(end, t),
            Segment::Quadratic {
                start,
                control,
                end,
            } => {
                let mt = 1.0 - t;
                start * (mt * mt) + control * (2.0 * mt * t) + end * (t * t)
            }
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let mt = 1.0 - t;
                start * (mt * mt * mt)
                    + control1 * (3.0 * mt * mt * t)
                    + control2 * (3.0 * mt * t * t)
                    + end * (t * t * t)
            }
            Segment::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let a = start_angle + sweep * t;
                Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
            }
        }
    }

    fn is_line(&self) -> bool {
        matches!(self, Segment::Line { .. })
    }
}

/// Arc length by recursive chord subdivision
fn curve_length<S: PathSegment + ?Sized>(
    segment: &S,
    t0: f64,
    t1: f64,
    p0: Point,
    p1: Point,
    depth: u32,
) -> f64 {
    let tm = (t0 + t1) / 2.0;
    let pm = segment.point(tm);
    let chord = p0.distance(p1);
    let halves = p0.distance(pm) + pm.distance(p1);

    if depth >= LENGTH_MAX_DEPTH
        || (depth >= LENGTH_MIN_DEPTH && (halves - chord) <= LENGTH_TOLERANCE * halves)
    {
        return halves;
    }

    curve_length(segment, t0, tm, p0, pm, depth + 1)
        + curve_length(segment, tm, t1, pm, p1, depth + 1)
}

fn push_distinct(points: &mut Vec<Point>, p: Point) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}

/// Most samples a single curve segment may produce
pub const MAX_CURVE_STEPS: usize = 100_000;

/// Flatten a path into a closed polyline
///
/// Lines contribute their start point, curves are sampled with a step count
/// of `length / refine` (at least one), and the final endpoint is appended.
/// Points that repeat the first point at the end of the run are removed.
/// A curve whose length is not finite, or that would need more than
/// `MAX_CURVE_STEPS` samples, is `InvalidGeometry`.
pub fn flatten_path<S: PathSegment>(segments: &[S], refine: f64) -> Result<Vec<Point>, GeometryError> {
    if !(refine.is_finite() && refine > 0.0) {
        return Err(GeometryError::InvalidGeometry(format!(
            "refinement tolerance must be positive, got {}",
            refine
        )));
    }

    let mut points = Vec::new();

    for segment in segments {
        if segment.is_line() {
            push_distinct(&mut points, segment.start());
            continue;
        }

        let length = segment.length();
        if !length.is_finite() {
            return Err(GeometryError::InvalidGeometry(format!(
                "curve length is not finite ({})",
                length
            )));
        }
        let steps = (length / refine).round();
        if steps > MAX_CURVE_STEPS as f64 {
            return Err(GeometryError::InvalidGeometry(format!(
                "curve of length {} needs {} samples at refinement {}, limit is {}",
                length, steps, refine, MAX_CURVE_STEPS
            )));
        }

        let steps = (steps as usize).max(1);
        let step = 1.0 / steps as f64;
        for k in 0..steps {
            push_distinct(&mut points, segment.point(k as f64 * step));
        }
    }

    if let Some(last) = segments.last() {
        push_distinct(&mut points, last.end());
    }

    strip_closing_points(&mut points);
    Ok(points)
}

/// Remove trailing points that repeat the first point
pub fn strip_closing_points(points: &mut Vec<Point>) {
    while points.len() > 1 && points.last() == points.first() {
        points.pop();
    }
}

/// Drop nearly collinear points while the dropped run stays within `refine`
///
/// A run of points after the last kept anchor is dropped only while both
/// hold for the chord from the anchor to the next point:
/// - the fan area swept by the run stays below `refine`
/// - every dropped point spans less than `refine` area with that chord
///
/// The first and last points are always kept. This is an incremental,
/// order-dependent heuristic rather than Douglas-Peucker.
pub fn simplify_polygon(points: &[Point], refine: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(points.len());
    let mut anchor = points[0];
    let mut drift = 0.0;
    let mut skipped: Vec<Point> = Vec::new();
    kept.push(anchor);

    for window in points.windows(3) {
        let (candidate, next) = (window[1], window[2]);
        let area = orient2d(anchor, candidate, next).abs() / 2.0;
        let deviation = skipped
            .iter()
            .chain(std::iter::once(&candidate))
            .map(|&s| orient2d(anchor, s, next).abs() / 2.0)
            .fold(0.0, f64::max);

        if drift + area < refine && deviation < refine {
            drift += area;
            skipped.push(candidate);
        } else {
            kept.push(candidate);
            anchor = candidate;
            drift = 0.0;
            skipped.clear();
        }
    }

    if let Some(&last) = points.last() {
        kept.push(last);
    }
    kept
}

/// Flatten and simplify a path, rejecting results that cannot form a polygon
pub fn flatten_and_simplify<S: PathSegment>(
    segments: &[S],
    refine: f64,
) -> Result<Vec<Point>, GeometryError> {
    let flattened = flatten_path(segments, refine)?;
    let simplified = simplify_polygon(&flattened, refine);

    if simplified.len() < 3 {
        return Err(GeometryError::DegenerateInput {
            points: simplified.len(),
        });
    }
    Ok(simplified)
}
