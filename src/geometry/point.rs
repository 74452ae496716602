use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::error::GeometryError;

/// A 2D coordinate or vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1)
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

pub fn dot(a: Point, b: Point) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Z component of the 3D cross product of two planar vectors
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of triangle (a, b, c); positive when CCW
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// Whether a -> b -> c turns left. Collinear triples count as left turns.
pub fn orientation(a: Point, b: Point, c: Point) -> bool {
    orient2d(a, b, c) >= 0.0
}

/// Interior angle at `b` between the rays towards `a` and `c`, in radians
///
/// Fails when either ray has zero length.
pub fn angle(a: Point, b: Point, c: Point) -> Result<f64, GeometryError> {
    let ba = a - b;
    let bc = c - b;
    let norm = ba.length() * bc.length();
    if norm == 0.0 || !norm.is_finite() {
        return Err(GeometryError::InvalidGeometry(format!(
            "angle at ({}, {}) has a zero-length ray",
            b.x, b.y
        )));
    }
    // Rounding can push the cosine slightly outside [-1, 1]
    Ok((dot(ba, bc) / norm).clamp(-1.0, 1.0).acos())
}

/// Barycentric point-in-triangle test, boundary inclusive
///
/// Returns `None` for a degenerate (collinear) triangle, where the
/// barycentric denominator vanishes.
pub fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> Option<bool> {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = dot(v0, v0);
    let dot01 = dot(v0, v1);
    let dot02 = dot(v0, v2);
    let dot11 = dot(v1, v1);
    let dot12 = dot(v1, v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom == 0.0 {
        return None;
    }

    let inv_denom = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    Some(u >= 0.0 && v >= 0.0 && u + v <= 1.0)
}

/// Whether `p` lies on the closed segment a-b
pub fn on_segment(p: Point, a: Point, b: Point) -> bool {
    orient2d(a, b, p) == 0.0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Signed area of a closed polygon (shoelace); positive when CCW
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let sum: f64 = (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum();
    sum / 2.0
}

pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    orient2d(a, b, c).abs() / 2.0
}
