use thiserror::Error;

use super::point::Point;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("unknown transform operation '{0}'")]
    UnknownOperation(String),
    #[error("transform '{op}' takes {expected} arguments, got {actual}")]
    ArgumentCount {
        op: String,
        expected: &'static str,
        actual: usize,
    },
    #[error("invalid number '{0}' in transform")]
    InvalidNumber(String),
    #[error("malformed transform '{0}'")]
    Malformed(String),
}

/// 2D affine transform in SVG matrix order
///
/// ```text
/// [a c e]
/// [b d f]
/// [0 0 1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m: [f64; 6],
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Rotation by `degrees`, CCW in a y-up frame
    pub fn rotate(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self {
            m: [c, s, -s, c, 0.0, 0.0],
        }
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self {
            m: [1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0],
        }
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self {
            m: [1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// `self * other`: applies `other` first, then `self`
    pub fn multiply(&self, other: &Affine) -> Affine {
        let a = &self.m;
        let b = &other.m;
        Affine {
            m: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        let m = &self.m;
        Point::new(
            m[0] * p.x + m[2] * p.y + m[4],
            m[1] * p.x + m[3] * p.y + m[5],
        )
    }

    pub fn apply_points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.apply(p)).collect()
    }

    /// Uniform scale factor, used for radii; exact for similarity transforms
    pub fn scale_factor(&self) -> f64 {
        let m = &self.m;
        (m[0] * m[3] - m[1] * m[2]).abs().sqrt()
    }

    /// Parse an SVG transform list such as `translate(10,20) rotate(45)`
    ///
    /// Operations compose left to right, so the rightmost one is applied
    /// to points first.
    pub fn parse(input: &str) -> Result<Affine, TransformError> {
        let mut result = Affine::IDENTITY;
        let mut rest = input.trim();

        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| TransformError::Malformed(input.to_string()))?;
            let close = rest
                .find(')')
                .ok_or_else(|| TransformError::Malformed(input.to_string()))?;
            if close < open {
                return Err(TransformError::Malformed(input.to_string()));
            }

            let op = rest[..open].trim().trim_start_matches(',').trim();
            let args = parse_args(&rest[open + 1..close])?;
            result = result.multiply(&operation(op, &args)?);

            rest = rest[close + 1..].trim_start_matches([' ', ',', '\t', '\n', '\r']);
        }

        Ok(result)
    }
}

fn parse_args(raw: &str) -> Result<Vec<f64>, TransformError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| TransformError::InvalidNumber(s.to_string()))
        })
        .collect()
}

fn operation(op: &str, args: &[f64]) -> Result<Affine, TransformError> {
    let count_error = |expected: &'static str| TransformError::ArgumentCount {
        op: op.to_string(),
        expected,
        actual: args.len(),
    };

    match op {
        "matrix" => match *args {
            [a, b, c, d, e, f] => Ok(Affine {
                m: [a, b, c, d, e, f],
            }),
            _ => Err(count_error("6")),
        },
        "translate" => match *args {
            [x] => Ok(Affine::translate(x, 0.0)),
            [x, y] => Ok(Affine::translate(x, y)),
            _ => Err(count_error("1 or 2")),
        },
        "scale" => match *args {
            [s] => Ok(Affine::scale(s, s)),
            [sx, sy] => Ok(Affine::scale(sx, sy)),
            _ => Err(count_error("1 or 2")),
        },
        "rotate" => match *args {
            [deg] => Ok(Affine::rotate(deg)),
            [deg, cx, cy] => Ok(Affine::translate(cx, cy)
                .multiply(&Affine::rotate(deg))
                .multiply(&Affine::translate(-cx, -cy))),
            _ => Err(count_error("1 or 3")),
        },
        "skewX" => match *args {
            [deg] => Ok(Affine::skew_x(deg)),
            _ => Err(count_error("1")),
        },
        "skewY" => match *args {
            [deg] => Ok(Affine::skew_y(deg)),
            _ => Err(count_error("1")),
        },
        other => Err(TransformError::UnknownOperation(other.to_string())),
    }
}
