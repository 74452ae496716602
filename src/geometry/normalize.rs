use super::point::Point;

/// Maps document coordinates (y down, pixels) into level space
///
/// The canvas centre becomes the origin, y points up and both axes are
/// divided by the canvas width, so x spans [-0.5, 0.5].
#[derive(Debug, Clone)]
pub struct Normalizer {
    width: f64,
    height: f64,
}

impl Normalizer {
    /// Create a normalizer for a canvas of the given size
    pub fn from_canvas(width: f64, height: f64) -> Self {
        Self {
            width: if width > 0.0 { width } else { 1.0 },
            height,
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.width / 2.0) / self.width,
            -(p.y - self.height / 2.0) / self.width,
        )
    }

    pub fn points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.point(p)).collect()
    }

    pub fn length(&self, length: f64) -> f64 {
        length / self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canvas() {
        let n = Normalizer::from_canvas(800.0, 600.0);

        assert_eq!(n.point(Point::new(400.0, 300.0)), Point::new(0.0, 0.0));
        // Top-left corner: x = -0.5, y up by half the height over the width
        assert_eq!(n.point(Point::new(0.0, 0.0)), Point::new(-0.5, 0.375));
        assert_eq!(n.point(Point::new(800.0, 600.0)), Point::new(0.5, -0.375));
        assert_eq!(n.length(80.0), 0.1);
    }

    #[test]
    fn test_zero_width_falls_back_to_unit() {
        let n = Normalizer::from_canvas(0.0, 10.0);
        assert_eq!(n.length(2.0), 2.0);
        assert_eq!(n.point(Point::new(0.5, 5.0)), Point::new(0.0, 0.0));
    }
}
