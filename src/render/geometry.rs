//! Pure geometry and color math shared by the rasterizer and the border
//! compositor

/// Arrow construction: a filled shaft rectangle plus a filled triangular head
pub mod arrow {
    use crate::domain::Point;

    /// Shortest head the arrow will ever get, in pixels
    pub const MIN_HEAD_LENGTH: f32 = 10.0;

    pub fn head_length(thickness: f32) -> f32 {
        MIN_HEAD_LENGTH.max(thickness * 4.0)
    }

    pub fn head_width(thickness: f32) -> f32 {
        (thickness * 2.0).max(thickness * 3.0)
    }

    /// The two polygons making up an arrow
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ArrowPolygons {
        /// start+n, start-n, shaft_end-n, shaft_end+n where n is the half-width normal
        pub shaft: [Point; 4],
        /// Apex at the true end point, then the two base corners
        pub head: [Point; 3],
    }

    /// Build arrow polygons from `start` to `end`
    ///
    /// Returns `None` when both endpoints coincide, as there is no direction.
    pub fn polygons(start: Point, end: Point, thickness: f32) -> Option<ArrowPolygons> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON || !length.is_finite() {
            return None;
        }

        // Unit direction vector (pointing from start to end)
        let ux = dx / length;
        let uy = dy / length;
        // Unit normal
        let nx = -uy;
        let ny = ux;

        let head_length = head_length(thickness);
        let half_shaft = thickness / 2.0;
        let half_head = head_width(thickness) / 2.0;

        let shaft_end = Point::new(end.x - ux * head_length, end.y - uy * head_length);
        let offset = |p: Point, half: f32| Point::new(p.x + nx * half, p.y + ny * half);

        Some(ArrowPolygons {
            shaft: [
                offset(start, half_shaft),
                offset(start, -half_shaft),
                offset(shaft_end, -half_shaft),
                offset(shaft_end, half_shaft),
            ],
            head: [
                end,
                offset(shaft_end, -half_head),
                offset(shaft_end, half_head),
            ],
        })
    }
}

/// Shape (rectangle/circle) geometry
pub mod shape {
    use crate::domain::LogicalRect;

    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;

    /// Ellipse center and radii from a bounding box
    #[inline]
    pub fn ellipse_from_bounds(bounds: LogicalRect) -> (f32, f32, f32, f32) {
        let b = bounds.normalized();
        let cx = b.x + b.width * 0.5;
        let cy = b.y + b.height * 0.5;
        let rx = (b.width * 0.5).max(1.0);
        let ry = (b.height * 0.5).max(1.0);
        (cx, cy, rx, ry)
    }
}

/// Gradient color interpolation
pub mod gradient {
    use crate::domain::ShapeColor;

    /// Linear blend per channel (alpha included), truncating toward zero
    pub fn blend(from: ShapeColor, to: ShapeColor, ratio: f32) -> ShapeColor {
        let ratio = ratio.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio) as u8;
        ShapeColor {
            r: mix(from.r, to.r),
            g: mix(from.g, to.g),
            b: mix(from.b, to.b),
            a: mix(from.a, to.a),
        }
    }

    /// Three-stop gradient: start at 0.0, average of both at 0.5, end at 1.0
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ThreeStop {
        pub start: ShapeColor,
        pub mid: ShapeColor,
        pub end: ShapeColor,
    }

    impl ThreeStop {
        pub fn new(start: ShapeColor, end: ShapeColor) -> Self {
            Self {
                start,
                mid: blend(start, end, 0.5),
                end,
            }
        }

        pub fn at(&self, ratio: f32) -> ShapeColor {
            let ratio = ratio.clamp(0.0, 1.0);
            if ratio <= 0.5 {
                blend(self.start, self.mid, ratio * 2.0)
            } else {
                blend(self.mid, self.end, (ratio - 0.5) * 2.0)
            }
        }
    }

    /// Position of pixel `(x, y)` along the top-left to bottom-right diagonal of
    /// a `width` x `height` area: 0.0 at the first pixel, 1.0 at the last
    pub fn diagonal_ratio(x: u32, y: u32, width: u32, height: u32) -> f32 {
        let span = width.saturating_sub(1) as f32 + height.saturating_sub(1) as f32;
        if span == 0.0 {
            return 0.0;
        }
        (x as f32 + y as f32) / span
    }
}

#[cfg(test)]
mod tests {
    use super::arrow;
    use super::gradient::{self, ThreeStop};
    use super::shape;
    use crate::domain::ShapeColor;
    use crate::domain::{LogicalRect, Point};

    #[test]
    fn test_horizontal_arrow_geometry() {
        let polys = arrow::polygons(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 4.0).unwrap();
        assert_eq!(
            polys.shaft,
            [
                Point::new(0.0, 2.0),
                Point::new(0.0, -2.0),
                Point::new(84.0, -2.0),
                Point::new(84.0, 2.0),
            ]
        );
        assert_eq!(polys.head[0], Point::new(100.0, 0.0));
        assert_eq!(polys.head[1], Point::new(84.0, -6.0));
        assert_eq!(polys.head[2], Point::new(84.0, 6.0));
    }

    #[test]
    fn test_shaft_edges_parallel_and_thickness_apart() {
        let start = Point::new(10.0, 20.0);
        let end = Point::new(130.0, -70.0);
        let thickness = 6.0;
        let polys = arrow::polygons(start, end, thickness).unwrap();
        let [p1, p2, p3, p4] = polys.shaft;

        let (dx, dy) = (end.x - start.x, end.y - start.y);
        let dir_len = (dx * dx + dy * dy).sqrt();
        // Sine of the angle between edge a->b and the direction vector
        let sin = |a: Point, b: Point| {
            let (ex, ey) = (b.x - a.x, b.y - a.y);
            (ex * dy - ey * dx) / ((ex * ex + ey * ey).sqrt() * dir_len)
        };
        // Long edges p2->p3 and p4->p1 run along the direction vector
        assert!(sin(p2, p3).abs() < 1e-5);
        assert!(sin(p4, p1).abs() < 1e-5);

        let width = ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt();
        assert!((width - thickness).abs() < 1e-4);
        assert_eq!(polys.head[0], end);
    }

    #[test]
    fn test_head_sizes_scale_with_thickness() {
        assert_eq!(arrow::head_length(1.0), 10.0);
        assert_eq!(arrow::head_length(4.0), 16.0);
        assert_eq!(arrow::head_width(4.0), 12.0);
    }

    #[test]
    fn test_coincident_endpoints_have_no_arrow() {
        let p = Point::new(5.0, 5.0);
        assert!(arrow::polygons(p, p, 4.0).is_none());
    }

    #[test]
    fn test_ellipse_from_bounds() {
        let (cx, cy, rx, ry) = shape::ellipse_from_bounds(LogicalRect::new(10.0, 10.0, -10.0, 30.0));
        assert_eq!((cx, cy, rx, ry), (5.0, 25.0, 5.0, 15.0));
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let start = ShapeColor::argb(0x10, 0xFF, 0x00, 0x33);
        let end = ShapeColor::argb(0xFF, 0x00, 0xFF, 0x34);
        let stops = ThreeStop::new(start, end);
        assert_eq!(stops.at(0.0), start);
        assert_eq!(stops.at(1.0), end);

        let avg = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        assert_eq!(
            stops.at(0.5),
            ShapeColor::argb(avg(0x10, 0xFF), avg(0xFF, 0x00), avg(0x00, 0xFF), avg(0x33, 0x34))
        );
        assert_eq!(gradient::blend(start, end, 0.5), stops.mid);
    }

    #[test]
    fn test_diagonal_ratio_corners() {
        assert_eq!(gradient::diagonal_ratio(0, 0, 10, 20), 0.0);
        assert_eq!(gradient::diagonal_ratio(9, 19, 10, 20), 1.0);
        assert_eq!(gradient::diagonal_ratio(0, 0, 1, 1), 0.0);
    }
}
