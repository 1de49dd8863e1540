//! Rasterizing committed annotations into an image using tiny-skia

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke,
    Transform,
};

use super::geometry::{arrow, shape};
use crate::domain::{Annotation, LogicalRect, Point, Shape};
use crate::error::{ComposeError, ComposeResult};

/// Allocate a zeroed byte buffer without aborting on exhaustion
fn try_alloc(width: u32, height: u32) -> ComposeResult<Vec<u8>> {
    let err = || ComposeError::Allocation { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(err)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| err())?;
    data.resize(len, 0);
    Ok(data)
}

/// Allocate a transparent image, reporting failure instead of aborting
pub fn try_new_image(width: u32, height: u32) -> ComposeResult<RgbaImage> {
    let data = try_alloc(width, height)?;
    RgbaImage::from_raw(width, height, data).ok_or(ComposeError::Allocation { width, height })
}

/// Copy an image into a premultiplied pixmap, draw on it, and copy changed
/// pixels back
///
/// `img` is only written once drawing succeeded.
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) -> ComposeResult<()> {
    let (w, h) = (img.width(), img.height());
    let size = IntSize::from_wh(w, h)
        .ok_or_else(|| ComposeError::Surface(format!("invalid pixmap size {w}x{h}")))?;

    let mut data = try_alloc(w, h)?;
    for (dst, src) in data.chunks_exact_mut(4).zip(img.pixels()) {
        let p = premultiply(src.0);
        dst.copy_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
    }
    let mut pixmap = Pixmap::from_vec(data, size)
        .ok_or_else(|| ComposeError::Surface(format!("cannot create {w}x{h} pixmap")))?;

    f(&mut pixmap);

    // Untouched pixels keep their exact straight-alpha value
    for (dst, drawn) in img.pixels_mut().zip(pixmap.pixels()) {
        if premultiply(dst.0) != *drawn {
            let c = drawn.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
    }
    Ok(())
}

fn premultiply([r, g, b, a]: [u8; 4]) -> tiny_skia::PremultipliedColorU8 {
    ColorU8::from_rgba(r, g, b, a).premultiply()
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn build_rect_path(bounds: LogicalRect) -> Option<Path> {
    let r = bounds.normalized();
    let mut pb = PathBuilder::new();
    pb.move_to(r.x, r.y);
    pb.line_to(r.right(), r.y);
    pb.line_to(r.right(), r.bottom());
    pb.line_to(r.x, r.bottom());
    pb.close();
    pb.finish()
}

/// Closed polygon made of one or more subpaths
fn build_polygons_path(polygons: &[&[Point]]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for polygon in polygons {
        let Some((first, rest)) = polygon.split_first() else {
            continue;
        };
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
    }
    pb.finish()
}

fn stroke(width: f32, line_join: LineJoin) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join,
        ..Default::default()
    }
}

/// Draw one annotation permanently into `img`
///
/// Returns `Ok(false)` when the shape has nothing to draw (zero-size bounds,
/// coincident arrow endpoints, a non-positive brush, an empty image, or a
/// crop region).
pub fn draw_annotation(img: &mut RgbaImage, annotation: &Annotation) -> ComposeResult<bool> {
    if img.width() == 0 || img.height() == 0 {
        log::debug!("Skipping annotation on empty {:?} image", img.dimensions());
        return Ok(false);
    }
    let thickness = annotation.brush.thickness;
    if !(thickness.is_finite() && thickness > 0.0) {
        log::debug!("Skipping annotation with brush thickness {thickness}");
        return Ok(false);
    }

    let [r, g, b, a] = annotation.brush.color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    match annotation.shape {
        Shape::Circle { bounds } => {
            if bounds.is_empty() {
                return Ok(false);
            }
            let (cx, cy, rx, ry) = shape::ellipse_from_bounds(bounds);
            let Some(path) = build_ellipse_path(cx, cy, rx, ry) else {
                return Ok(false);
            };
            let stroke = stroke(thickness, LineJoin::Round);
            with_pixmap(img, |pixmap| {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            })?;
        }
        Shape::Rectangle { bounds } => {
            if bounds.is_empty() {
                return Ok(false);
            }
            let Some(path) = build_rect_path(bounds) else {
                return Ok(false);
            };
            let stroke = stroke(thickness, LineJoin::Miter);
            with_pixmap(img, |pixmap| {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            })?;
        }
        Shape::Arrow { start, end } => {
            let Some(polys) = arrow::polygons(start, end, thickness) else {
                return Ok(false);
            };
            let Some(path) = build_polygons_path(&[&polys.shaft, &polys.head]) else {
                return Ok(false);
            };
            with_pixmap(img, |pixmap| {
                pixmap.fill_path(
                    &path,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            })?;
        }
        Shape::Crop { .. } => return Ok(false),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BrushPreset, ShapeColor};
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn brush(thickness: f32) -> BrushPreset {
        BrushPreset::new("test", ShapeColor::rgb(255, 0, 0), thickness)
    }

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, WHITE)
    }

    #[test]
    fn test_rectangle_is_stroke_only() {
        let mut img = blank(40, 40);
        let annotation = Annotation {
            shape: Shape::Rectangle {
                bounds: LogicalRect::new(10.0, 10.0, 20.0, 20.0),
            },
            brush: brush(2.0),
        };
        assert!(draw_annotation(&mut img, &annotation).unwrap());
        assert_eq!(*img.get_pixel(10, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(20, 20), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_circle_is_stroke_only() {
        let mut img = blank(50, 50);
        let annotation = Annotation {
            shape: Shape::Circle {
                bounds: LogicalRect::new(5.0, 5.0, 40.0, 40.0),
            },
            brush: brush(4.0),
        };
        assert!(draw_annotation(&mut img, &annotation).unwrap());
        // Leftmost point of the ellipse
        assert_eq!(*img.get_pixel(5, 25), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(25, 25), WHITE);
        assert_eq!(*img.get_pixel(6, 6), WHITE);
    }

    #[test]
    fn test_arrow_fills_shaft_and_head() {
        let mut img = blank(120, 20);
        let annotation = Annotation {
            shape: Shape::Arrow {
                start: Point::new(0.0, 10.0),
                end: Point::new(100.0, 10.0),
            },
            brush: brush(4.0),
        };
        assert!(draw_annotation(&mut img, &annotation).unwrap());
        // Shaft interior
        assert_eq!(*img.get_pixel(40, 9), Rgba([255, 0, 0, 255]));
        // Head is wider than the shaft
        assert_eq!(*img.get_pixel(86, 12), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(40, 14), WHITE);
        // Past the apex
        assert_eq!(*img.get_pixel(105, 10), WHITE);
    }

    #[test]
    fn test_degenerate_shapes_leave_image_untouched() {
        let mut img = blank(10, 10);
        let original = img.clone();
        let shapes = [
            Shape::Circle {
                bounds: LogicalRect::new(3.0, 3.0, 0.0, 5.0),
            },
            Shape::Rectangle {
                bounds: LogicalRect::new(3.0, 3.0, 0.0, 0.0),
            },
            Shape::Arrow {
                start: Point::new(4.0, 4.0),
                end: Point::new(4.0, 4.0),
            },
            Shape::Crop {
                bounds: LogicalRect::new(0.0, 0.0, 5.0, 5.0),
            },
        ];
        for shape in shapes {
            let annotation = Annotation {
                shape,
                brush: brush(3.0),
            };
            assert!(!draw_annotation(&mut img, &annotation).unwrap());
        }
        let zero_brush = Annotation {
            shape: Shape::Rectangle {
                bounds: LogicalRect::new(1.0, 1.0, 5.0, 5.0),
            },
            brush: brush(0.0),
        };
        assert!(!draw_annotation(&mut img, &zero_brush).unwrap());
        assert_eq!(img, original);
    }

    #[test]
    fn test_empty_image_is_not_an_error() {
        for (w, h) in [(0, 10), (10, 0), (0, 0)] {
            let mut img = RgbaImage::new(w, h);
            let annotation = Annotation {
                shape: Shape::Rectangle {
                    bounds: LogicalRect::new(1.0, 1.0, 4.0, 4.0),
                },
                brush: brush(2.0),
            };
            assert!(!draw_annotation(&mut img, &annotation).unwrap());
            assert_eq!(img.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_translucent_pixels_outside_stroke_survive() {
        let translucent = Rgba([200, 100, 50, 77]);
        let mut img = RgbaImage::from_pixel(30, 30, translucent);
        let annotation = Annotation {
            shape: Shape::Rectangle {
                bounds: LogicalRect::new(10.0, 10.0, 10.0, 10.0),
            },
            brush: brush(2.0),
        };
        draw_annotation(&mut img, &annotation).unwrap();
        assert_eq!(*img.get_pixel(0, 0), translucent);
        assert_eq!(*img.get_pixel(15, 15), translucent);
    }

    #[test]
    fn test_try_new_image_rejects_impossible_sizes() {
        assert!(matches!(
            try_new_image(u32::MAX, u32::MAX),
            Err(ComposeError::Allocation { .. })
        ));
        let img = try_new_image(3, 2).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }
}
