//! Annotation shapes drawn over a working image
//!
//! Coordinates are image pixel coordinates of the editing surface.

use super::brush::BrushPreset;
use super::geometry::{LogicalRect, Point};

/// Which shape the next drag produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    #[default]
    Arrow,
    Crop,
}

/// Shape geometry with kind-specific payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Ellipse inscribed in `bounds`
    Circle { bounds: LogicalRect },
    Rectangle { bounds: LogicalRect },
    Arrow { start: Point, end: Point },
    /// Region to keep when committed
    Crop { bounds: LogicalRect },
}

impl Shape {
    /// Zero-size shape of `kind` anchored at `anchor`
    pub fn anchored(kind: ShapeKind, anchor: Point) -> Self {
        let bounds = LogicalRect::new(anchor.x, anchor.y, 0.0, 0.0);
        match kind {
            ShapeKind::Circle => Shape::Circle { bounds },
            ShapeKind::Rectangle => Shape::Rectangle { bounds },
            ShapeKind::Arrow => Shape::Arrow {
                start: anchor,
                end: anchor,
            },
            ShapeKind::Crop => Shape::Crop { bounds },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Arrow { .. } => ShapeKind::Arrow,
            Shape::Crop { .. } => ShapeKind::Crop,
        }
    }

    /// Re-derive the geometry from the drag anchor and the current pointer
    pub fn update(&mut self, anchor: Point, current: Point) {
        match self {
            Shape::Circle { bounds } | Shape::Rectangle { bounds } | Shape::Crop { bounds } => {
                *bounds = LogicalRect::from_points(anchor, current);
            }
            Shape::Arrow { start, end } => {
                *start = anchor;
                *end = current;
            }
        }
    }

    /// Normalized bounding box (for arrows, the box spanned by both endpoints)
    pub fn bounds(&self) -> LogicalRect {
        match *self {
            Shape::Circle { bounds } | Shape::Rectangle { bounds } | Shape::Crop { bounds } => {
                bounds.normalized()
            }
            Shape::Arrow { start, end } => LogicalRect::from_points(start, end),
        }
    }
}

/// A shape together with the brush that was active when it was started
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub shape: Shape,
    pub brush: BrushPreset,
}
