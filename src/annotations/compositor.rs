use image::{RgbaImage, imageops};

use crate::config::BrushCatalog;
use crate::domain::{Annotation, BrushPreset, LogicalRect, Point, Rect, Shape, ShapeKind};
use crate::error::ComposeResult;
use crate::render::{draw_annotation, try_new_image};

/// Shape currently being dragged, with the brush captured when it started
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub annotation: Annotation,
    pub anchor: Point,
}

#[derive(Debug, Clone)]
pub struct AnnotationCompositor {
    image: RgbaImage,
    catalog: BrushCatalog,
    brush_index: usize,
    tool: ShapeKind,
    preview: Option<Preview>,
}

impl AnnotationCompositor {
    /// Start a session that takes ownership of a freshly captured image
    pub fn new(image: RgbaImage, catalog: BrushCatalog) -> Self {
        Self {
            image,
            catalog,
            brush_index: 0,
            tool: ShapeKind::default(),
            preview: None,
        }
    }

    /// Start a session on a copy of a caller-owned image
    pub fn from_image(image: &RgbaImage, catalog: BrushCatalog) -> Self {
        Self::new(image.clone(), catalog)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn tool(&self) -> ShapeKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ShapeKind) {
        self.tool = tool;
    }

    pub fn catalog(&self) -> &BrushCatalog {
        &self.catalog
    }

    pub fn current_brush(&self) -> &BrushPreset {
        self.catalog.get(self.brush_index)
    }

    /// Select a brush by name; unknown names select the first preset
    ///
    /// A shape already being previewed keeps the brush it started with.
    pub fn select_brush(&mut self, name: &str) -> &BrushPreset {
        self.brush_index = self.catalog.position(name).unwrap_or_else(|| {
            log::warn!("Unknown brush preset {name:?}, using the first one");
            0
        });
        self.current_brush()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Begin a display-only preview of `kind` at `anchor`; pixels are untouched
    pub fn start_preview(&mut self, kind: ShapeKind, brush: &BrushPreset, anchor: Point) {
        self.preview = Some(Preview {
            annotation: Annotation {
                shape: Shape::anchored(kind, anchor),
                brush: brush.clone(),
            },
            anchor,
        });
    }

    /// Re-derive the preview geometry from the drag anchor and pointer position
    pub fn update_preview(&mut self, anchor: Point, current: Point) {
        if let Some(preview) = self.preview.as_mut() {
            preview.anchor = anchor;
            preview.annotation.shape.update(anchor, current);
        }
    }

    pub fn cancel_preview(&mut self) {
        self.preview = None;
    }

    /// Bake the preview into the working image and discard it
    ///
    /// Returns whether the image changed. Crop previews crop the image. On
    /// error the working image is left as it was.
    pub fn commit(&mut self) -> ComposeResult<bool> {
        let Some(preview) = self.preview.take() else {
            return Ok(false);
        };
        match preview.annotation.shape {
            Shape::Crop { bounds } => self.crop(bounds),
            _ => {
                let drawn = draw_annotation(&mut self.image, &preview.annotation)?;
                if !drawn {
                    log::debug!("Nothing to draw for {:?}", preview.annotation.shape);
                }
                Ok(drawn)
            }
        }
    }

    /// Replace the working image with the part inside `rect`
    ///
    /// The rectangle is rounded to whole pixels and intersected with the image;
    /// an empty intersection leaves everything untouched and returns false.
    pub fn crop(&mut self, rect: LogicalRect) -> ComposeResult<bool> {
        let (w, h) = self.image.dimensions();
        let Some(area) = rect
            .to_pixel_rect()
            .intersect(Rect::from_xywh(0, 0, w, h))
        else {
            log::debug!("Crop {rect:?} lies outside the {w}x{h} image");
            return Ok(false);
        };

        let (x, y) = (area.left as u32, area.top as u32);
        let (cw, ch) = (area.width() as u32, area.height() as u32);
        let mut cropped = try_new_image(cw, ch)?;
        imageops::replace(&mut cropped, &*imageops::crop_imm(&self.image, x, y, cw, ch), 0, 0);

        log::debug!("Cropped {w}x{h} image to {area:?}");
        self.image = cropped;
        self.preview = None;
        Ok(true)
    }

    /// Pointer pressed on the drawing surface: start a preview with the
    /// current tool and brush
    pub fn pointer_down(&mut self, p: Point) {
        let brush = self.current_brush().clone();
        self.start_preview(self.tool, &brush, p);
    }

    pub fn pointer_move(&mut self, p: Point) {
        if let Some(anchor) = self.preview.as_ref().map(|pv| pv.anchor) {
            self.update_preview(anchor, p);
        }
    }

    /// Pointer released: finish the geometry and commit
    pub fn pointer_up(&mut self, p: Point) -> ComposeResult<bool> {
        self.pointer_move(p);
        self.commit()
    }
}
