//! Region capture flow
//!
//! Glues the selection overlay, the coordinate mapper and the platform
//! collaborators together:
//! - [`DisplayProvider`] reports the monitor layout
//! - [`ScreenCapturer`] copies device pixels off the screen
//! - an [`ImageSink`] stores the finished image

pub mod mapper;

use std::path::PathBuf;

use anyhow::Context;
use image::RgbaImage;

use crate::annotations::AnnotationCompositor;
use crate::config::AppConfig;
use crate::domain::{LogicalRect, MonitorDescriptor, MonitorLayout, Rect};
use crate::export::ImageSink;
use crate::render::apply_border;
use crate::session::{PendingSelection, SelectionController};

pub use mapper::to_device_pixels;

/// Source of the current monitor layout
pub trait DisplayProvider {
    fn list_monitors(&self) -> anyhow::Result<Vec<MonitorDescriptor>>;
}

/// Copies a device pixel rectangle off the screen
pub trait ScreenCapturer {
    fn copy_screen_region(&self, rect: Rect) -> anyhow::Result<RgbaImage>;
}

/// Everything the host UI needs to run one selection overlay
#[derive(Debug)]
pub struct CaptureRequest {
    /// Monitor snapshot; the overlay must cover `layout.bounds()`
    pub layout: MonitorLayout,
    /// Receives the overlay's pointer and key events
    pub controller: SelectionController,
    pub pending: PendingSelection,
}

/// What happened to a captured image
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Framed and written to disk
    Saved(PathBuf),
    /// Handed to the annotation editor; save with [`save_edited`]
    Edit(AnnotationCompositor),
}

pub struct CaptureService<D, C> {
    display: D,
    capturer: C,
}

impl<D: DisplayProvider, C: ScreenCapturer> CaptureService<D, C> {
    pub fn new(display: D, capturer: C) -> Self {
        Self { display, capturer }
    }

    /// Snapshot the monitors and set up a selection overlay
    pub fn prepare(&self) -> anyhow::Result<CaptureRequest> {
        let monitors = self
            .display
            .list_monitors()
            .context("Failed to list monitors")?;
        for m in &monitors {
            log::debug!(
                "Monitor {}: {:?} scale {} primary {}",
                m.name,
                m.bounds(),
                m.scale_factor,
                m.is_primary
            );
        }
        let layout = MonitorLayout::snapshot(monitors).context("No monitors connected")?;
        log::debug!("Overlay bounds: {:?}", layout.bounds());

        let (controller, pending) = SelectionController::new();
        Ok(CaptureRequest {
            layout,
            controller,
            pending,
        })
    }

    /// Wait for the overlay and capture the chosen region
    ///
    /// `Ok(None)` means the user cancelled or selected nothing.
    pub async fn capture(
        &self,
        layout: &MonitorLayout,
        pending: PendingSelection,
    ) -> anyhow::Result<Option<RgbaImage>> {
        let Some(selection) = pending.wait().await else {
            log::info!("Region selection cancelled");
            return Ok(None);
        };
        self.grab(layout, selection)
    }

    /// Capture an already chosen overlay rectangle
    pub fn grab(
        &self,
        layout: &MonitorLayout,
        selection: LogicalRect,
    ) -> anyhow::Result<Option<RgbaImage>> {
        let device = to_device_pixels(selection, layout.overlay_origin(), layout.monitors());
        if device.dimensions().is_none() {
            log::debug!("Skipping capture of empty region {device:?}");
            return Ok(None);
        }
        let image = self
            .capturer
            .copy_screen_region(device)
            .with_context(|| format!("Failed to capture {device:?}"))?;
        log::info!(
            "Captured {}x{} pixels at ({}, {})",
            image.width(),
            image.height(),
            device.left,
            device.top
        );
        Ok(Some(image))
    }
}

/// Either open the capture in the editor or frame and save it right away
pub fn finish(
    image: RgbaImage,
    config: &AppConfig,
    sink: &dyn ImageSink,
) -> anyhow::Result<CaptureOutcome> {
    if config.open_in_editor {
        return Ok(CaptureOutcome::Edit(AnnotationCompositor::new(
            image,
            config.brush_catalog(),
        )));
    }
    save_framed(&image, config, sink).map(CaptureOutcome::Saved)
}

/// Frame and store the result of an editing session, ending it
pub fn save_edited(
    compositor: AnnotationCompositor,
    config: &AppConfig,
    sink: &dyn ImageSink,
) -> anyhow::Result<PathBuf> {
    save_framed(&compositor.into_image(), config, sink)
}

fn save_framed(image: &RgbaImage, config: &AppConfig, sink: &dyn ImageSink) -> anyhow::Result<PathBuf> {
    let framed = apply_border(image, &config.border_spec()).context("Failed to apply border")?;
    sink.persist(&framed, &config.save_target())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::BorderConfig;
    use crate::domain::Point;
    use crate::export::SaveTarget;
    use crate::session::{SelectionEvent, SelectionKey};
    use image::Rgba;

    struct FakeDisplay(Vec<MonitorDescriptor>);

    impl DisplayProvider for FakeDisplay {
        fn list_monitors(&self) -> anyhow::Result<Vec<MonitorDescriptor>> {
            Ok(self.0.clone())
        }
    }

    /// Paints every pixel with its own device coordinates
    #[derive(Default)]
    struct FakeCapturer {
        requests: RefCell<Vec<Rect>>,
    }

    impl ScreenCapturer for FakeCapturer {
        fn copy_screen_region(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
            self.requests.borrow_mut().push(rect);
            Ok(RgbaImage::from_fn(
                rect.width() as u32,
                rect.height() as u32,
                |x, y| {
                    let dx = rect.left + x as i32;
                    let dy = rect.top + y as i32;
                    Rgba([dx as u8, dy as u8, 0, 255])
                },
            ))
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: RefCell<Vec<(RgbaImage, SaveTarget)>>,
    }

    impl ImageSink for MemorySink {
        fn persist(&self, image: &RgbaImage, target: &SaveTarget) -> anyhow::Result<PathBuf> {
            self.saved.borrow_mut().push((image.clone(), target.clone()));
            Ok(target.directory.join("memory.png"))
        }
    }

    fn service() -> CaptureService<FakeDisplay, FakeCapturer> {
        CaptureService::new(
            FakeDisplay(vec![
                MonitorDescriptor {
                    name: "left".to_string(),
                    origin: (-100, 0),
                    size: (100, 100),
                    scale_factor: 1.0,
                    is_primary: false,
                },
                MonitorDescriptor {
                    name: "main".to_string(),
                    origin: (0, 0),
                    size: (200, 100),
                    scale_factor: 1.0,
                    is_primary: true,
                },
            ]),
            FakeCapturer::default(),
        )
    }

    #[tokio::test]
    async fn test_capture_maps_overlay_to_device_pixels() {
        let service = service();
        let CaptureRequest {
            layout,
            mut controller,
            pending,
        } = service.prepare().unwrap();
        assert_eq!(layout.bounds(), Rect::new(-100, 0, 200, 100));

        controller.handle(SelectionEvent::PointerDown(Point::new(130.0, 60.0)));
        controller.handle(SelectionEvent::PointerMove(Point::new(90.0, 20.0)));
        controller.handle(SelectionEvent::Key(SelectionKey::Enter));

        let image = service.capture(&layout, pending).await.unwrap().unwrap();
        assert_eq!(image.dimensions(), (40, 40));
        assert_eq!(
            service.capturer.requests.borrow().as_slice(),
            &[Rect::new(-10, 20, 30, 60)]
        );
        assert_eq!(*image.get_pixel(0, 0), Rgba([(-10i32) as u8, 20, 0, 255]));
    }

    #[tokio::test]
    async fn test_cancelled_selection_captures_nothing() {
        let service = service();
        let request = service.prepare().unwrap();
        let mut controller = request.controller;
        controller.handle(SelectionEvent::Key(SelectionKey::Escape));
        let result = service.capture(&request.layout, request.pending).await.unwrap();
        assert!(result.is_none());
        assert!(service.capturer.requests.borrow().is_empty());
    }

    #[test]
    fn test_zero_area_selection_is_skipped() {
        let service = service();
        let layout = service.prepare().unwrap().layout;
        let result = service
            .grab(&layout, LogicalRect::new(10.0, 10.0, 0.0, 25.0))
            .unwrap();
        assert!(result.is_none());
        assert!(service.capturer.requests.borrow().is_empty());
    }

    #[test]
    fn test_prepare_without_monitors_fails() {
        let service = CaptureService::new(FakeDisplay(Vec::new()), FakeCapturer::default());
        assert!(service.prepare().is_err());
    }

    #[test]
    fn test_finish_saves_framed_image_directly() {
        let config = AppConfig {
            open_in_editor: false,
            border: BorderConfig {
                enabled: true,
                thickness: 3,
                ..BorderConfig::default()
            },
            ..AppConfig::default()
        };
        let sink = MemorySink::default();
        let outcome = finish(RgbaImage::new(4, 5), &config, &sink).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Saved(_)));

        let saved = sink.saved.borrow();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0.dimensions(), (10, 11));
        assert_eq!(saved[0].1, config.save_target());
    }

    #[test]
    fn test_finish_opens_editor_then_saves_edits() {
        let config = AppConfig {
            open_in_editor: true,
            ..AppConfig::default()
        };
        let sink = MemorySink::default();
        let outcome = finish(RgbaImage::new(30, 30), &config, &sink).unwrap();
        let CaptureOutcome::Edit(mut editor) = outcome else {
            panic!("expected editor outcome");
        };
        assert!(sink.saved.borrow().is_empty());

        editor.set_tool(crate::domain::ShapeKind::Crop);
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_up(Point::new(10.0, 20.0)).unwrap();
        save_edited(editor, &config, &sink).unwrap();
        // Border is disabled by default
        assert_eq!(sink.saved.borrow()[0].0.dimensions(), (10, 20));
    }
}
