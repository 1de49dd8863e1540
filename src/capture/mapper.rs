//! Overlay logical coordinates to absolute device pixels
//!
//! The overlay covers the union of all monitors and is hosted by a single
//! monitor, whose DPI scale defines the overlay's logical unit. A logical
//! coordinate `l` maps to `origin + round(l * scale)`; rounding is half away
//! from zero. No clamping to monitor bounds happens here.

use crate::domain::{LogicalRect, MonitorDescriptor, Rect};

/// Scale of the monitor hosting the overlay
///
/// That is the monitor containing the overlay origin, else the primary
/// monitor, else the first one; 1.0 when the list is empty.
pub fn overlay_scale(overlay_origin: (i32, i32), monitors: &[MonitorDescriptor]) -> f32 {
    let (x, y) = overlay_origin;
    monitors
        .iter()
        .find(|m| m.bounds().contains_point(x, y))
        .or_else(|| monitors.iter().find(|m| m.is_primary))
        .or_else(|| monitors.first())
        .map_or(1.0, MonitorDescriptor::effective_scale)
}

/// Map a selection rectangle in overlay space to a device pixel rectangle
///
/// Negative extents are normalized before mapping, so the result always has
/// `left <= right` and `top <= bottom`.
pub fn to_device_pixels(
    selection: LogicalRect,
    overlay_origin: (i32, i32),
    monitors: &[MonitorDescriptor],
) -> Rect {
    let scale = overlay_scale(overlay_origin, monitors);
    let r = selection.normalized();
    let (ox, oy) = overlay_origin;
    let map = |origin: i32, v: f32| origin.saturating_add((v * scale).round() as i32);

    let device = Rect::new(
        map(ox, r.x),
        map(oy, r.y),
        map(ox, r.right()),
        map(oy, r.bottom()),
    );
    log::debug!("Mapped {selection:?} at scale {scale} from origin {overlay_origin:?} to {device:?}");
    device
}
