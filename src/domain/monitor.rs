//! Monitor descriptors and the virtual desktop they form

use super::geometry::Rect;

/// One physical display as reported by the display collaborator
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorDescriptor {
    pub name: String,
    /// Top-left corner in desktop device pixels
    pub origin: (i32, i32),
    /// Size in device pixels
    pub size: (u32, u32),
    /// DPI scale (1.0 = 96 DPI)
    pub scale_factor: f32,
    pub is_primary: bool,
}

impl MonitorDescriptor {
    /// Bounds of this monitor in device pixels
    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(self.origin.0, self.origin.1, self.size.0, self.size.1)
    }

    /// Scale factor with unusable values replaced by 1.0
    pub fn effective_scale(&self) -> f32 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }
}

/// Snapshot of the monitor layout taken for a single capture request
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorLayout {
    monitors: Vec<MonitorDescriptor>,
    bounds: Rect,
}

impl MonitorLayout {
    /// Build a snapshot; `None` when no monitor is connected
    pub fn snapshot(monitors: Vec<MonitorDescriptor>) -> Option<Self> {
        let bounds = virtual_desktop_bounds(&monitors)?;
        Some(Self { monitors, bounds })
    }

    pub fn monitors(&self) -> &[MonitorDescriptor] {
        &self.monitors
    }

    /// Union of every monitor; the selection overlay covers exactly this area
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Top-left corner of the selection overlay in device pixels
    pub fn overlay_origin(&self) -> (i32, i32) {
        (self.bounds.left, self.bounds.top)
    }

    /// Monitor whose device bounds contain `(x, y)`
    pub fn monitor_at(&self, x: i32, y: i32) -> Option<&MonitorDescriptor> {
        self.monitors.iter().find(|m| m.bounds().contains_point(x, y))
    }

    pub fn primary(&self) -> Option<&MonitorDescriptor> {
        self.monitors
            .iter()
            .find(|m| m.is_primary)
            .or_else(|| self.monitors.first())
    }
}

/// Union of all monitor bounds
pub fn virtual_desktop_bounds(monitors: &[MonitorDescriptor]) -> Option<Rect> {
    monitors
        .iter()
        .map(MonitorDescriptor::bounds)
        .reduce(|acc, r| acc.union(r))
}
