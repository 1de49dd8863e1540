//! Selection state for the region overlay

use super::geometry::{LogicalRect, Point};

/// State of one drag-to-select gesture on the overlay
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Pointer went down at `anchor`; `pressed` tracks whether the button is still held
    Dragging {
        anchor: Point,
        current: Point,
        pressed: bool,
    },
    /// Confirmed with Enter
    Finalized { rect: LogicalRect },
    /// Aborted with Escape
    Cancelled,
}

impl SelectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SelectionState::Finalized { .. } | SelectionState::Cancelled
        )
    }

    /// Rectangle the overlay should currently display, if any
    pub fn visible_rect(&self) -> Option<LogicalRect> {
        match *self {
            SelectionState::Dragging {
                anchor, current, ..
            } => Some(LogicalRect::from_points(anchor, current)),
            SelectionState::Finalized { rect } => Some(rect),
            SelectionState::Idle | SelectionState::Cancelled => None,
        }
    }
}
