//! Drag-to-select controller for the full-desktop overlay
//!
//! The host UI feeds pointer and key events into [`SelectionController`]
//! one at a time. Whoever asked for a region awaits the matching
//! [`PendingSelection`], which resolves once the controller reaches a
//! terminal state. Dropping the controller without finishing counts as a
//! cancellation.

use tokio::sync::oneshot;

use crate::domain::{LogicalRect, Point, SelectionState};

/// Keys the overlay reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKey {
    Enter,
    Escape,
    Other,
}

/// Input delivered by the overlay surface, in overlay logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Key(SelectionKey),
}

#[derive(Debug)]
pub struct SelectionController {
    state: SelectionState,
    tx: Option<oneshot::Sender<Option<LogicalRect>>>,
}

/// Resolves to the confirmed rectangle, or `None` when the user cancelled
#[derive(Debug)]
pub struct PendingSelection {
    rx: oneshot::Receiver<Option<LogicalRect>>,
}

impl PendingSelection {
    pub async fn wait(self) -> Option<LogicalRect> {
        self.rx.await.ok().flatten()
    }
}

impl SelectionController {
    pub fn new() -> (Self, PendingSelection) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                state: SelectionState::Idle,
                tx: Some(tx),
            },
            PendingSelection { rx },
        )
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Rectangle to draw on the overlay right now
    pub fn visible_rect(&self) -> Option<LogicalRect> {
        self.state.visible_rect()
    }

    /// Apply one event; returns true when the state changed
    pub fn handle(&mut self, event: SelectionEvent) -> bool {
        if self.state.is_terminal() {
            return false;
        }

        match (self.state, event) {
            (_, SelectionEvent::Key(SelectionKey::Escape)) => {
                self.finish(SelectionState::Cancelled, None);
                true
            }
            (SelectionState::Dragging { anchor, current, .. }, SelectionEvent::Key(SelectionKey::Enter)) => {
                let rect = LogicalRect::from_points(anchor, current);
                if rect.is_empty() {
                    log::debug!("Selection confirmed with zero area: {rect:?}");
                }
                self.finish(SelectionState::Finalized { rect }, Some(rect));
                true
            }
            (_, SelectionEvent::PointerDown(p)) => {
                self.state = SelectionState::Dragging {
                    anchor: p,
                    current: p,
                    pressed: true,
                };
                true
            }
            (
                SelectionState::Dragging {
                    anchor,
                    pressed: true,
                    ..
                },
                SelectionEvent::PointerMove(q),
            ) => {
                self.state = SelectionState::Dragging {
                    anchor,
                    current: q,
                    pressed: true,
                };
                true
            }
            // Releasing the button keeps the rectangle; only Enter confirms
            (
                SelectionState::Dragging {
                    anchor,
                    current,
                    pressed: true,
                },
                SelectionEvent::PointerUp(_),
            ) => {
                self.state = SelectionState::Dragging {
                    anchor,
                    current,
                    pressed: false,
                };
                true
            }
            _ => false,
        }
    }

    fn finish(&mut self, state: SelectionState, result: Option<LogicalRect>) {
        self.state = state;
        if let Some(tx) = self.tx.take() {
            // The requester may already have given up
            let _ = tx.send(result);
        }
    }
}
