//! Interactive sessions driven by the host UI's event loop

pub mod selection;

pub use selection::{PendingSelection, SelectionController, SelectionEvent, SelectionKey};
