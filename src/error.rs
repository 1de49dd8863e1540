//! Reportable failures of the compositing core
//!
//! Cancelled selections, degenerate geometry and bad color text are not
//! errors; they are absorbed where they happen. Only resource failures end
//! up here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Cannot allocate a {width}x{height} image")]
    Allocation { width: u32, height: u32 },
    #[error("Render surface error: {0}")]
    Surface(String),
}

pub type ComposeResult<T> = Result<T, ComposeError>;
