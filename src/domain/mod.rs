//! Pure domain types with minimal dependencies
//!
//! Types here have no rendering or platform dependencies so every other
//! module can share them.

pub mod annotation;
pub mod brush;
pub mod geometry;
pub mod monitor;
pub mod selection;

pub use annotation::*;
pub use brush::*;
pub use geometry::*;
pub use monitor::*;
pub use selection::*;
