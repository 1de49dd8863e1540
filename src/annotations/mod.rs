//! Annotation editing session
//!
//! Owns the working image and at most one preview shape. A preview is a
//! display-only overlay for the host to draw; committing bakes it into the
//! working image's pixels for good.

pub mod compositor;

pub use compositor::{AnnotationCompositor, Preview};
