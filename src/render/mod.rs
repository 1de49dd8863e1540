//! Raster output
//!
//! This module contains:
//! - Geometry and color math shared by all renderers
//! - Annotation rasterization using tiny-skia
//! - The gradient border compositor

pub mod border;
pub mod geometry;
pub mod image;

pub use self::border::apply_border;
pub use self::image::{draw_annotation, try_new_image};
