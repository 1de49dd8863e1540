//! Region capture and annotation compositing for multi-monitor desktops
//!
//! The flow is: a [`session::SelectionController`] turns overlay input into
//! a rectangle, [`capture`] maps it to device pixels and grabs the pixels,
//! [`annotations::AnnotationCompositor`] lets the user draw on the result,
//! and [`render::apply_border`] frames it before it is handed to an
//! [`export::ImageSink`].

pub mod annotations;
pub mod capture;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
