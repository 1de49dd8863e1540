//! Handing finished images to persistence

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use image::RgbaImage;

use crate::config;

/// Token in file name patterns replaced by the local capture time
pub const TIMESTAMP_TOKEN: &str = "{yyyyMMdd_HHmmss}";

const DEFAULT_PATTERN: &str = "screenshot_{yyyyMMdd_HHmmss}.png";

/// Where and how a finished image should be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub directory: PathBuf,
    pub file_name_pattern: String,
    pub copy_to_clipboard: bool,
}

/// Persistence collaborator receiving the final (annotated, framed) image
pub trait ImageSink {
    /// Store `image` and return the path it was written to
    fn persist(&self, image: &RgbaImage, target: &SaveTarget) -> anyhow::Result<PathBuf>;
}

/// Expand the timestamp token and make sure the name ends in `.png`
pub fn resolve_file_name(pattern: &str, now: NaiveDateTime) -> String {
    let pattern = match pattern.trim() {
        "" => DEFAULT_PATTERN,
        p => p,
    };
    let mut name = pattern.replace(
        TIMESTAMP_TOKEN,
        &now.format("%Y%m%d_%H%M%S").to_string(),
    );
    if !name.to_ascii_lowercase().ends_with(".png") {
        name.push_str(".png");
    }
    name
}

/// Configured directory, or the default pictures directory when blank
fn save_directory(configured: &Path) -> PathBuf {
    if configured.to_string_lossy().trim().is_empty() {
        let fallback = config::default_save_directory();
        log::debug!("No save directory configured, using {}", fallback.display());
        fallback
    } else {
        configured.to_path_buf()
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()
}

/// Writes PNG files into the target directory
#[derive(Debug, Default, Clone, Copy)]
pub struct PngFileSink;

impl ImageSink for PngFileSink {
    fn persist(&self, image: &RgbaImage, target: &SaveTarget) -> anyhow::Result<PathBuf> {
        let directory = save_directory(&target.directory);
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create directory: {}", directory.display()))?;

        let name = resolve_file_name(&target.file_name_pattern, chrono::Local::now().naive_local());
        let path = directory.join(name);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        write_png(file, image)
            .with_context(|| format!("Failed to encode PNG: {}", path.display()))?;

        log::info!(
            "Saved {}x{} image to {}",
            image.width(),
            image.height(),
            path.display()
        );
        if target.copy_to_clipboard {
            log::warn!("No clipboard available to {}, image was only saved", path.display());
        }
        Ok(path)
    }
}
