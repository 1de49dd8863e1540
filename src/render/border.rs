//! Gradient frame around a finished image

use image::{Rgba, RgbaImage};

use super::geometry::gradient::{self, ThreeStop};
use super::image::try_new_image;
use crate::config::{BorderSpec, MAX_BORDER_THICKNESS};
use crate::error::{ComposeError, ComposeResult};

/// Pad `source` with a diagonal three-stop gradient margin of `spec.thickness_px`
///
/// Thickness is capped at [`MAX_BORDER_THICKNESS`]. Always returns a new buffer; when the border is disabled or has no
/// thickness the result is a plain copy. Source pixels are copied, not
/// blended, so the interior is bit-identical to `source`.
pub fn apply_border(source: &RgbaImage, spec: &BorderSpec) -> ComposeResult<RgbaImage> {
    if !spec.enabled || spec.thickness_px <= 0 {
        return Ok(source.clone());
    }

    let t = spec.thickness_px.min(MAX_BORDER_THICKNESS) as u32;
    let overflow = || ComposeError::Allocation {
        width: source.width(),
        height: source.height(),
    };
    let width = source
        .width()
        .checked_add(t * 2)
        .ok_or_else(overflow)?;
    let height = source
        .height()
        .checked_add(t * 2)
        .ok_or_else(overflow)?;

    let mut framed = try_new_image(width, height)?;
    fill_diagonal_gradient(&mut framed, ThreeStop::new(spec.gradient_start, spec.gradient_end));
    image::imageops::replace(&mut framed, source, t.into(), t.into());

    log::debug!(
        "Applied {t}px border ({}): {}x{} -> {width}x{height}",
        spec.preset_name,
        source.width(),
        source.height()
    );
    Ok(framed)
}

/// Fill the whole image, start color at the top-left corner and end color
/// at the bottom-right
fn fill_diagonal_gradient(img: &mut RgbaImage, stops: ThreeStop) {
    let (w, h) = img.dimensions();
    // Pixels on the same anti-diagonal share a color
    let steps = (w as usize + h as usize).saturating_sub(1);
    let palette: Vec<Rgba<u8>> = (0..steps)
        .map(|i| {
            let ratio = gradient::diagonal_ratio(i as u32, 0, w, h);
            Rgba(stops.at(ratio).to_rgba_u8())
        })
        .collect();
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = palette[(x + y) as usize];
    }
}
