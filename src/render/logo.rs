//! Logo overlay: decode the data-URI, scale it to the requested box and
//! alpha-blend it over the center of the QR area.

use image::{RgbaImage, imageops::FilterType};

use super::QrStyle;
use crate::data_uri::DataUri;
use crate::error::QrLogoError;

/// Where the logo goes, relative to the QR area (quiet zone excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl LogoPlacement {
    /// Center a `width` x `height` box on a square area of `size` pixels.
    /// Each dimension is capped at `size`. Returns `None` if either
    /// dimension rounds to zero or is not finite.
    pub fn centered(size: u32, width: f64, height: f64) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() {
            return None;
        }
        let width = width.round().clamp(0.0, size as f64) as u32;
        let height = height.round().clamp(0.0, size as f64) as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let x = (size as i64 - width as i64) / 2;
        let y = (size as i64 - height as i64) / 2;
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }
}

/// Composite the logo onto the canvas.
pub(super) fn composite(
    canvas: &mut RgbaImage,
    uri: &DataUri,
    placement: LogoPlacement,
    style: &QrStyle,
) -> Result<(), QrLogoError> {
    let source = image::load_from_memory(uri.bytes())?.to_rgba8();
    let mut logo = image::imageops::resize(
        &source,
        placement.width,
        placement.height,
        FilterType::Triangle,
    );

    let opacity = style.logo_opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in logo.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
        }
    }

    let x = placement.x + style.quiet_zone as i64;
    let y = placement.y + style.quiet_zone as i64;

    if style.clear_behind_logo {
        clear_region(canvas, x, y, placement.width, placement.height, style);
    }

    image::imageops::overlay(canvas, &logo, x, y);
    Ok(())
}

fn clear_region(canvas: &mut RgbaImage, x: i64, y: i64, width: u32, height: u32, style: &QrStyle) {
    let x0 = x.max(0) as u32;
    let y0 = y.max(0) as u32;
    let x1 = ((x + width as i64).max(0) as u32).min(canvas.width());
    let y1 = ((y + height as i64).max(0) as u32).min(canvas.height());

    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, style.light);
        }
    }
}
