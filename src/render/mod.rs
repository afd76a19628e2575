//! # QR Rendering
//!
//! Turns a [`RenderRequest`] into an RGBA canvas: the QR symbol drawn at the
//! requested pixel size inside a quiet zone, with the logo composited over
//! the center.
//!
//! ## Architecture
//!
//! ```text
//! RenderRequest ──► qrcode::QrCode ──► module grid ──► RgbaImage
//!                                                         │
//!                   logo data-URI ──► decode + resize ────┘ (overlay)
//! ```
//!
//! ## Example
//!
//! ```
//! use qrlogo::form::{RenderRequest, QR_PIXEL_SIZE};
//! use qrlogo::render::{render, QrStyle};
//!
//! let request = RenderRequest {
//!     value: "https://example.com".to_string(),
//!     pixel_size: QR_PIXEL_SIZE,
//!     logo: None,
//!     logo_width: 56.0,
//!     logo_height: 56.0,
//! };
//! let canvas = render(&request, &QrStyle::default()).unwrap();
//! assert_eq!(canvas.width(), 300);
//! ```

mod logo;

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::QrLogoError;
use crate::form::RenderRequest;

pub use logo::LogoPlacement;

/// Rendering knobs that are not part of the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrStyle {
    /// Light border around the symbol, in pixels
    pub quiet_zone: u32,
    pub ec_level: EcLevel,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Multiplier applied to the logo's alpha channel (0.0 to 1.0)
    pub logo_opacity: f32,
    /// Paint the modules under the logo light before compositing
    pub clear_behind_logo: bool,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            quiet_zone: 10,
            ec_level: EcLevel::M,
            dark: Rgba([0, 0, 0, 255]),
            light: Rgba([255, 255, 255, 255]),
            logo_opacity: 1.0,
            clear_behind_logo: false,
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into a color.
pub fn parse_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Render the QR code (and logo, if any) for a request.
pub fn render(request: &RenderRequest, style: &QrStyle) -> Result<RgbaImage, QrLogoError> {
    let code = QrCode::with_error_correction_level(request.value.as_bytes(), style.ec_level)?;

    let size = request.pixel_size;
    let canvas_size = style
        .quiet_zone
        .checked_mul(2)
        .and_then(|border| border.checked_add(size))
        .ok_or_else(|| {
            QrLogoError::InvalidInput(format!(
                "canvas too large: {} px plus a {} px quiet zone",
                size, style.quiet_zone
            ))
        })?;
    let mut canvas = RgbaImage::from_pixel(canvas_size, canvas_size, style.light);

    draw_modules(&mut canvas, &code, size, style);

    if let Some(uri) = &request.logo {
        match LogoPlacement::centered(size, request.logo_width, request.logo_height) {
            Some(placement) => {
                if let Err(e) = logo::composite(&mut canvas, uri, placement, style) {
                    // Best-effort overlay.
                    tracing::warn!("skipping logo overlay: {}", e);
                }
            }
            None => tracing::debug!(
                width = request.logo_width,
                height = request.logo_height,
                "logo dimensions too small, skipping overlay"
            ),
        }
    }

    tracing::debug!(
        modules = code.width(),
        canvas = canvas_size,
        logo = request.logo.is_some(),
        "rendered QR code"
    );

    Ok(canvas)
}

/// Paint dark modules. Cells are `size / modules` pixels wide with edges
/// rounded, so neighbouring cells tile exactly.
fn draw_modules(canvas: &mut RgbaImage, code: &QrCode, size: u32, style: &QrStyle) {
    let modules = code.width();
    let cell = size as f64 / modules as f64;
    let edge = |i: usize| (i as f64 * cell).round() as u32;
    let offset = style.quiet_zone;

    for qy in 0..modules {
        let (y0, y1) = (edge(qy), edge(qy + 1));
        for qx in 0..modules {
            if code[(qx, qy)] != Color::Dark {
                continue;
            }
            let (x0, x1) = (edge(qx), edge(qx + 1));
            for py in y0..y1 {
                for px in x0..x1 {
                    canvas.put_pixel(offset + px, offset + py, style.dark);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_uri::DataUri;
    use image::ImageFormat;
    use std::io::Cursor;

    fn request(logo: Option<DataUri>) -> RenderRequest {
        RenderRequest {
            value: "https://example.com".to_string(),
            pixel_size: 280,
            logo,
            logo_width: 56.0,
            logo_height: 56.0,
        }
    }

    fn solid_png(w: u32, h: u32, color: Rgba<u8>) -> DataUri {
        let img = RgbaImage::from_pixel(w, h, color);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        DataUri::new("image/png", bytes)
    }

    #[test]
    fn test_canvas_size_includes_quiet_zone() {
        let canvas = render(&request(None), &QrStyle::default()).unwrap();
        assert_eq!(canvas.dimensions(), (300, 300));
        // Quiet zone stays light
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(299, 299), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_finder_pattern_is_dark() {
        let canvas = render(&request(None), &QrStyle::default()).unwrap();
        // Top-left module of the finder pattern sits just inside the quiet zone
        assert_eq!(*canvas.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(289, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(10, 289), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_logo_is_centered() {
        let red = Rgba([255, 0, 0, 255]);
        let canvas = render(&request(Some(solid_png(8, 8, red))), &QrStyle::default()).unwrap();
        // 56x56 logo centered on the 280px area lands on canvas pixels 122..=177
        assert_eq!(*canvas.get_pixel(150, 150), red);
        assert_eq!(*canvas.get_pixel(122, 122), red);
        assert_eq!(*canvas.get_pixel(177, 177), red);
        assert_ne!(*canvas.get_pixel(121, 150), red);
        assert_ne!(*canvas.get_pixel(178, 150), red);
    }

    #[test]
    fn test_broken_logo_is_skipped() {
        let broken = DataUri::new("image/png", b"\x89PNG\r\n\x1a\nnope".to_vec());
        let with_broken = render(&request(Some(broken)), &QrStyle::default()).unwrap();
        let without = render(&request(None), &QrStyle::default()).unwrap();
        assert_eq!(with_broken, without);
    }

    #[test]
    fn test_zero_logo_size_is_skipped() {
        let mut req = request(Some(solid_png(4, 4, Rgba([255, 0, 0, 255]))));
        req.logo_width = 0.0;
        let canvas = render(&req, &QrStyle::default()).unwrap();
        let plain = render(&request(None), &QrStyle::default()).unwrap();
        assert_eq!(canvas, plain);
    }

    #[test]
    fn test_huge_logo_dimensions_fill_qr_area() {
        let red = Rgba([255, 0, 0, 255]);
        let mut req = request(Some(solid_png(4, 4, red)));
        req.logo_width = 1.0e7 * 1.2;
        req.logo_height = 1.0e7 * 1.2;

        let canvas = render(&req, &QrStyle::default()).unwrap();
        assert_eq!(canvas.dimensions(), (300, 300));
        assert_eq!(*canvas.get_pixel(10, 10), red);
        assert_eq!(*canvas.get_pixel(289, 289), red);
        // Quiet zone untouched
        assert_eq!(*canvas.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_too_much_data_is_encode_error() {
        let mut req = request(None);
        req.value = "x".repeat(5000);
        let err = render(&req, &QrStyle::default()).unwrap_err();
        assert!(matches!(err, QrLogoError::Encode(_)));
    }

    #[test]
    fn test_custom_colors() {
        let style = QrStyle {
            dark: Rgba([0, 0, 128, 255]),
            light: Rgba([250, 250, 200, 255]),
            ..QrStyle::default()
        };
        let canvas = render(&request(None), &style).unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), style.light);
        assert_eq!(*canvas.get_pixel(10, 10), style.dark);
    }

    #[test]
    fn test_quiet_zone_overflow_is_rejected() {
        let style = QrStyle {
            quiet_zone: u32::MAX / 2,
            ..QrStyle::default()
        };
        let err = render(&request(None), &style).unwrap_err();
        assert!(matches!(err, QrLogoError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0080"), Some(Rgba([255, 0, 128, 255])));
        assert_eq!(parse_color("00000080"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }
}
