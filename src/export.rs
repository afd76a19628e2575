//! # PNG Export
//!
//! Captures a rendered form as a PNG and names it `qrcode-<unix millis>.png`.
//!
//! Exporting a form that has not been generated yet is an error
//! ([`QrLogoError::NotRendered`]) rather than a silent no-op, so callers can
//! tell the user why nothing was downloaded.

use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::QrLogoError;
use crate::form::FormState;
use crate::render::{self, QrStyle};

/// A PNG ready to be handed to the user.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write the PNG into `dir`, returning the full path.
    pub fn save_into(&self, dir: impl AsRef<Path>) -> Result<PathBuf, QrLogoError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `qrcode-<millis since epoch>.png`
pub fn download_filename(at: DateTime<Utc>) -> String {
    format!("qrcode-{}.png", at.timestamp_millis())
}

/// Encode a canvas as PNG bytes.
pub fn rasterize(canvas: &RgbaImage) -> Result<Vec<u8>, QrLogoError> {
    let mut png_bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| QrLogoError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}

/// Render the form as it stands and encode it.
pub fn render_png(form: &FormState, style: &QrStyle) -> Result<Vec<u8>, QrLogoError> {
    let request = form.render_request().ok_or(QrLogoError::NotRendered)?;
    let canvas = render::render(&request, style)?;
    rasterize(&canvas)
}

/// Build the download for a rendered form, stamped with `at`.
pub fn download(form: &FormState, style: &QrStyle, at: DateTime<Utc>) -> Result<Download, QrLogoError> {
    let bytes = render_png(form, style)?;
    let filename = download_filename(at);
    tracing::info!(filename = %filename, size = bytes.len(), "exported QR code");
    Ok(Download { filename, bytes })
}
