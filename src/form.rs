//! # Form State
//!
//! The QR generator is a small multi-step form: enter text, pick a logo,
//! generate a preview, export it. [`FormState`] owns every field of that
//! form and its validation.
//!
//! ## Lifecycle
//!
//! ```text
//! set_text ──┐
//! select_file ──► DecodeJob::run ──► complete_decode
//! set_logo_scale ┤
//!            └──► validate_and_render ──► render_request ──► render / export
//! reset ─────────► defaults
//! ```
//!
//! Logo decoding is split out as a [`DecodeJob`] so callers can run it off
//! the event loop. Outcomes are applied in completion order (last write
//! wins) and are never cancelled.
//!
//! ## Example
//!
//! ```
//! use qrlogo::form::{FormState, LogoFile};
//!
//! let mut form = FormState::new();
//! form.set_text("https://example.com");
//!
//! let png = b"\x89PNG\r\n\x1a\n....".to_vec();
//! if let Some(job) = form.select_file(LogoFile::new("logo.png", png)) {
//!     let outcome = job.run();
//!     form.complete_decode(outcome);
//! }
//!
//! assert!(form.validate_and_render().is_ok());
//! assert!(form.is_rendered());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::data_uri::DataUri;
use crate::error::QrLogoError;

/// Logos must be strictly smaller than this many bytes (1 MiB).
pub const MAX_LOGO_BYTES: u64 = 1_048_576;

/// Factor between the slider value and the stored logo dimension.
pub const LOGO_SCALE: f64 = 1.2;

/// Upper end of the logo sliders (the lower end is 0).
pub const LOGO_SLIDER_MAX: f64 = 100.0;

/// Stored logo width and height on a fresh form.
pub const DEFAULT_LOGO_DIMENSION: f64 = 56.0;

/// Edge length of the QR area in pixels (quiet zone excluded).
pub const QR_PIXEL_SIZE: u32 = 280;

/// Which logo dimension a slider controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoAxis {
    Width,
    Height,
}

/// Problem with the text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("please enter a url")]
    Empty,
}

/// Problem with the logo file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("please select file")]
    NotSelected,

    #[error("File size too large!")]
    TooLarge,

    #[error("Error reading the image.")]
    ReadFailed,
}

/// Why [`FormState::validate_and_render`] refused to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Text(#[from] TextError),

    #[error(transparent)]
    File(#[from] FileError),
}

/// A file chosen in the logo picker.
#[derive(Debug, Clone)]
pub struct LogoFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LogoFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a logo from disk, keeping only the file name.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, QrLogoError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Pending conversion of a selected file into a data-URI.
#[derive(Debug)]
pub struct DecodeJob {
    file: LogoFile,
}

/// Result of running a [`DecodeJob`].
#[derive(Debug, Clone)]
pub struct DecodeOutcome {
    pub filename: String,
    pub result: Result<DataUri, FileError>,
}

impl DecodeJob {
    pub fn filename(&self) -> &str {
        &self.file.name
    }

    /// Sniff the image type and wrap the bytes as a data-URI.
    ///
    /// Only PNG and JPEG logos are accepted; anything else (including an
    /// empty file) is a read failure.
    pub fn run(self) -> DecodeOutcome {
        let LogoFile { name, bytes } = self.file;

        let result = match image::guess_format(&bytes) {
            Ok(format @ (image::ImageFormat::Png | image::ImageFormat::Jpeg)) => {
                Ok(DataUri::new(format.to_mime_type(), bytes))
            }
            _ => Err(FileError::ReadFailed),
        };

        DecodeOutcome {
            filename: name,
            result,
        }
    }
}

/// Everything the renderer needs, captured from a rendered form.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub value: String,
    pub pixel_size: u32,
    pub logo: Option<DataUri>,
    pub logo_width: f64,
    pub logo_height: f64,
}

/// Serializable snapshot of the form, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub text: String,
    pub filename: String,
    pub filesize: u64,
    pub logo_loaded: bool,
    /// Slider positions (stored dimension / [`LOGO_SCALE`])
    pub logo_width_display: f64,
    pub logo_height_display: f64,
    pub logo_width: f64,
    pub logo_height: f64,
    pub is_rendered: bool,
    pub encoded_value: String,
    pub text_error: Option<String>,
    pub file_error: Option<String>,
}

/// State of one QR generator form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    text: String,
    logo_image: Option<DataUri>,
    filename: String,
    filesize: u64,
    logo_width: f64,
    logo_height: f64,
    is_rendered: bool,
    encoded_value: String,
    text_error: Option<TextError>,
    file_error: Option<FileError>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            logo_image: None,
            filename: String::new(),
            filesize: 0,
            logo_width: DEFAULT_LOGO_DIMENSION,
            logo_height: DEFAULT_LOGO_DIMENSION,
            is_rendered: false,
            encoded_value: String::new(),
            text_error: None,
            file_error: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn logo_image(&self) -> Option<&DataUri> {
        self.logo_image.as_ref()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn filesize(&self) -> u64 {
        self.filesize
    }

    pub fn logo_dimension(&self, axis: LogoAxis) -> f64 {
        match axis {
            LogoAxis::Width => self.logo_width,
            LogoAxis::Height => self.logo_height,
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.is_rendered
    }

    /// Text frozen by the last successful generation.
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }

    pub fn text_error(&self) -> Option<TextError> {
        self.text_error
    }

    pub fn file_error(&self) -> Option<FileError> {
        self.file_error
    }

    /// Overwrite the text. No validation happens here.
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.text = value.into();
    }

    /// Record a picked file.
    ///
    /// Name and size are always recorded, so an oversized file still counts
    /// as "selected" and is rejected later by [`validate_and_render`]. Files
    /// under [`MAX_LOGO_BYTES`] come back as a [`DecodeJob`] whose outcome
    /// must be fed to [`complete_decode`].
    ///
    /// [`validate_and_render`]: FormState::validate_and_render
    /// [`complete_decode`]: FormState::complete_decode
    pub fn select_file(&mut self, file: LogoFile) -> Option<DecodeJob> {
        self.filename = file.name.clone();
        self.filesize = file.size();

        if file.size() < MAX_LOGO_BYTES {
            Some(DecodeJob { file })
        } else {
            tracing::debug!(
                filename = %file.name,
                size = file.size(),
                "logo over size limit, not decoding"
            );
            None
        }
    }

    /// Apply a finished decode. Whatever completes last wins.
    pub fn complete_decode(&mut self, outcome: DecodeOutcome) {
        match outcome.result {
            Ok(uri) => {
                tracing::debug!(filename = %outcome.filename, mime = uri.mime(), "logo decoded");
                self.logo_image = Some(uri);
            }
            Err(e) => {
                tracing::warn!(filename = %outcome.filename, "logo decode failed: {}", e);
                self.logo_image = None;
                self.file_error = Some(e);
            }
        }
    }

    /// Read a logo from disk, select it and decode it in one go.
    pub async fn select_file_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), QrLogoError> {
        let file = LogoFile::read(path).await?;
        if let Some(job) = self.select_file(file) {
            let outcome = job.run();
            self.complete_decode(outcome);
        }
        Ok(())
    }

    /// Store a slider value, scaled by [`LOGO_SCALE`].
    pub fn set_logo_scale(&mut self, axis: LogoAxis, raw: f64) {
        let stored = raw * LOGO_SCALE;
        match axis {
            LogoAxis::Width => self.logo_width = stored,
            LogoAxis::Height => self.logo_height = stored,
        }
    }

    /// Slider position for an axis: the stored dimension divided back.
    pub fn logo_scale_display(&self, axis: LogoAxis) -> f64 {
        self.logo_dimension(axis) / LOGO_SCALE
    }

    /// Validate the form and, on success, mark it rendered.
    ///
    /// Previous errors are cleared first. The failure is stored on the form
    /// and also returned. The recorded file size is checked again here even
    /// though [`select_file`](FormState::select_file) already skipped the
    /// decode of oversized files.
    pub fn validate_and_render(&mut self) -> Result<(), ValidationError> {
        self.text_error = None;
        self.file_error = None;

        let result = self.check();
        match result {
            Ok(()) => {
                self.is_rendered = true;
                self.encoded_value = self.text.clone();
                tracing::debug!(value = %self.encoded_value, "form rendered");
            }
            Err(ValidationError::Text(e)) => self.text_error = Some(e),
            Err(ValidationError::File(e)) => self.file_error = Some(e),
        }
        result
    }

    fn check(&self) -> Result<(), ValidationError> {
        if self.text.is_empty() {
            return Err(TextError::Empty.into());
        }
        if self.filename.is_empty() {
            return Err(FileError::NotSelected.into());
        }
        if self.filesize >= MAX_LOGO_BYTES {
            return Err(FileError::TooLarge.into());
        }
        Ok(())
    }

    /// Snapshot for the renderer, or `None` before the first successful
    /// generation. The text is the frozen value; logo and dimensions are
    /// whatever the form holds now.
    pub fn render_request(&self) -> Option<RenderRequest> {
        if !self.is_rendered {
            return None;
        }
        Some(RenderRequest {
            value: self.encoded_value.clone(),
            pixel_size: QR_PIXEL_SIZE,
            logo: self.logo_image.clone(),
            logo_width: self.logo_width,
            logo_height: self.logo_height,
        })
    }

    /// Back to a fresh form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn view(&self) -> FormView {
        FormView {
            text: self.text.clone(),
            filename: self.filename.clone(),
            filesize: self.filesize,
            logo_loaded: self.logo_image.is_some(),
            logo_width_display: self.logo_scale_display(LogoAxis::Width),
            logo_height_display: self.logo_scale_display(LogoAxis::Height),
            logo_width: self.logo_width,
            logo_height: self.logo_height,
            is_rendered: self.is_rendered,
            encoded_value: self.encoded_value.clone(),
            text_error: self.text_error.map(|e| e.to_string()),
            file_error: self.file_error.map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn png_file(name: &str, size: usize) -> LogoFile {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(size.max(PNG_MAGIC.len()), 0);
        LogoFile::new(name, bytes)
    }

    fn select_and_decode(form: &mut FormState, file: LogoFile) {
        if let Some(job) = form.select_file(file) {
            let outcome = job.run();
            form.complete_decode(outcome);
        }
    }

    #[test]
    fn test_defaults() {
        let form = FormState::new();
        assert_eq!(form.text(), "");
        assert_eq!(form.filename(), "");
        assert_eq!(form.filesize(), 0);
        assert!(form.logo_image().is_none());
        assert!(!form.is_rendered());
        assert_eq!(form.logo_dimension(LogoAxis::Width), 56.0);
        assert_eq!(form.logo_dimension(LogoAxis::Height), 56.0);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let mut form = FormState::new();
        select_and_decode(&mut form, png_file("logo.png", 100));

        let err = form.validate_and_render().unwrap_err();
        assert_eq!(err, ValidationError::Text(TextError::Empty));
        assert_eq!(err.to_string(), "please enter a url");
        assert_eq!(form.text_error(), Some(TextError::Empty));
        assert!(!form.is_rendered());
        assert!(form.render_request().is_none());
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let mut form = FormState::new();
        form.set_text("https://example.com");

        let err = form.validate_and_render().unwrap_err();
        assert_eq!(err.to_string(), "please select file");
        assert_eq!(form.file_error(), Some(FileError::NotSelected));
        assert!(form.text_error().is_none());
        assert!(!form.is_rendered());
    }

    #[test]
    fn test_oversized_file_is_recorded_but_rejected() {
        let mut form = FormState::new();
        form.set_text("https://example.com");

        let job = form.select_file(png_file("big.png", MAX_LOGO_BYTES as usize));
        assert!(job.is_none());
        assert_eq!(form.filename(), "big.png");
        assert_eq!(form.filesize(), MAX_LOGO_BYTES);

        let err = form.validate_and_render().unwrap_err();
        assert_eq!(err.to_string(), "File size too large!");
        assert!(!form.is_rendered());
    }

    #[test]
    fn test_just_under_limit_is_accepted() {
        let mut form = FormState::new();
        form.set_text("x");
        select_and_decode(&mut form, png_file("ok.png", MAX_LOGO_BYTES as usize - 1));

        assert!(form.logo_image().is_some());
        assert!(form.validate_and_render().is_ok());
    }

    #[test]
    fn test_happy_path() {
        let mut form = FormState::new();
        form.set_text("https://example.com");
        select_and_decode(&mut form, png_file("logo.png", 500 * 1024));

        assert_eq!(form.validate_and_render(), Ok(()));
        assert!(form.is_rendered());
        assert!(form.text_error().is_none());
        assert!(form.file_error().is_none());

        let request = form.render_request().unwrap();
        assert_eq!(request.value, "https://example.com");
        assert_eq!(request.pixel_size, QR_PIXEL_SIZE);
        assert_eq!(request.logo.as_ref().map(|l| l.mime()), Some("image/png"));
    }

    #[test]
    fn test_validation_clears_previous_errors() {
        let mut form = FormState::new();
        assert!(form.validate_and_render().is_err());
        assert!(form.text_error().is_some());

        form.set_text("hello");
        assert!(form.validate_and_render().is_err());
        assert!(form.text_error().is_none());
        assert_eq!(form.file_error(), Some(FileError::NotSelected));
    }

    #[test]
    fn test_encoded_value_is_frozen() {
        let mut form = FormState::new();
        form.set_text("first");
        select_and_decode(&mut form, png_file("logo.png", 64));
        form.validate_and_render().unwrap();

        form.set_text("second");
        assert_eq!(form.encoded_value(), "first");
        assert_eq!(form.render_request().unwrap().value, "first");
    }

    #[test]
    fn test_decode_failure_sets_error_and_clears_logo() {
        let mut form = FormState::new();
        select_and_decode(&mut form, png_file("logo.png", 64));
        assert!(form.logo_image().is_some());

        select_and_decode(&mut form, LogoFile::new("notes.txt", b"hello".to_vec()));
        assert!(form.logo_image().is_none());
        assert_eq!(form.file_error(), Some(FileError::ReadFailed));
        assert_eq!(form.view().file_error.as_deref(), Some("Error reading the image."));
    }

    #[test]
    fn test_empty_file_fails_decode() {
        let outcome = FormState::new()
            .select_file(LogoFile::new("empty.png", Vec::new()))
            .unwrap()
            .run();
        assert_eq!(outcome.result, Err(FileError::ReadFailed));
    }

    #[test]
    fn test_decode_last_write_wins() {
        let mut form = FormState::new();
        let first = form.select_file(png_file("a.png", 32)).unwrap();
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0];
        jpeg.resize(32, 0);
        let second = form.select_file(LogoFile::new("b.jpg", jpeg)).unwrap();

        // The later selection finishes first; the earlier one lands after it.
        form.complete_decode(second.run());
        form.complete_decode(first.run());

        assert_eq!(form.filename(), "b.jpg");
        assert_eq!(form.logo_image().unwrap().mime(), "image/png");
    }

    #[test]
    fn test_logo_scale_round_trip() {
        let mut form = FormState::new();
        for raw in [0.0, 1.0, 33.0, 50.0, 99.5, 100.0] {
            form.set_logo_scale(LogoAxis::Width, raw);
            form.set_logo_scale(LogoAxis::Height, raw / 2.0);
            assert!((form.logo_dimension(LogoAxis::Width) - raw * 1.2).abs() < 1e-9);
            assert!((form.logo_scale_display(LogoAxis::Width) - raw).abs() < 1e-9);
            assert!((form.logo_scale_display(LogoAxis::Height) - raw / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = FormState::new();
        form.set_text("https://example.com");
        select_and_decode(&mut form, png_file("logo.png", 64));
        form.set_logo_scale(LogoAxis::Width, 80.0);
        form.set_logo_scale(LogoAxis::Height, 20.0);
        form.validate_and_render().unwrap();
        select_and_decode(&mut form, LogoFile::new("bad.png", Vec::new()));

        form.reset();
        assert_eq!(form, FormState::default());
    }

    #[test]
    fn test_view() {
        let mut form = FormState::new();
        form.set_text("abc");
        form.set_logo_scale(LogoAxis::Height, 10.0);
        let _ = form.validate_and_render();

        let view = form.view();
        assert_eq!(view.text, "abc");
        assert!(!view.logo_loaded);
        assert!((view.logo_height_display - 10.0).abs() < 1e-9);
        assert!((view.logo_width - 56.0).abs() < 1e-9);
        assert_eq!(view.text_error, None);
        assert_eq!(view.file_error.as_deref(), Some("please select file"));
    }

    #[tokio::test]
    async fn test_select_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, png_file("ignored", 128).bytes).unwrap();

        let mut form = FormState::new();
        form.select_file_from_path(&path).await.unwrap();
        assert_eq!(form.filename(), "logo.png");
        assert_eq!(form.filesize(), 128);
        assert!(form.logo_image().is_some());
    }

    #[tokio::test]
    async fn test_select_missing_path_is_io_error() {
        let mut form = FormState::new();
        let err = form
            .select_file_from_path("/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(err, QrLogoError::Io(_)));
        assert_eq!(form.filename(), "");
    }
}
