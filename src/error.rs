//! # Error Types
//!
//! This module defines error types used throughout the qrlogo library.
//!
//! Form validation messages are not errors in this sense; they live in
//! [`crate::form`] as values the form keeps and shows to the user.

use thiserror::Error;

/// Main error type for qrlogo operations
#[derive(Debug, Error)]
pub enum QrLogoError {
    /// The text does not fit in a QR symbol
    #[error("QR encode error: {0}")]
    Encode(String),

    /// Image decoding, resizing or PNG encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Malformed data-URI
    #[error("Data URI error: {0}")]
    DataUri(String),

    /// Rejected user input (form validation, CLI flags)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Export requested before a QR code was generated
    #[error("Nothing to export: generate a QR code first")]
    NotRendered,

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for QrLogoError {
    fn from(e: image::ImageError) -> Self {
        QrLogoError::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for QrLogoError {
    fn from(e: qrcode::types::QrError) -> Self {
        QrLogoError::Encode(e.to_string())
    }
}
