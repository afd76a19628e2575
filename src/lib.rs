//! # qrlogo - QR Codes with a Logo
//!
//! qrlogo is a small QR code generator built around a form: enter text,
//! pick a logo, generate, download. It provides:
//!
//! - **Form state**: the text / logo / slider fields and their validation
//! - **Rendering**: QR symbol plus a centered logo overlay
//! - **Export**: PNG encoding and `qrcode-<millis>.png` downloads
//! - **Server**: an HTTP front end that hosts the form in a browser
//!
//! ## Quick Start
//!
//! ```no_run
//! use qrlogo::{export, form::FormState, render::QrStyle};
//!
//! # async fn example() -> Result<(), qrlogo::QrLogoError> {
//! let mut form = FormState::new();
//! form.set_text("https://example.com");
//! form.select_file_from_path("logo.png").await?;
//!
//! if form.validate_and_render().is_ok() {
//!     let download = export::download(&form, &QrStyle::default(), chrono::Utc::now())?;
//!     download.save_into(".")?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`form`] | Form state and validation |
//! | [`data_uri`] | `data:` URI encoding for logos |
//! | [`render`] | QR code and logo rasterization |
//! | [`export`] | PNG download packaging |
//! | [`server`] | HTTP server for the browser form |
//! | [`error`] | Error types |

pub mod data_uri;
pub mod error;
pub mod export;
pub mod form;
pub mod render;
pub mod server;

// Re-exports for convenience
pub use error::QrLogoError;
pub use form::FormState;
pub use render::QrStyle;
