//! # Data URIs
//!
//! Logos travel through the form as `data:<mime>;base64,<payload>` strings,
//! the same shape a browser's file reader produces.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::fmt;
use std::str::FromStr;

use crate::error::QrLogoError;

/// A decoded data-URI: mime type plus raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

// Payloads can be large; keep debug output readable.
impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FromStr for DataUri {
    type Err = QrLogoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| QrLogoError::DataUri("missing 'data:' scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| QrLogoError::DataUri("missing ',' separator".to_string()))?;
        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            QrLogoError::DataUri("only base64-encoded payloads are supported".to_string())
        })?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| QrLogoError::DataUri(format!("invalid base64 payload: {}", e)))?;

        Ok(Self::new(mime, bytes))
    }
}
