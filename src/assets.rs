//! Static page assets

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

/// Background image, inlined into the page CSS
#[derive(Debug, Clone)]
pub struct Background {
    pub data_uri: String,
}

impl Background {
    /// Encode raw image bytes as a data URI
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self {
            data_uri: format!("data:{};base64,{}", mime, BASE64.encode(bytes)),
        }
    }

    /// Read the image once at startup. The background is decorative, so a
    /// missing file only logs a warning.
    pub fn load(path: &Path) -> Option<Self> {
        match std::fs::read(path) {
            Ok(bytes) => {
                tracing::info!(
                    path = %path.display(),
                    size_bytes = bytes.len(),
                    "Background image loaded"
                );
                Some(Self::from_bytes(&bytes, mime_for(path)))
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Background image unavailable, rendering without it"
                );
                None
            }
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("webp") => "image/webp",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}
