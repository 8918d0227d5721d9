//! Frame envelope handling
//!
//! Inbound frames are base64 text. Browser clients built on
//! `canvas.toDataURL()` send a `data:image/...;base64,` prefix, which is
//! accepted and stripped here.

use crate::error::FrameError;
use base64::Engine;
use image::DynamicImage;

/// Strip an optional data-URL header, returning the base64 body
fn strip_data_url(text: &str) -> &str {
    if let Some(rest) = text.strip_prefix("data:") {
        if let Some((header, body)) = rest.split_once(',') {
            if header.ends_with(";base64") {
                return body;
            }
        }
    }
    text
}

/// Decode the transport envelope into raw image bytes
pub fn decode_envelope(text: &str) -> Result<Vec<u8>, FrameError> {
    let body = strip_data_url(text.trim()).trim();
    if body.is_empty() {
        return Err(FrameError::EmptyFrame);
    }

    let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;
    if bytes.is_empty() {
        return Err(FrameError::EmptyFrame);
    }
    Ok(bytes)
}

/// Build an in-memory image from raw bytes (format guessed from content)
pub fn load_image(bytes: &[u8]) -> Result<DynamicImage, FrameError> {
    Ok(image::load_from_memory(bytes)?)
}
