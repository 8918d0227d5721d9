//! FrameDecoder - Optical Code Extraction
//!
//! ## Responsibilities
//!
//! - Envelope decoding (base64 text -> image bytes -> image)
//! - Code extraction from a single still image (QR and 1D barcodes)
//!
//! "No code in frame" is a normal `DecodeResult::NotFound`, never an error.
//! When a frame holds several codes, the first one the backend reports wins.

pub mod frame;

use crate::error::FrameError;
use image::{DynamicImage, GrayImage};

pub use frame::{decode_envelope, load_image};

/// Outcome of decoding one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeResult {
    Found(String),
    NotFound,
}

impl DecodeResult {
    pub fn is_found(&self) -> bool {
        matches!(self, DecodeResult::Found(_))
    }
}

/// Image -> zero-or-one decoded payload
///
/// Implementations are shared by every session, so they must be stateless
/// (or internally synchronized). Decoding runs on a blocking worker.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, image: &DynamicImage) -> Result<DecodeResult, FrameError>;
}

/// Barcode decoder
///
/// Two passes over the greyscale frame:
///
/// 1. QR grids via `rqrr`, in detection order
/// 2. `rxing` multi-format reader (EAN/UPC, Code128, Code39, ITF, QR, ...)
///
/// The first payload produced wins.
#[derive(Debug, Clone, Default)]
pub struct BarcodeFrameDecoder;

impl BarcodeFrameDecoder {
    pub fn new() -> Self {
        Self
    }

    /// QR pass. Grids that are located but unreadable are skipped.
    fn decode_qr(luma: &GrayImage) -> Option<String> {
        let (width, height) = luma.dimensions();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                luma.get_pixel(x as u32, y as u32).0[0]
            });
        let grids = prepared.detect_grids();
        let grid_count = grids.len();

        for (index, grid) in grids.into_iter().enumerate() {
            match grid.decode() {
                Ok((_meta, content)) => {
                    if grid_count > 1 {
                        tracing::debug!(
                            grid_count = grid_count,
                            selected = index,
                            "Multiple codes in frame, using first decodable"
                        );
                    }
                    return Some(content);
                }
                Err(rqrr::DeQRError::EncodingError) => {
                    tracing::warn!(grid = index, "QR payload is not valid UTF-8, skipping grid");
                }
                Err(e) => {
                    // Finder patterns matched but payload is unreadable (blur, glare)
                    tracing::debug!(grid = index, error = ?e, "Grid decode failed");
                }
            }
        }
        None
    }

    /// Multi-format pass, used for 1D symbologies
    fn decode_multi_format(luma: GrayImage) -> Option<String> {
        let (width, height) = luma.dimensions();
        match rxing::helpers::detect_in_luma(luma.into_raw(), width, height, None) {
            Ok(result) => {
                tracing::debug!(format = ?result.getBarcodeFormat(), "Barcode decoded");
                Some(result.getText().to_string())
            }
            Err(e) => {
                tracing::trace!(error = ?e, "No barcode in frame");
                None
            }
        }
    }
}

impl FrameDecoder for BarcodeFrameDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<DecodeResult, FrameError> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        if width == 0 || height == 0 {
            return Ok(DecodeResult::NotFound);
        }

        if let Some(content) = Self::decode_qr(&luma) {
            return Ok(DecodeResult::Found(content));
        }
        Ok(Self::decode_multi_format(luma)
            .map(DecodeResult::Found)
            .unwrap_or(DecodeResult::NotFound))
    }
}
