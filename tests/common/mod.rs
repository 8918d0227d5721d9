//! Shared test fixtures: frame builders, scripted decoder, scripted transport

#![allow(dead_code)]

use base64::Engine;
use codescan_server::error::{FrameError, TransportError};
use codescan_server::frame_decoder::{DecodeResult, FrameDecoder};
use codescan_server::scan_session::{InboundMessage, ScanTransport};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

fn encode_png(img: &GrayImage) -> String {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(out.into_inner())
}

/// Base64 PNG with no code in it
pub fn blank_frame() -> String {
    encode_png(&GrayImage::from_pixel(32, 32, Luma([255u8])))
}

/// Base64 PNG holding a QR code (4px modules, 4-module quiet zone)
pub fn qr_frame(data: &str) -> String {
    let code = qrcode::QrCode::new(data.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let (scale, quiet) = (4u32, 4u32);
    let size = (modules + quiet * 2) * scale;

    let img = GrayImage::from_fn(size, size, |x, y| {
        let (mx, my) = (x / scale, y / scale);
        if mx < quiet || my < quiet || mx >= modules + quiet || my >= modules + quiet {
            return Luma([255u8]);
        }
        match colors[((my - quiet) * modules + (mx - quiet)) as usize] {
            qrcode::Color::Dark => Luma([0u8]),
            qrcode::Color::Light => Luma([255u8]),
        }
    });
    encode_png(&img)
}

/// Base64 PNG holding an EAN-13 barcode (4px modules, 20-module quiet zone)
pub fn ean13_frame(digits: &str) -> String {
    let bars = barcoders::sym::ean13::EAN13::new(digits).unwrap().encode();
    let (scale, quiet) = (4u32, 20u32);
    let width = (bars.len() as u32 + quiet * 2) * scale;

    let img = GrayImage::from_fn(width, 120, |x, _y| {
        let module = x / scale;
        if module < quiet || module >= quiet + bars.len() as u32 {
            return Luma([255u8]);
        }
        match bars[(module - quiet) as usize] {
            1 => Luma([0u8]),
            _ => Luma([255u8]),
        }
    });
    encode_png(&img)
}

/// Valid base64, but not an image
pub fn non_image_frame() -> String {
    base64::engine::general_purpose::STANDARD.encode(b"definitely not an image")
}

/// Returns scripted results in order, `NotFound` once exhausted
pub struct ScriptedDecoder {
    results: Mutex<VecDeque<Result<DecodeResult, FrameError>>>,
}

impl ScriptedDecoder {
    pub fn new(results: Vec<DecodeResult>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().map(Ok).collect()),
        }
    }

    pub fn with_outcomes(results: Vec<Result<DecodeResult, FrameError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

impl FrameDecoder for ScriptedDecoder {
    fn decode(&self, _image: &DynamicImage) -> Result<DecodeResult, FrameError> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(DecodeResult::NotFound))
    }
}

/// Decoder that panics on every call
pub struct PanickingDecoder;

impl FrameDecoder for PanickingDecoder {
    fn decode(&self, _image: &DynamicImage) -> Result<DecodeResult, FrameError> {
        panic!("decoder backend crashed");
    }
}

/// What the session did to the transport, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Received,
    Sent(String),
    Closed,
}

/// In-memory transport fed from a script; `recv` yields `None` once drained
pub struct ScriptedTransport {
    inbound: VecDeque<Result<InboundMessage, TransportError>>,
    events: Arc<Mutex<Vec<Event>>>,
    fail_sends: bool,
}

impl ScriptedTransport {
    pub fn new(inbound: Vec<Result<InboundMessage, TransportError>>) -> Self {
        Self {
            inbound: inbound.into(),
            events: Arc::new(Mutex::new(Vec::new())),
            fail_sends: false,
        }
    }

    pub fn frames(frames: Vec<String>) -> Self {
        Self::new(
            frames
                .into_iter()
                .map(|f| Ok(InboundMessage::Text(f)))
                .collect(),
        )
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn events(&self) -> Arc<Mutex<Vec<Event>>> {
        self.events.clone()
    }
}

impl ScanTransport for ScriptedTransport {
    async fn recv(&mut self) -> Option<Result<InboundMessage, TransportError>> {
        let next = self.inbound.pop_front()?;
        self.events.lock().unwrap().push(Event::Received);
        Some(next)
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError("connection reset".to_string()));
        }
        self.events.lock().unwrap().push(Event::Sent(text));
        Ok(())
    }

    async fn close(&mut self) {
        self.events.lock().unwrap().push(Event::Closed);
    }
}

pub fn sent(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Sent(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

pub fn shared<D: FrameDecoder + 'static>(decoder: D) -> Arc<dyn FrameDecoder> {
    Arc::new(decoder)
}
