use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

use crate::error::{ProcessingError, ProcessingResult};

/// One URL rendered twice: PNG bytes for embedding and a `data:` URI for display.
///
/// Both encodings come from the same PNG, so they always carry the same text.
#[derive(Debug, Clone)]
pub struct QrPayload {
    pub text: String,
    pub png: Vec<u8>,
    pub data_uri: String,
}

/// QR code renderer
#[derive(Debug, Clone)]
pub struct QrEncoder {
    module_size: u32,
    ec_level: EcLevel,
}

impl Default for QrEncoder {
    fn default() -> Self {
        QrEncoder::new(4)
    }
}

impl QrEncoder {
    /// `module_size` is the edge, in pixels, of one QR module.
    pub fn new(module_size: u32) -> Self {
        QrEncoder {
            module_size: module_size.max(1),
            ec_level: EcLevel::M,
        }
    }

    pub fn encode(&self, text: &str) -> ProcessingResult<QrPayload> {
        let png = self.encode_png(text)?;
        let data_uri = to_data_uri(&png);
        Ok(QrPayload {
            text: text.to_string(),
            png,
            data_uri,
        })
    }

    /// Black-on-white grayscale PNG with the standard four-module quiet zone.
    pub fn encode_png(&self, text: &str) -> ProcessingResult<Vec<u8>> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), self.ec_level)
            .map_err(|e| ProcessingError::QrEncoding(e.to_string()))?;

        let img = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| ProcessingError::QrEncoding(e.to_string()))?;

        Ok(buffer.into_inner())
    }

    pub fn encode_data_uri(&self, text: &str) -> ProcessingResult<String> {
        Ok(to_data_uri(&self.encode_png(text)?))
    }
}

fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
