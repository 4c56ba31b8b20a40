//! Decoding the product photo into RGBA pixels for drawing on the card.
//!
//! PNG and baseline/progressive JPEG are supported, which covers both camera
//! snapshots and typical gallery picks.

use crate::model::ImageAsset;
use crate::platform::files::sniff_mime;
use crate::{Error, Result};

/// 8-bit RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

pub fn decode_photo(asset: &ImageAsset) -> Result<DecodedImage> {
    let kind = sniff_mime(asset.bytes()).unwrap_or(asset.mime());
    let img = match kind {
        "image/png" => decode_png(asset.bytes())?,
        "image/jpeg" => decode_jpeg(asset.bytes())?,
        other => {
            return Err(Error::DecodeError(format!(
                "cannot draw {} images on the card",
                other
            )))
        }
    };
    if img.width == 0 || img.height == 0 {
        return Err(Error::DecodeError("image has no pixels".into()));
    }
    Ok(img)
}

fn decode_png(bytes: &[u8]) -> Result<DecodedImage> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| Error::DecodeError(format!("png: {}", e)))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| Error::DecodeError(format!("png: {}", e)))?;
    let data = &buf[..info.buffer_size()];

    let rgba = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(Error::DecodeError("png: palette was not expanded".into()))
        }
    };
    Ok(DecodedImage {
        width: info.width,
        height: info.height,
        rgba,
    })
}

fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage> {
    let mut decoder = jpeg_decoder::Decoder::new(bytes);
    let pixels = decoder
        .decode()
        .map_err(|e| Error::DecodeError(format!("jpeg: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| Error::DecodeError("jpeg: missing header".into()))?;

    let rgba = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], 255])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|p| {
                // approximate, no colour management
                let k = p[3] as u16;
                let ch = |c: u8| ((c as u16 * k) / 255) as u8;
                [ch(p[0]), ch(p[1]), ch(p[2]), 255]
            })
            .collect(),
    };
    Ok(DecodedImage {
        width: info.width as u32,
        height: info.height as u32,
        rgba,
    })
}
