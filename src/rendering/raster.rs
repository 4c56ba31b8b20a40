/// Software rasterizer for card paint commands

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use crate::rendering::decode::DecodedImage;
use crate::rendering::paint::{PaintCommand, Rgba};
use crate::rendering::Screenshot;
use crate::{Error, Result};

/// Upper bound on pixels per bitmap, well past a 2x card at 8x scale.
const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// An RGBA8 bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Pixmap {
    /// Opaque bitmap filled with `background`.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Result<Self> {
        let pixels = width as u64 * height as u64;
        if pixels == 0 || pixels > MAX_PIXELS {
            return Err(Error::RenderError(format!(
                "cannot allocate a {}x{} bitmap",
                width, height
            )));
        }
        let [r, g, b] = background;
        let data = std::iter::repeat([r, g, b, 255])
            .take(pixels as usize)
            .flatten()
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn blend(&mut self, x: i64, y: i64, (r, g, b, a): Rgba) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 || a == 0 {
            return;
        }
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        if a == 255 {
            self.data[i..i + 4].copy_from_slice(&[r, g, b, 255]);
            return;
        }
        let a = a as u32;
        for (c, src) in [r, g, b].into_iter().enumerate() {
            let dst = self.data[i + c] as u32;
            self.data[i + c] = ((src as u32 * a + dst * (255 - a)) / 255) as u8;
        }
        self.data[i + 3] = 255;
    }

    /// Fill a rectangle with optionally rounded corners.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, radius: u32, rgba: Rgba) {
        let radius = radius.min(width / 2).min(height / 2) as f64;
        for row in 0..height {
            let py = row as f64;
            let h = height as f64;
            let dy = if py < radius {
                radius - py - 0.5
            } else if py >= h - radius {
                py - (h - radius) + 0.5
            } else {
                0.0
            };
            let inset = if dy > 0.0 {
                (radius - (radius * radius - dy * dy).max(0.0).sqrt()).round() as i64
            } else {
                0
            };
            let start = x + inset;
            let end = x + width as i64 - inset;
            for px in start..end {
                self.blend(px, y + row as i64, rgba);
            }
        }
    }

    /// Draw text with the 8x8 bitmap font; each font dot becomes `dot`
    /// device pixels square.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, dot: u32, rgba: Rgba) {
        let dot = dot.max(1) as i64;
        for (i, ch) in text.chars().enumerate() {
            let glyph = glyph(ch);
            let gx = x + i as i64 * 8 * dot;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let ox = gx + col as i64 * dot;
                    let oy = y + row as i64 * dot;
                    for dy in 0..dot {
                        for dx in 0..dot {
                            self.blend(ox + dx, oy + dy, rgba);
                        }
                    }
                }
            }
        }
    }

    /// Scale `img` to cover the target rectangle, cropping the overflow
    /// evenly on both sides. Nearest-neighbour sampling.
    pub fn draw_image(&mut self, img: &DecodedImage, x: i64, y: i64, width: u32, height: u32) {
        if width == 0 || height == 0 || img.width == 0 || img.height == 0 {
            return;
        }
        let s = f64::max(
            width as f64 / img.width as f64,
            height as f64 / img.height as f64,
        );
        let off_x = (img.width as f64 - width as f64 / s) / 2.0;
        let off_y = (img.height as f64 - height as f64 / s) / 2.0;
        for dy in 0..height {
            let sy = (off_y + (dy as f64 + 0.5) / s)
                .floor()
                .clamp(0.0, (img.height - 1) as f64) as u32;
            for dx in 0..width {
                let sx = (off_x + (dx as f64 + 0.5) / s)
                    .floor()
                    .clamp(0.0, (img.width - 1) as f64) as u32;
                let [r, g, b, a] = img.pixel(sx, sy);
                self.blend(x + dx as i64, y + dy as i64, (r, g, b, a));
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        writer.finish()?;
        Ok(out)
    }
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Rasterize paint commands for a `width` x `height` card at `scale`.
///
/// `photo` is drawn wherever a `Photo` command appears; when it is `None`
/// the placeholder painted beneath it stays visible.
pub fn rasterize(
    commands: &[PaintCommand],
    width: u32,
    height: u32,
    scale: u32,
    background: [u8; 3],
    photo: Option<&DecodedImage>,
) -> Result<Screenshot> {
    let scale = scale.max(1);
    let (dev_w, dev_h) = match (width.checked_mul(scale), height.checked_mul(scale)) {
        (Some(w), Some(h)) => (w, h),
        _ => return Err(Error::RenderError("card is too large".into())),
    };
    let mut pixmap = Pixmap::new(dev_w, dev_h, background)?;
    let s = scale as i64;

    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                radius,
                rgba,
            } => pixmap.fill_rect(
                *x as i64 * s,
                *y as i64 * s,
                width * scale,
                height * scale,
                radius * scale,
                *rgba,
            ),
            PaintCommand::Text {
                x,
                y,
                text,
                scale: text_scale,
                rgba,
            } => pixmap.draw_text(*x as i64 * s, *y as i64 * s, text, text_scale * scale, *rgba),
            PaintCommand::Photo {
                x,
                y,
                width,
                height,
            } => {
                if let Some(img) = photo {
                    pixmap.draw_image(
                        img,
                        *x as i64 * s,
                        *y as i64 * s,
                        width * scale,
                        height * scale,
                    );
                }
            }
        }
    }

    let png_data = pixmap.encode_png()?;
    Ok(Screenshot {
        width: dev_w,
        height: dev_h,
        png_data,
    })
}
