//! Preview card rendering: layout, paint commands, rasterization to PNG.

pub mod decode;
pub mod layout;
pub mod paint;
pub mod raster;

use log::warn;
use serde::Deserialize;

use crate::model::ImageAsset;
use crate::Result;

/// A rasterized card.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    pub fn to_image_asset(&self) -> ImageAsset {
        ImageAsset::new("image/png", self.png_data.clone())
    }
}

/// Bitmap export settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Device pixels per card pixel
    pub scale: u32,
    /// Opaque fill behind the card's rounded corners
    pub background: [u8; 3],
    pub card_width: u32,
    pub card_min_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            background: [255, 255, 255],
            card_width: 400,
            card_min_height: 500,
        }
    }
}

/// Everything printed on the card, already formatted.
#[derive(Debug, Clone, Copy)]
pub struct CardContent<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub price_label: &'a str,
    pub price: &'a str,
    pub business_name: &'a str,
    pub phone: &'a str,
    pub photo: &'a ImageAsset,
}

/// Lay out, paint and rasterize a card.
///
/// A photo that cannot be decoded is not fatal: the card is rendered with a
/// placeholder where the photo would go.
pub fn render_card(content: &CardContent<'_>, options: &RenderOptions) -> Result<Screenshot> {
    let card = layout::layout_card(content, options);
    let commands = paint::paint_card(&card);
    let photo = match decode::decode_photo(content.photo) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("drawing placeholder instead of product photo: {}", e);
            None
        }
    };
    raster::rasterize(
        &commands,
        card.width,
        card.height,
        options.scale,
        options.background,
        photo.as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_placeholder_photo() {
        let photo = ImageAsset::new("image/heic", vec![1, 2, 3]);
        let content = CardContent {
            title: "Ramo",
            description: "Doce rosas",
            price_label: "Sale price",
            price: "$50.00",
            business_name: "Claudia Segura",
            phone: "55 4917 1408",
            photo: &photo,
        };
        let shot = render_card(&content, &RenderOptions::default()).unwrap();
        assert_eq!(shot.width, 800);
        assert!(shot.height >= 1000);
        assert_eq!(shot.to_image_asset().mime(), "image/png");
    }
}
