//! Entities collected by the workflow steps.
//!
//! `FlowerData` and `ProductData` have private fields and are only built by
//! the step forms once their input validates, so holding one means the data
//! is complete. Both are immutable after construction.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pricing::{compute_financials, compute_unit_price, Financials};
use crate::{Error, Result};

/// Flower bought in bulk, priced per dozen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowerData {
    name: String,
    price_per_dozen: f64,
    unit_price: f64,
}

impl FlowerData {
    /// Returns `None` unless the trimmed name is non-empty and the price
    /// yields a positive unit price.
    pub(crate) fn new(name: &str, price_per_dozen: f64) -> Option<Self> {
        let name = name.trim();
        let unit_price = compute_unit_price(price_per_dozen);
        if name.is_empty() || unit_price <= 0.0 {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            price_per_dozen,
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_per_dozen(&self) -> f64 {
        self.price_per_dozen
    }

    /// Always `price_per_dozen / 12`.
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }
}

/// A sellable product made from the flower entered in the first step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductData {
    name: String,
    image: ImageAsset,
    description: String,
    sale_price: f64,
    flower_quantity: f64,
}

impl ProductData {
    pub(crate) fn new(
        name: &str,
        image: ImageAsset,
        description: &str,
        sale_price: f64,
        flower_quantity: f64,
    ) -> Option<Self> {
        let name = name.trim();
        let description = description.trim();
        let valid = !name.is_empty()
            && !image.is_empty()
            && !description.is_empty()
            && sale_price.is_finite()
            && sale_price > 0.0
            && flower_quantity.is_finite()
            && flower_quantity > 0.0;
        if !valid {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            image,
            description: description.to_string(),
            sale_price,
            flower_quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &ImageAsset {
        &self.image
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price
    }

    pub fn flower_quantity(&self) -> f64 {
        self.flower_quantity
    }

    pub fn financials(&self, flower: &FlowerData) -> Financials {
        compute_financials(self.flower_quantity, flower.unit_price(), self.sale_price)
    }
}

/// An encoded image (JPEG, PNG, ...) together with its media type.
///
/// This is the opaque handle both image sources produce. It serializes as a
/// `data:` URI.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    mime: String,
    bytes: Vec<u8>,
}

impl ImageAsset {
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

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Parse a base64 `data:` URI such as `data:image/jpeg;base64,/9j/...`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::DecodeError("not a data URI".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::DecodeError("data URI has no payload".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::DecodeError("only base64 data URIs are supported".into()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::DecodeError(format!("invalid base64 payload: {}", e)))?;
        Ok(Self::new(mime, bytes))
    }
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ImageAsset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImageAsset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        ImageAsset::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> ImageAsset {
        ImageAsset::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn flower_trims_and_derives_unit_price() {
        let f = FlowerData::new("  Rosa roja ", 18.0).unwrap();
        assert_eq!(f.name(), "Rosa roja");
        assert_eq!(f.price_per_dozen(), 18.0);
        assert_eq!(f.unit_price(), 1.5);
    }

    #[test]
    fn flower_rejects_blank_name_or_price() {
        assert!(FlowerData::new("   ", 12.0).is_none());
        assert!(FlowerData::new("Tulip", 0.0).is_none());
        assert!(FlowerData::new("Tulip", -1.0).is_none());
    }

    #[test]
    fn product_requires_every_field() {
        assert!(ProductData::new("Ramo", photo(), "Doce rosas", 50.0, 12.0).is_some());
        assert!(ProductData::new(" ", photo(), "Doce rosas", 50.0, 12.0).is_none());
        let empty = ImageAsset::new("image/png", vec![]);
        assert!(ProductData::new("Ramo", empty, "x", 50.0, 12.0).is_none());
        assert!(ProductData::new("Ramo", photo(), "\n", 50.0, 12.0).is_none());
        assert!(ProductData::new("Ramo", photo(), "x", 0.0, 12.0).is_none());
        assert!(ProductData::new("Ramo", photo(), "x", 50.0, 0.0).is_none());
    }

    #[test]
    fn product_financials_use_flower_unit_price() {
        let flower = FlowerData::new("Rosa", 12.0).unwrap();
        let product = ProductData::new("Ramo", photo(), "Doce rosas", 50.0, 12.0).unwrap();
        let f = product.financials(&flower);
        assert_eq!(f.total_flower_cost, 12.0);
        assert_eq!(f.profit, 38.0);
    }

    #[test]
    fn data_uri_codec() {
        let uri = photo().to_data_uri();
        assert_eq!(uri, "data:image/jpeg;base64,/9j/4A==");
        assert_eq!(ImageAsset::from_data_uri(&uri).unwrap(), photo());
        assert!(ImageAsset::from_data_uri("image/jpeg;base64,AAAA").is_err());
        assert!(ImageAsset::from_data_uri("data:image/png,raw").is_err());
    }

    #[test]
    fn debug_hides_payload() {
        let dbg = format!("{:?}", photo());
        assert!(dbg.contains("len: 4"));
    }
}
