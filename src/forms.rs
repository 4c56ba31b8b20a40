//! Raw form input for the first two steps and the validation that turns it
//! into [`FlowerData`] / [`ProductData`].
//!
//! Forms hold text exactly as typed. Validation is a query, not an error: an
//! invalid form simply yields `None` and its submit stays disabled.

use serde::Deserialize;

use crate::model::{FlowerData, ImageAsset, ProductData};
use crate::pricing::{compute_financials, parse_amount, unit_price_from_input, Financials};

/// How fractional flower counts are treated at the input boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityPolicy {
    /// Any positive number is accepted, `2.5` included
    #[default]
    Fractional,
    /// Only positive whole numbers are accepted
    Whole,
}

impl QuantityPolicy {
    pub fn accepts(self, quantity: f64) -> bool {
        if !(quantity.is_finite() && quantity > 0.0) {
            return false;
        }
        match self {
            QuantityPolicy::Fractional => true,
            QuantityPolicy::Whole => quantity.fract() == 0.0,
        }
    }
}

/// Step 1 input: which flower and what a dozen costs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowerForm {
    pub name: String,
    pub price_per_dozen: String,
}

impl FlowerForm {
    pub fn new(name: impl Into<String>, price_per_dozen: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_per_dozen: price_per_dozen.into(),
        }
    }

    /// Live unit price shown while typing; `0.0` until the price is valid.
    pub fn unit_price_preview(&self) -> f64 {
        unit_price_from_input(&self.price_per_dozen)
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.unit_price_preview() > 0.0
    }

    pub fn validate(&self) -> Option<FlowerData> {
        let price = parse_amount(&self.price_per_dozen)?;
        FlowerData::new(&self.name, price)
    }
}

/// Step 2 input: the product built from the chosen flower.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub sale_price: String,
    pub flower_quantity: String,
    image: Option<ImageAsset>,
}

impl ProductForm {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        sale_price: impl Into<String>,
        flower_quantity: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            sale_price: sale_price.into(),
            flower_quantity: flower_quantity.into(),
            image: None,
        }
    }

    /// Attach a photo. An empty asset counts as no photo.
    pub fn set_image(&mut self, image: ImageAsset) {
        self.image = if image.is_empty() { None } else { Some(image) };
    }

    pub fn with_image(mut self, image: ImageAsset) -> Self {
        self.set_image(image);
        self
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Parsed quantity, `0.0` when unreadable.
    pub fn quantity(&self) -> f64 {
        parse_amount(&self.flower_quantity).unwrap_or(0.0)
    }

    /// Parsed sale price, `0.0` when unreadable.
    pub fn sale_price(&self) -> f64 {
        parse_amount(&self.sale_price).unwrap_or(0.0)
    }

    /// Profit feedback shown while the user types. Only available once both
    /// the sale price and the quantity are positive.
    pub fn live_financials(&self, flower: &FlowerData) -> Option<Financials> {
        let sale_price = self.sale_price();
        let quantity = self.quantity();
        if sale_price > 0.0 && quantity > 0.0 {
            Some(compute_financials(quantity, flower.unit_price(), sale_price))
        } else {
            None
        }
    }

    pub fn quantity_hint(flower: &FlowerData) -> String {
        format!(
            "Number of {}s you will use for this product",
            flower.name().to_lowercase()
        )
    }

    pub fn is_valid(&self, policy: QuantityPolicy) -> bool {
        self.validate(policy).is_some()
    }

    pub fn validate(&self, policy: QuantityPolicy) -> Option<ProductData> {
        let image = self.image.clone()?;
        let quantity = self.quantity();
        if !policy.accepts(quantity) {
            return None;
        }
        ProductData::new(
            &self.name,
            image,
            &self.description,
            self.sale_price(),
            quantity,
        )
    }
}
