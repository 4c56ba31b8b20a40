//! Preview card export: download as PNG or hand to the native share flow.
//!
//! Exporting only ever borrows the finished entities, so a failed render or
//! save leaves the workflow in the preview step with its data intact.

use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::model::{FlowerData, ProductData};
use crate::platform::{Downloader, PlatformApi, ShareRequest, ShareTarget, SharedFile};
use crate::pricing::{format_currency, format_percent};
use crate::rendering::{render_card, CardContent, RenderOptions, Screenshot};
use crate::workflow::WorkflowState;
use crate::{Result, StudioConfig};

/// Static branding printed on every card.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub business_name: String,
    pub phone: String,
    pub price_label: String,
    pub currency_symbol: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            business_name: "Claudia Segura".to_string(),
            phone: "55 4917 1408".to_string(),
            price_label: "Sale price".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// File-name friendly form of a product name: lower case, whitespace runs
/// collapsed to `-`, path and shell-hostile characters dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if ch.is_control() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;
        slug.extend(ch.to_lowercase());
    }
    if slug.is_empty() {
        "product".to_string()
    } else {
        slug
    }
}

/// Step-3 figures, formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product: String,
    pub flower: String,
    pub flowers_used: f64,
    pub unit_cost: String,
    pub total_flower_cost: String,
    pub sale_price: String,
    pub profit: String,
    pub margin: String,
    pub is_loss: bool,
}

/// A finished product ready to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct PreviewCard<'a> {
    flower: &'a FlowerData,
    product: &'a ProductData,
}

impl<'a> PreviewCard<'a> {
    pub fn new(flower: &'a FlowerData, product: &'a ProductData) -> Self {
        Self { flower, product }
    }

    /// Available once the workflow reached the preview step.
    pub fn from_state(state: &'a WorkflowState) -> Option<Self> {
        match state {
            WorkflowState::Preview { flower, product } => Some(Self::new(flower, product)),
            _ => None,
        }
    }

    pub fn product(&self) -> &ProductData {
        self.product
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", slugify(self.product.name()))
    }

    pub fn summary(&self, branding: &Branding) -> ProductSummary {
        let money = |v: f64| format_currency(&branding.currency_symbol, v);
        let f = self.product.financials(self.flower);
        ProductSummary {
            product: self.product.name().to_string(),
            flower: self.flower.name().to_string(),
            flowers_used: self.product.flower_quantity(),
            unit_cost: money(self.flower.unit_price()),
            total_flower_cost: money(f.total_flower_cost),
            sale_price: money(self.product.sale_price()),
            profit: money(f.profit),
            margin: format_percent(f.profit_margin),
            is_loss: f.is_loss(),
        }
    }

    pub fn render(&self, branding: &Branding, options: &RenderOptions) -> Result<Screenshot> {
        let price = format_currency(&branding.currency_symbol, self.product.sale_price());
        let content = CardContent {
            title: self.product.name(),
            description: self.product.description(),
            price_label: &branding.price_label,
            price: &price,
            business_name: &branding.business_name,
            phone: &branding.phone,
            photo: self.product.image(),
        };
        render_card(&content, options)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Saved through the download path
    Downloaded(PathBuf),
    /// Handed to the platform share flow
    Shared,
}

pub struct Exporter {
    share_target: Box<dyn ShareTarget>,
    downloader: Box<dyn Downloader>,
    branding: Branding,
    options: RenderOptions,
}

impl Exporter {
    pub fn new(
        share_target: Box<dyn ShareTarget>,
        downloader: Box<dyn Downloader>,
        branding: Branding,
        options: RenderOptions,
    ) -> Self {
        Self {
            share_target,
            downloader,
            branding,
            options,
        }
    }

    pub fn from_platform(platform: &dyn PlatformApi, config: &StudioConfig) -> Self {
        Self::new(
            platform.share_target(),
            platform.downloader(),
            config.branding.clone(),
            config.export.clone(),
        )
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Rasterize the card and save it as `<slug>.png`.
    pub fn export_file(&self, card: &PreviewCard<'_>) -> Result<ExportOutcome> {
        let shot = card.render(&self.branding, &self.options)?;
        self.download(card, &shot)
    }

    /// Share through the platform when it can share files, otherwise or on
    /// any share failure save the same bitmap as a download.
    pub fn share(&self, card: &PreviewCard<'_>) -> Result<ExportOutcome> {
        if !self.share_target.can_share_files() {
            info!("native sharing unavailable, downloading instead");
            return self.export_file(card);
        }
        let shot = card.render(&self.branding, &self.options)?;
        let request = ShareRequest {
            title: card.product().name().to_string(),
            text: card.product().description().to_string(),
            files: vec![SharedFile {
                name: card.file_name(),
                mime: "image/png".to_string(),
                bytes: shot.png_data.clone(),
            }],
        };
        match self.share_target.share(&request) {
            Ok(()) => {
                info!("shared {}", request.files[0].name);
                Ok(ExportOutcome::Shared)
            }
            Err(e) => {
                warn!("share failed ({}), downloading instead", e);
                self.download(card, &shot)
            }
        }
    }

    fn download(&self, card: &PreviewCard<'_>, shot: &Screenshot) -> Result<ExportOutcome> {
        let path = self.downloader.save(&card.file_name(), &shot.png_data)?;
        info!(
            "saved {}x{} preview to {}",
            shot.width,
            shot.height,
            path.display()
        );
        Ok(ExportOutcome::Downloaded(path))
    }
}
