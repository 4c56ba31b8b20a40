//! Florista
//!
//! Pricing and social-media preview cards for flower-based products.
//!
//! The workflow has three steps:
//!
//! 1. Work out the cost of a single flower from the price of a dozen
//! 2. Compose a product (name, photo, description, flowers used, sale price)
//!    with live profit and margin feedback
//! 3. Render a preview card and export it as a PNG or share it
//!
//! # Design
//!
//! - **Pure core**: [`pricing`] and [`workflow`] have no side effects
//! - **Ports**: camera, file picker, share sheet and downloads live behind the
//!   traits in [`platform`], so front-ends and tests plug in their own
//! - **Front-ends**: the `florista` binary drives the workflow from the
//!   command line or through the [`console`] session
//!
//! # Example
//!
//! ```
//! use florista::forms::{FlowerForm, ProductForm};
//! use florista::model::ImageAsset;
//! use florista::workflow::{Step, Workflow};
//!
//! let mut wf = Workflow::default();
//! assert!(wf.submit_flower(&FlowerForm::new("Rosa roja", "12.00")));
//!
//! let photo = ImageAsset::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);
//! let product = ProductForm::new("Ramo", "Doce rosas rojas", "50", "12").with_image(photo);
//! assert!(wf.submit_product(&product));
//!
//! assert_eq!(wf.step(), Step::Preview);
//! assert_eq!(wf.financials().unwrap().profit_margin, 76.0);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub mod error;
pub use error::{Error, Result};

pub mod acquire;
pub mod console;
pub mod export;
pub mod forms;
pub mod model;
pub mod platform;
pub mod pricing;
pub mod rendering;
pub mod workflow;

pub use export::{Branding, ExportOutcome, Exporter, PreviewCard};
pub use forms::QuantityPolicy;
pub use platform::CaptureConstraints;
pub use rendering::RenderOptions;
pub use workflow::{Step, Workflow, WorkflowState};

/// Application configuration
///
/// Defaults reproduce the stock behaviour: rear camera at 1280x720 with
/// 0.8 snapshot quality, 2x PNG export on white, fractional flower counts
/// accepted, downloads written to the working directory.
///
/// # Examples
///
/// ```
/// let cfg = florista::StudioConfig::default();
/// assert_eq!(cfg.export.scale, 2);
/// assert_eq!(cfg.capture.width, 1280);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Business name, phone and labels printed on the card
    pub branding: Branding,
    /// Bitmap export settings
    pub export: RenderOptions,
    /// Camera request constraints
    pub capture: CaptureConstraints,
    /// Whether fractional flower counts are accepted
    pub quantity_policy: QuantityPolicy,
    /// Where downloaded cards are written
    pub output_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            export: RenderOptions::default(),
            capture: CaptureConstraints::default(),
            quantity_policy: QuantityPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: StudioConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=8).contains(&self.export.scale) {
            return Err(Error::ConfigError(format!(
                "export.scale must be between 1 and 8, got {}",
                self.export.scale
            )));
        }
        if self.export.card_width == 0 || self.export.card_min_height == 0 {
            return Err(Error::ConfigError("card dimensions must be non-zero".into()));
        }
        if !(self.capture.quality > 0.0 && self.capture.quality <= 1.0) {
            return Err(Error::ConfigError(format!(
                "capture.quality must be in (0, 1], got {}",
                self.capture.quality
            )));
        }
        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::ConfigError("capture resolution must be non-zero".into()));
        }
        Ok(())
    }
}
