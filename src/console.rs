//! Line-oriented terminal front-end.
//!
//! The session only renders a projection of the [`Workflow`] state and turns
//! what the user types into forms and transition requests. Typing `:back` at
//! any step-2 prompt returns to step 1; end of input ends the session.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::acquire::ImageAcquisition;
use crate::export::{ExportOutcome, Exporter, PreviewCard};
use crate::forms::{FlowerForm, ProductForm};
use crate::model::ImageAsset;
use crate::platform::PlatformApi;
use crate::pricing::{format_currency, format_percent};
use crate::workflow::{Step, Workflow};
use crate::{Result, StudioConfig};

const BACK: &str = ":back";

enum Field {
    Value(String),
    Back,
    Eof,
}

pub struct ConsoleSession<R, W> {
    input: R,
    output: W,
    workflow: Workflow,
    acquisition: ImageAcquisition,
    exporter: Exporter,
    currency: String,
}

impl<R: BufRead, W: Write> ConsoleSession<R, W> {
    pub fn new(input: R, output: W, platform: &dyn PlatformApi, config: &StudioConfig) -> Self {
        Self {
            input,
            output,
            workflow: Workflow::new(config.quantity_policy),
            acquisition: ImageAcquisition::new(
                platform.camera(),
                platform.file_picker(),
                config.capture.clone(),
            ),
            exporter: Exporter::from_platform(platform, config),
            currency: config.branding.currency_symbol.clone(),
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Run until the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Florista - price calculator")?;
        loop {
            self.progress()?;
            let keep_going = match self.workflow.step() {
                Step::CostCalculation => self.cost_step()?,
                Step::ProductCreation => self.product_step()?,
                Step::Preview => self.preview_step()?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn progress(&mut self) -> Result<()> {
        let step = self.workflow.step();
        let dots: String = (1..=3)
            .map(|n| if step.is_reached(n) { '●' } else { '○' })
            .collect();
        writeln!(self.output, "\n{}  {}", dots, step)?;
        Ok(())
    }

    fn money(&self, value: f64) -> String {
        format_currency(&self.currency, value)
    }

    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn field(&mut self, label: &str) -> Result<Field> {
        Ok(match self.read_line(label)? {
            None => Field::Eof,
            Some(v) if v.trim() == BACK => Field::Back,
            Some(v) => Field::Value(v),
        })
    }

    fn cost_step(&mut self) -> Result<bool> {
        let Some(name) = self.read_line("Flower name")? else {
            return Ok(false);
        };
        let Some(price) = self.read_line("Price per dozen")? else {
            return Ok(false);
        };
        let form = FlowerForm::new(name, price);
        let unit = form.unit_price_preview();
        if unit > 0.0 {
            let unit = self.money(unit);
            writeln!(self.output, "Unit price: {} per flower", unit)?;
        }
        if !self.workflow.submit_flower(&form) {
            writeln!(
                self.output,
                "Enter a flower name and a price per dozen greater than 0."
            )?;
        }
        Ok(true)
    }

    fn product_step(&mut self) -> Result<bool> {
        let Some(flower) = self.workflow.state().flower().cloned() else {
            return Ok(true);
        };
        let unit_cost = self.money(flower.unit_price());
        writeln!(
            self.output,
            "{} - unit cost: {}  (type {} to go back)",
            flower.name(),
            unit_cost,
            BACK
        )?;

        let name = match self.field("Product name")? {
            Field::Value(v) => v,
            other => return Ok(self.leave(other)),
        };
        let mut form = ProductForm::new(name, "", "", "");
        loop {
            let source = match self.field("Photo (camera or image file path)")? {
                Field::Value(v) => v,
                other => return Ok(self.leave(other)),
            };
            if let Some(photo) = self.acquire_photo(source.trim())? {
                writeln!(self.output, "Photo ready ({}).", photo.mime())?;
                form.set_image(photo);
                break;
            }
        }
        form.description = match self.field("Description")? {
            Field::Value(v) => v,
            other => return Ok(self.leave(other)),
        };
        let quantity_label = format!("Flowers used ({})", ProductForm::quantity_hint(&flower));
        form.flower_quantity = match self.field(&quantity_label)? {
            Field::Value(v) => v,
            other => return Ok(self.leave(other)),
        };
        form.sale_price = match self.field("Sale price")? {
            Field::Value(v) => v,
            other => return Ok(self.leave(other)),
        };

        if let Some(f) = form.live_financials(&flower) {
            let cost = self.money(f.total_flower_cost);
            let profit = self.money(f.profit);
            writeln!(
                self.output,
                "Flowers used: {} units | Flower cost: {}",
                form.quantity(),
                cost
            )?;
            writeln!(
                self.output,
                "Profit: {}{} | Margin: {}",
                profit,
                if f.is_loss() { " (loss)" } else { "" },
                format_percent(f.profit_margin)
            )?;
        }

        if !self.workflow.submit_product(&form) {
            writeln!(
                self.output,
                "Every field is required: name, photo, description, a quantity and a \
                 sale price greater than 0."
            )?;
        }
        Ok(true)
    }

    /// Handle `:back` or end of input in the middle of step 2.
    fn leave(&mut self, field: Field) -> bool {
        match field {
            Field::Back => {
                self.workflow.back();
                true
            }
            Field::Eof => false,
            Field::Value(_) => true,
        }
    }

    /// `None` means no photo yet; the reason has already been shown.
    fn acquire_photo(&mut self, source: &str) -> Result<Option<ImageAsset>> {
        if source.is_empty() {
            return Ok(None);
        }
        if source.eq_ignore_ascii_case("camera") {
            if let Err(e) = self.acquisition.open_camera() {
                writeln!(self.output, "{}", e)?;
                return Ok(None);
            }
            let answer = self.read_line("Press enter to capture, or type :cancel")?;
            if answer.as_deref().map(str::trim) != Some("") {
                self.acquisition.dismiss_camera();
                return Ok(None);
            }
            return match self.acquisition.capture() {
                Ok(photo) => Ok(Some(photo)),
                Err(e) => {
                    writeln!(self.output, "{}", e)?;
                    Ok(None)
                }
            };
        }
        match self.acquisition.pick_file(Some(Path::new(source))) {
            Ok(Some(photo)) => Ok(Some(photo)),
            Ok(None) => {
                writeln!(self.output, "No photo selected.")?;
                Ok(None)
            }
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                Ok(None)
            }
        }
    }

    fn preview_step(&mut self) -> Result<bool> {
        let summary = match PreviewCard::from_state(self.workflow.state()) {
            Some(card) => card.summary(self.exporter.branding()),
            None => return Ok(true),
        };
        writeln!(self.output, "{}", summary.product)?;
        writeln!(
            self.output,
            "  Flowers used ({}): {} units",
            summary.flower, summary.flowers_used
        )?;
        writeln!(self.output, "  Unit cost:          {}", summary.unit_cost)?;
        writeln!(self.output, "  Total flower cost:  {}", summary.total_flower_cost)?;
        writeln!(self.output, "  Sale price:         {}", summary.sale_price)?;
        writeln!(self.output, "  Profit:             {}", summary.profit)?;
        writeln!(self.output, "  Margin:             {}", summary.margin)?;

        let Some(choice) = self.read_line("[s]hare, [d]ownload, [n]ew product, [q]uit")? else {
            return Ok(false);
        };
        match choice.trim().to_ascii_lowercase().as_str() {
            "s" | "share" | "d" | "download" => {
                let share = choice.trim().starts_with(['s', 'S']);
                let result = match PreviewCard::from_state(self.workflow.state()) {
                    Some(card) if share => self.exporter.share(&card),
                    Some(card) => self.exporter.export_file(&card),
                    None => return Ok(true),
                };
                match result {
                    Ok(ExportOutcome::Downloaded(path)) => {
                        writeln!(self.output, "Saved {}", path.display())?
                    }
                    Ok(ExportOutcome::Shared) => writeln!(self.output, "Shared.")?,
                    Err(e) => writeln!(self.output, "Could not generate the image: {}", e)?,
                }
            }
            "n" | "new" => {
                self.workflow.reset();
            }
            "q" | "quit" => return Ok(false),
            _ => writeln!(self.output, "Unknown choice.")?,
        }
        Ok(true)
    }
}
