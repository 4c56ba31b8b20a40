use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use florista::acquire::ImageAcquisition;
use florista::console::ConsoleSession;
use florista::export::{ExportOutcome, Exporter, PreviewCard};
use florista::forms::{FlowerForm, ProductForm};
use florista::platform::{DesktopPlatform, PlatformApi};
use florista::pricing::{
    compute_financials, format_currency, format_percent, parse_amount, unit_price_from_input,
};
use florista::{StudioConfig, Workflow};

#[derive(Parser)]
#[command(name = "florista", version, about = "Price flower products and generate preview cards")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cost of a single flower from the price of a dozen
    UnitPrice {
        price_per_dozen: String,
    },
    /// Flower cost, profit and margin for a product
    Quote {
        #[arg(
            long,
            conflicts_with = "price_per_dozen",
            required_unless_present = "price_per_dozen"
        )]
        unit_price: Option<String>,
        #[arg(long)]
        price_per_dozen: Option<String>,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        sale_price: String,
        #[arg(long)]
        json: bool,
    },
    /// Run all three steps and export the preview card
    Preview {
        #[arg(long)]
        flower: String,
        #[arg(long)]
        price_per_dozen: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        description: String,
        #[arg(long)]
        sale_price: String,
        #[arg(long)]
        quantity: String,
        /// Try the native share flow before downloading
        #[arg(long)]
        share: bool,
        /// Overrides `output_dir` from the configuration
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Step through the workflow interactively
    Interactive,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<StudioConfig> {
    match path {
        Some(p) => StudioConfig::load(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(StudioConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = load_config(cli.config.as_ref())?;
    let symbol = config.branding.currency_symbol.clone();

    match cli.command {
        Command::UnitPrice { price_per_dozen } => {
            let unit = unit_price_from_input(&price_per_dozen);
            if unit <= 0.0 {
                bail!("price per dozen must be a number greater than 0");
            }
            println!("{}", format_currency(&symbol, unit));
        }
        Command::Quote {
            unit_price,
            price_per_dozen,
            quantity,
            sale_price,
            json,
        } => {
            let unit = match (unit_price, price_per_dozen) {
                (Some(u), _) => parse_amount(&u).unwrap_or(0.0),
                (None, Some(p)) => unit_price_from_input(&p),
                (None, None) => 0.0,
            };
            let quantity = parse_amount(&quantity).unwrap_or(0.0);
            let sale = parse_amount(&sale_price).unwrap_or(0.0);
            let f = compute_financials(quantity, unit, sale);
            if json {
                println!("{}", serde_json::to_string_pretty(&f)?);
            } else {
                println!("Flower cost: {}", format_currency(&symbol, f.total_flower_cost));
                println!("Profit:      {}", format_currency(&symbol, f.profit));
                println!("Margin:      {}", format_percent(f.profit_margin));
            }
        }
        Command::Preview {
            flower,
            price_per_dozen,
            product,
            image,
            description,
            sale_price,
            quantity,
            share,
            out,
            json,
        } => {
            if let Some(out) = out {
                config.output_dir = out;
            }
            let platform = DesktopPlatform::new(Some(image.clone()), config.output_dir.clone());
            let mut workflow = Workflow::new(config.quantity_policy);

            if !workflow.submit_flower(&FlowerForm::new(flower, price_per_dozen)) {
                bail!("flower name is required and price per dozen must be greater than 0");
            }

            let acquisition = ImageAcquisition::new(
                platform.camera(),
                platform.file_picker(),
                config.capture.clone(),
            );
            let photo = acquisition
                .pick_file(None)?
                .with_context(|| format!("no image at {}", image.display()))?;
            let form =
                ProductForm::new(product, description, sale_price, quantity).with_image(photo);
            if !workflow.submit_product(&form) {
                bail!(
                    "product name, description, a quantity and a sale price greater than 0 \
                     are required"
                );
            }

            let card = PreviewCard::from_state(workflow.state()).context("preview not reached")?;
            let exporter = Exporter::from_platform(&platform, &config);
            let outcome = if share {
                exporter.share(&card)?
            } else {
                exporter.export_file(&card)?
            };

            let summary = card.summary(exporter.branding());
            if json {
                let saved = match &outcome {
                    ExportOutcome::Downloaded(path) => Some(path.display().to_string()),
                    ExportOutcome::Shared => None,
                };
                let doc = serde_json::json!({ "summary": summary, "saved": saved });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{}", summary.product);
                println!("  Flowers used ({}): {} units", summary.flower, summary.flowers_used);
                println!("  Unit cost:          {}", summary.unit_cost);
                println!("  Total flower cost:  {}", summary.total_flower_cost);
                println!("  Sale price:         {}", summary.sale_price);
                println!("  Profit:             {}", summary.profit);
                println!("  Margin:             {}", summary.margin);
                match outcome {
                    ExportOutcome::Downloaded(path) => println!("Saved {}", path.display()),
                    ExportOutcome::Shared => println!("Shared"),
                }
            }
        }
        Command::Interactive => {
            let platform = DesktopPlatform::new(None, config.output_dir.clone());
            let stdin = io::stdin();
            let stdout = BufWriter::new(io::stdout());
            let mut session = ConsoleSession::new(stdin.lock(), stdout, &platform, &config);
            session.run()?;
        }
    }
    Ok(())
}
