//! catalog - product table checks
//!
//! Validates a product table (the built-in one, or a JSON file) and prints
//! the pricing report that is reviewed before a table is deployed.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use be_product_catalog::{PricingReport, ProductCatalog, ReportThresholds};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON product table; the built-in table when omitted
    #[arg(short, long, env = "CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the hard rules every product must satisfy
    Validate,

    /// Validate and apply the pricing heuristics
    Report(ReportArgs),

    /// Count active products per provider and kind
    Summary,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Minimum yearly saving over twelve monthly payments, in percent
    #[arg(long, default_value = "10")]
    min_annual_discount: Decimal,

    /// Lowest acceptable credits per unit of currency for credit packs
    #[arg(long, default_value = "50")]
    min_credits_per_unit: Decimal,

    /// Highest acceptable credits per unit of currency for credit packs
    #[arg(long, default_value = "500")]
    max_credits_per_unit: Decimal,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl ReportArgs {
    fn thresholds(&self) -> ReportThresholds {
        ReportThresholds {
            min_annual_discount_percent: self.min_annual_discount,
            credits_per_unit: self.min_credits_per_unit..=self.max_credits_per_unit,
        }
    }
}

fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_new(&cli.log_level).context("Invalid log level")?)
        .try_init()
        .context("Failed to initialize logging")?;

    let catalog = load_catalog(cli.catalog.as_deref())?;

    let ok = match &cli.command {
        Commands::Validate => {
            let report = catalog.validate();
            print!("{}", render_errors(&report.errors));
            if report.is_valid {
                println!("All {} products are valid", catalog.products().len());
            }
            report.is_valid
        }
        Commands::Report(args) => {
            let report = PricingReport::build(&catalog, &args.thresholds());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_report(&report));
            }
            report.is_ok()
        }
        Commands::Summary => {
            println!("{}", serde_json::to_string_pretty(&catalog.summary())?);
            true
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_catalog(path: Option<&std::path::Path>) -> Result<ProductCatalog> {
    match path {
        Some(path) => ProductCatalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => {
            debug!("No catalog file given, using built-in products");
            Ok(ProductCatalog::default())
        }
    }
}

fn render_errors(errors: &[String]) -> String {
    let mut out = String::new();
    if !errors.is_empty() {
        let _ = writeln!(out, "{} error(s):", errors.len());
        for error in errors {
            let _ = writeln!(out, "  - {error}");
        }
    }
    out
}

fn render_report(report: &PricingReport) -> String {
    let mut out = String::new();

    if !report.plans.is_empty() {
        let _ = writeln!(out, "Subscription tiers:");
        for plan in &report.plans {
            let _ = writeln!(
                out,
                "  {:<12} monthly {:>8}  yearly {:>8}  saves {}%",
                plan.tier, plan.monthly_price, plan.yearly_price, plan.annual_discount_percent
            );
        }
    }

    if !report.packs.is_empty() {
        let _ = writeln!(out, "Credit packs:");
        for pack in &report.packs {
            let _ = writeln!(
                out,
                "  {:<16} {:>8}  {:>7} credits  ({} per unit)",
                pack.internal_id, pack.price, pack.credits, pack.credits_per_unit
            );
        }
    }

    out.push_str(&render_errors(&report.errors));

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "{} warning(s):", report.warnings.len());
        for warning in &report.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    if report.is_ok() {
        let _ = writeln!(out, "Pricing report passed");
    }

    out
}
