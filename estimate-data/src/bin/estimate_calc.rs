use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use estimate_core::EstimateCalculator;
use estimate_data::logging::init_logging;
use estimate_data::{CatalogLoader, DraftFile, render};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Construction estimate calculator.
///
/// Reads a draft estimate from a TOML file, prices product lines from an
/// optional catalog, resolves every derived amount and prints the breakdown.
#[derive(Debug, Parser)]
#[command(name = "estimate-calc", version)]
struct Cli {
    /// Draft estimate file (TOML).
    draft: PathBuf,

    /// Product catalog CSV used to fill in missing unit prices on
    /// product-linked lines.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tax rate override, e.g. `0.10`. Defaults to the draft's `[config]`.
    #[arg(long)]
    tax_rate: Option<Decimal>,

    /// Print the full calculation result as JSON.
    #[arg(long, conflicts_with = "payload")]
    json: bool,

    /// Print the save payload (JSON) instead of the breakdown.
    #[arg(long)]
    payload: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_file.as_deref())?;

    let mut file = DraftFile::read(&cli.draft)?;
    if let Some(tax_rate) = cli.tax_rate {
        file.config.tax_rate = tax_rate;
    }
    let calculator = EstimateCalculator::new(file.config.clone())
        .with_context(|| format!("invalid configuration in '{}'", cli.draft.display()))?;

    let mut draft = file.estimate;
    debug!(sections = draft.sections.len(), "draft loaded");

    if let Some(path) = &cli.catalog {
        let reader = File::open(path)
            .with_context(|| format!("cannot open catalog '{}'", path.display()))?;
        let catalog = CatalogLoader::load(reader)
            .with_context(|| format!("cannot load catalog '{}'", path.display()))?;
        let seeded = draft.seed_prices(&catalog);
        info!(products = catalog.len(), seeded, "catalog prices applied");
    }

    if cli.payload {
        let payload = draft.to_payload(&calculator)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let result = draft.compute(&calculator);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result));
    }

    Ok(())
}
