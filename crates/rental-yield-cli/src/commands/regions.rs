use clap::Args;
use serde_json::{json, Value};

use rental_yield_core::regions;

/// Arguments for a regional tax-rate lookup
#[derive(Args)]
pub struct TaxRateArgs {
    /// Region name or alias (e.g. "Madrid", "Euskadi"); lists all when omitted
    #[arg(long)]
    pub region: Option<String>,
}

pub fn run_tax_rate(args: TaxRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.region {
        Some(ref name) => Ok(serde_json::to_value(regions::resolve_tax_rate(name))?),
        None => Ok(json!({
            "default_tax_rate": regions::DEFAULT_TAX_RATE,
            "regions": regions::regions(),
        })),
    }
}
