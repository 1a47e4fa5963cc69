use std::time::Instant;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::calculator::{compute_investment, InvestmentInputs, InvestmentResult};
use super::projection::{
    project_cash_flow, validate_horizon, ProjectionPoint, DEFAULT_HORIZON_YEARS,
};
#[cfg(feature = "regions")]
use crate::regions::resolve_tax_rate;
use crate::types::{with_metadata, ComputationOutput, RegionTaxRate};
use crate::RentalYieldResult;

const HIGH_LEVERAGE_THRESHOLD: Decimal = dec!(0.80);
const MAX_MODELLED_TERM_YEARS: Decimal = dec!(40);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A full deal: investment inputs plus projection horizon and locality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealInput {
    #[serde(flatten)]
    pub inputs: InvestmentInputs,
    /// Years to project (default 10)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_years: Option<i32>,
    /// Locality whose transfer-tax rate replaces `tax_rate`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Investment metrics, the projected cash-flow series and the resolved
/// locality rate, if one was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub investment: InvestmentResult,
    pub projection: Vec<ProjectionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionTaxRate>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute investment metrics and wrap them with warnings and metadata.
///
/// Warnings flag unusual inputs and unprofitable outcomes; they never change
/// the numbers.
pub fn analyze_investment(
    input: &InvestmentInputs,
) -> RentalYieldResult<ComputationOutput<InvestmentResult>> {
    investment_envelope(input.clone(), Vec::new())
}

/// Same as [`analyze_investment`] with `tax_rate` replaced by the locality's
/// transfer-tax rate. An unknown locality falls back to the default rate and
/// adds a warning.
pub fn analyze_investment_in_region(
    input: &InvestmentInputs,
    region: &str,
) -> RentalYieldResult<ComputationOutput<InvestmentResult>> {
    let mut warnings: Vec<String> = Vec::new();
    let mut inputs = input.clone();
    if let Some(r) = resolve_region(region, &mut warnings) {
        inputs.tax_rate = r.tax_rate;
    }
    investment_envelope(inputs, warnings)
}

fn investment_envelope(
    inputs: InvestmentInputs,
    mut warnings: Vec<String>,
) -> RentalYieldResult<ComputationOutput<InvestmentResult>> {
    let start = Instant::now();

    input_warnings(&inputs, &mut warnings);
    let result = compute_investment(&inputs);
    result_warnings(&result, &mut warnings);

    log::debug!(
        "investment computed: total cost {}, monthly cash flow {}",
        result.total_purchase_cost,
        result.monthly_cash_flow
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Investment Profitability (averaged loan split)",
        &inputs,
        warnings,
        elapsed,
        result,
    ))
}

/// Run the full pipeline: locality rate, investment metrics, then a
/// cash-flow projection grown at the appreciation rate.
pub fn analyze_deal(deal: &DealInput) -> RentalYieldResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let horizon_years = deal.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS);
    validate_horizon(horizon_years)?;

    let mut inputs = deal.inputs.clone();
    let region = match deal.region.as_deref() {
        Some(name) => resolve_region(name, &mut warnings),
        None => None,
    };
    if let Some(ref r) = region {
        inputs.tax_rate = r.tax_rate;
    }

    input_warnings(&inputs, &mut warnings);
    let investment = compute_investment(&inputs);
    result_warnings(&investment, &mut warnings);

    if horizon_years <= 0 {
        warnings.push(format!(
            "Horizon of {horizon_years} years produces an empty projection"
        ));
    }
    let projection = project_cash_flow(
        investment.monthly_cash_flow,
        inputs.annual_appreciation_rate,
        horizon_years,
    );

    log::debug!(
        "deal analysed: {} projection years, region {:?}",
        projection.len(),
        region.as_ref().map(|r| r.region.as_str())
    );

    let output = DealAnalysis {
        investment,
        projection,
        region,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Investment Profitability with Cash-Flow Projection",
        deal,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

#[cfg(feature = "regions")]
fn resolve_region(name: &str, warnings: &mut Vec<String>) -> Option<RegionTaxRate> {
    let resolved = resolve_tax_rate(name);
    if resolved.is_fallback {
        warnings.push(format!(
            "Region '{}' not recognised — default tax rate {:.1}% applied",
            resolved.region,
            resolved.tax_rate * dec!(100)
        ));
    }
    Some(resolved)
}

#[cfg(not(feature = "regions"))]
fn resolve_region(name: &str, warnings: &mut Vec<String>) -> Option<RegionTaxRate> {
    warnings.push(format!(
        "Region '{name}' ignored — built without regional tax rates"
    ));
    None
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn input_warnings(input: &InvestmentInputs, warnings: &mut Vec<String>) {
    let money_fields = [
        ("purchase_price", input.purchase_price),
        ("closing_costs", input.closing_costs),
        ("mortgage_setup_costs", input.mortgage_setup_costs),
        ("renovation_cost", input.renovation_cost),
        ("agent_commission", input.agent_commission),
        ("furniture_cost", input.furniture_cost),
        ("monthly_rent", input.monthly_rent),
        ("annual_property_tax", input.annual_property_tax),
        ("annual_insurance", input.annual_insurance),
        ("annual_community_fees", input.annual_community_fees),
        ("annual_maintenance", input.annual_maintenance),
        ("annual_vacancy_loss", input.annual_vacancy_loss),
    ];
    for (field, value) in money_fields {
        if value < Decimal::ZERO {
            warnings.push(format!("{field} is negative ({value}) — results may be meaningless"));
        }
    }

    if input.tax_rate < Decimal::ZERO || input.tax_rate > Decimal::ONE {
        warnings.push(format!(
            "Tax rate {} is outside 0–1 — expected a fraction, not a percentage",
            input.tax_rate
        ));
    }

    if input.financed_fraction < Decimal::ZERO || input.financed_fraction > Decimal::ONE {
        warnings.push(format!(
            "Financed fraction {} is outside 0–1",
            input.financed_fraction
        ));
    } else if input.financed_fraction > HIGH_LEVERAGE_THRESHOLD {
        warnings.push(format!(
            "Financing {:.1}% of the price exceeds 80% — high leverage",
            input.financed_fraction * dec!(100)
        ));
    }

    if input.loan_term_years > MAX_MODELLED_TERM_YEARS {
        warnings.push(format!(
            "Loan term of {} years exceeds 40 — beyond typical mortgage terms",
            input.loan_term_years
        ));
    }
}

fn result_warnings(result: &InvestmentResult, warnings: &mut Vec<String>) {
    if result.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative monthly cash flow of {:.2} — rent does not cover loan payment and expenses",
            result.monthly_cash_flow
        ));
    }
    if result.equity_required <= Decimal::ZERO {
        warnings.push(
            "No equity required — cash-on-cash, ROCE and total return reported as 0".into(),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
