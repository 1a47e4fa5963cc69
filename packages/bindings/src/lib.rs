use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use rental_yield_core::investment::{self, DealInput, InvestmentInputs, ProjectionInput};
use rental_yield_core::regions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

/// Bare metrics, no envelope.
#[napi]
pub fn compute_investment(input_json: String) -> NapiResult<String> {
    let input: InvestmentInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::compute_investment(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_investment(input_json: String) -> NapiResult<String> {
    let input: InvestmentInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::analyze_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: DealInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::analyze_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flow(input_json: String) -> NapiResult<String> {
    let input: ProjectionInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = investment::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RegionQuery {
    region: String,
}

#[napi]
pub fn region_tax_rate(input_json: String) -> NapiResult<String> {
    let query: RegionQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = regions::resolve_tax_rate(&query.region);
    serde_json::to_string(&output).map_err(to_napi_error)
}
