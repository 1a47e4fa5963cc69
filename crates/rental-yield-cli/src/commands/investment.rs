use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_yield_core::investment::{
    analysis, projection, DealInput, InvestmentInputs, ProjectionInput, DEFAULT_HORIZON_YEARS,
};

use crate::input;

/// Individual investment assumptions. Any flag given overrides the value
/// from `--input` or stdin.
#[derive(Args, Debug, Default)]
pub struct InvestmentFlags {
    /// Purchase price of the property
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Transfer tax as a fraction of price (e.g. 0.10 for 10%)
    #[arg(long, conflicts_with = "region")]
    pub tax_rate: Option<Decimal>,

    /// Locality whose transfer-tax rate is applied (e.g. "Madrid")
    #[arg(long)]
    pub region: Option<String>,

    /// Notary, registry and other closing costs
    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    /// Mortgage arrangement and valuation fees
    #[arg(long)]
    pub mortgage_setup_costs: Option<Decimal>,

    /// Renovation budget
    #[arg(long)]
    pub renovation_cost: Option<Decimal>,

    /// Agent commission paid on purchase
    #[arg(long)]
    pub agent_commission: Option<Decimal>,

    /// Furniture and fit-out
    #[arg(long)]
    pub furniture_cost: Option<Decimal>,

    /// Expected monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Annual appreciation / rent growth (e.g. 0.02 for 2%)
    #[arg(long, alias = "growth-rate")]
    pub appreciation_rate: Option<Decimal>,

    /// Fraction of the price financed (e.g. 0.8 for 80%)
    #[arg(long, alias = "ltv")]
    pub financed_fraction: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term_years: Option<Decimal>,

    /// Annual mortgage interest rate (e.g. 0.035 for 3.5%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Annual property tax (IBI)
    #[arg(long)]
    pub property_tax: Option<Decimal>,

    /// Annual insurance premium
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Annual community / HOA fees
    #[arg(long)]
    pub community_fees: Option<Decimal>,

    /// Annual maintenance budget
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// Annual allowance for vacancy and unpaid rent
    #[arg(long)]
    pub vacancy_loss: Option<Decimal>,
}

/// Arguments for investment metrics
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InvestArgs {
    #[command(flatten)]
    pub flags: InvestmentFlags,

    /// Path to JSON/YAML input file with investment assumptions
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a cash-flow projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectArgs {
    /// Monthly cash flow in year 1
    #[arg(long)]
    pub monthly_cash_flow: Option<Decimal>,

    /// Annual growth applied to cash flow (may be negative)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Projection horizon in years
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    pub years: i32,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a full deal analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub flags: InvestmentFlags,

    /// Projection horizon in years (default 10)
    #[arg(long)]
    pub years: Option<i32>,

    /// Path to JSON/YAML input file with the deal
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_invest(args: InvestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut inputs: InvestmentInputs = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        required_inputs(&args.flags)?
    };
    apply_flags(&mut inputs, &args.flags);

    invest_output(&inputs, args.flags.region.as_deref())
}

/// `--region` routes through the core so the rate is resolved exactly once.
fn invest_output(
    inputs: &InvestmentInputs,
    region: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let result = match region {
        Some(name) => analysis::analyze_investment_in_region(inputs, name)?,
        None => analysis::analyze_investment(inputs)?,
    };
    Ok(serde_json::to_value(result)?)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input: ProjectionInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ProjectionInput {
            base_monthly_cash_flow: args
                .monthly_cash_flow
                .ok_or("--monthly-cash-flow is required (or provide --input)")?,
            annual_growth_rate: args.growth_rate.unwrap_or(Decimal::ZERO),
            horizon_years: args.years,
        }
    };
    let result = projection::build_projection(&proj_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut deal: DealInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DealInput {
            inputs: required_inputs(&args.flags)?,
            ..Default::default()
        }
    };
    apply_deal_flags(&mut deal, &args.flags, args.years);

    let result = analysis::analyze_deal(&deal)?;
    Ok(serde_json::to_value(result)?)
}

// ---------------------------------------------------------------------------
// Flag handling
// ---------------------------------------------------------------------------

/// Minimal inputs when neither a file nor stdin was supplied.
fn required_inputs(
    flags: &InvestmentFlags,
) -> Result<InvestmentInputs, Box<dyn std::error::Error>> {
    Ok(InvestmentInputs {
        purchase_price: flags
            .purchase_price
            .ok_or("--purchase-price is required (or provide --input)")?,
        monthly_rent: flags
            .monthly_rent
            .ok_or("--monthly-rent is required (or provide --input)")?,
        ..Default::default()
    })
}

/// Overlay explicit flags onto loaded inputs. `--region` is left to the
/// analysis functions.
fn apply_flags(inputs: &mut InvestmentInputs, flags: &InvestmentFlags) {
    let overrides = [
        (&mut inputs.purchase_price, flags.purchase_price),
        (&mut inputs.tax_rate, flags.tax_rate),
        (&mut inputs.closing_costs, flags.closing_costs),
        (&mut inputs.mortgage_setup_costs, flags.mortgage_setup_costs),
        (&mut inputs.renovation_cost, flags.renovation_cost),
        (&mut inputs.agent_commission, flags.agent_commission),
        (&mut inputs.furniture_cost, flags.furniture_cost),
        (&mut inputs.monthly_rent, flags.monthly_rent),
        (&mut inputs.annual_appreciation_rate, flags.appreciation_rate),
        (&mut inputs.financed_fraction, flags.financed_fraction),
        (&mut inputs.loan_term_years, flags.loan_term_years),
        (&mut inputs.annual_interest_rate, flags.interest_rate),
        (&mut inputs.annual_property_tax, flags.property_tax),
        (&mut inputs.annual_insurance, flags.insurance),
        (&mut inputs.annual_community_fees, flags.community_fees),
        (&mut inputs.annual_maintenance, flags.maintenance),
        (&mut inputs.annual_vacancy_loss, flags.vacancy_loss),
    ];
    for (field, value) in overrides {
        if let Some(v) = value {
            *field = v;
        }
    }
}

/// Deal variant: the region travels with the deal so the analysis reports it.
fn apply_deal_flags(deal: &mut DealInput, flags: &InvestmentFlags, years: Option<i32>) {
    apply_flags(&mut deal.inputs, flags);
    if flags.region.is_some() {
        deal.region = flags.region.clone();
    }
    if years.is_some() {
        deal.horizon_years = years;
    }
}
