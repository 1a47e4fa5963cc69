use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::time_value::{monthly_payment, safe_divide, MONTHS_PER_YEAR};
use crate::types::{Money, Multiple, Rate, Years};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase, income, financing and running-cost assumptions for one property.
///
/// Omitted fields deserialize to their defaults: transfer tax 10%, a 30-year
/// loan at 2%, and zero for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentInputs {
    // --- Purchase ---
    pub purchase_price: Money,
    /// Transfer tax as a fraction of purchase price (e.g. 0.10 = 10%)
    pub tax_rate: Rate,
    pub closing_costs: Money,
    pub mortgage_setup_costs: Money,
    pub renovation_cost: Money,
    pub agent_commission: Money,
    pub furniture_cost: Money,

    // --- Income ---
    pub monthly_rent: Money,
    /// Assumed annual appreciation; also drives rent growth in projections
    pub annual_appreciation_rate: Rate,

    // --- Financing ---
    /// Share of the purchase price financed by the loan (0..1)
    pub financed_fraction: Rate,
    pub loan_term_years: Years,
    pub annual_interest_rate: Rate,

    // --- Annual operating expenses ---
    pub annual_property_tax: Money,
    pub annual_insurance: Money,
    pub annual_community_fees: Money,
    pub annual_maintenance: Money,
    pub annual_vacancy_loss: Money,
}

impl Default for InvestmentInputs {
    fn default() -> Self {
        Self {
            purchase_price: Decimal::ZERO,
            tax_rate: dec!(0.10),
            closing_costs: Decimal::ZERO,
            mortgage_setup_costs: Decimal::ZERO,
            renovation_cost: Decimal::ZERO,
            agent_commission: Decimal::ZERO,
            furniture_cost: Decimal::ZERO,
            monthly_rent: Decimal::ZERO,
            annual_appreciation_rate: Decimal::ZERO,
            financed_fraction: Decimal::ZERO,
            loan_term_years: dec!(30),
            annual_interest_rate: dec!(0.02),
            annual_property_tax: Decimal::ZERO,
            annual_insurance: Decimal::ZERO,
            annual_community_fees: Decimal::ZERO,
            annual_maintenance: Decimal::ZERO,
            annual_vacancy_loss: Decimal::ZERO,
        }
    }
}

/// Everything derived from [`InvestmentInputs`]: purchase totals, financing,
/// expenses, income and the nine profitability KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    // --- Purchase ---
    /// Transfer tax paid on the purchase price
    pub property_tax: Money,
    /// Price plus tax, fees, renovation, commission and furniture
    pub total_purchase_cost: Money,

    // --- Financing ---
    pub loan_amount: Money,
    /// Cash the buyer contributes: total cost minus the loan
    pub equity_required: Money,
    pub monthly_payment: Money,
    pub annual_payment: Money,
    /// Total interest over the term spread evenly per month
    pub average_monthly_interest: Money,
    pub average_annual_interest: Money,
    pub average_monthly_principal: Money,
    pub average_annual_principal: Money,

    // --- Expenses ---
    pub total_monthly_expenses: Money,
    pub total_annual_expenses: Money,

    // --- Income ---
    pub annual_income: Money,

    // --- KPIs ---
    /// Annual rent / total purchase cost
    pub gross_yield: Rate,
    /// (Rent - expenses - interest) / total purchase cost
    pub net_yield: Rate,
    /// Rent minus loan payment and expenses; negative means the deal bleeds cash
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Total purchase cost / annual rent (payback years, PER)
    pub price_to_earnings: Multiple,
    /// Loan payment / rent
    pub debt_service_to_rent_ratio: Rate,
    /// Cash flow / rent
    pub cash_flow_to_rent_ratio: Rate,
    /// Annual cash flow / equity
    pub cash_on_cash_return: Rate,
    /// (Cash flow + principal paydown) annualised / equity (ROCE)
    pub return_on_capital_employed: Rate,
    /// Net yield on equity plus appreciation
    pub total_return: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute purchase totals, financing figures, expenses and KPIs.
///
/// Pure and total: identical inputs always give identical output, and every
/// ratio with a non-positive denominator is reported as 0. Inputs are not
/// validated; nonsensical values produce consistent but nonsensical output.
pub fn compute_investment(input: &InvestmentInputs) -> InvestmentResult {
    // --- Purchase ---
    let property_tax = input.purchase_price.saturating_mul(input.tax_rate);
    let total_purchase_cost = [
        input.purchase_price,
        property_tax,
        input.closing_costs,
        input.mortgage_setup_costs,
        input.renovation_cost,
        input.agent_commission,
        input.furniture_cost,
    ]
    .into_iter()
    .fold(Decimal::ZERO, Decimal::saturating_add);

    // --- Financing ---
    let loan_amount = input.purchase_price.saturating_mul(input.financed_fraction);
    let equity_required = total_purchase_cost.saturating_sub(loan_amount);

    let monthly_payment = monthly_payment(
        input.annual_interest_rate,
        input.loan_term_years,
        loan_amount,
    );
    let annual_payment = monthly_payment.saturating_mul(MONTHS_PER_YEAR);

    let average_monthly_interest = average_monthly_interest(
        monthly_payment,
        loan_amount,
        input.loan_term_years,
    );
    let average_annual_interest = average_monthly_interest.saturating_mul(MONTHS_PER_YEAR);
    let average_monthly_principal = monthly_payment.saturating_sub(average_monthly_interest);
    let average_annual_principal = average_monthly_principal.saturating_mul(MONTHS_PER_YEAR);

    // --- Expenses ---
    let total_annual_expenses = [
        input.annual_property_tax,
        input.annual_insurance,
        input.annual_community_fees,
        input.annual_maintenance,
        input.annual_vacancy_loss,
    ]
    .into_iter()
    .fold(Decimal::ZERO, Decimal::saturating_add);
    let total_monthly_expenses = total_annual_expenses / MONTHS_PER_YEAR;

    // --- Income ---
    let annual_income = input.monthly_rent.saturating_mul(MONTHS_PER_YEAR);

    // --- KPIs ---
    let net_operating_return = annual_income
        .saturating_sub(total_annual_expenses)
        .saturating_sub(average_annual_interest);

    let gross_yield = safe_divide(annual_income, total_purchase_cost);
    let net_yield = safe_divide(net_operating_return, total_purchase_cost);

    let monthly_cash_flow = input
        .monthly_rent
        .saturating_sub(monthly_payment)
        .saturating_sub(total_monthly_expenses);
    let annual_cash_flow = monthly_cash_flow.saturating_mul(MONTHS_PER_YEAR);

    let price_to_earnings = safe_divide(total_purchase_cost, annual_income);
    let debt_service_to_rent_ratio = safe_divide(monthly_payment, input.monthly_rent);
    let cash_flow_to_rent_ratio = safe_divide(monthly_cash_flow, input.monthly_rent);

    let cash_on_cash_return = safe_divide(annual_cash_flow, equity_required);
    let return_on_capital_employed = safe_divide(
        monthly_cash_flow
            .saturating_add(average_monthly_principal)
            .saturating_mul(MONTHS_PER_YEAR),
        equity_required,
    );

    // Appreciation only counts when there is equity to earn it on
    let total_return = if equity_required > Decimal::ZERO {
        safe_divide(net_operating_return, equity_required)
            .saturating_add(input.annual_appreciation_rate)
    } else {
        Decimal::ZERO
    };

    InvestmentResult {
        property_tax,
        total_purchase_cost,
        loan_amount,
        equity_required,
        monthly_payment,
        annual_payment,
        average_monthly_interest,
        average_annual_interest,
        average_monthly_principal,
        average_annual_principal,
        total_monthly_expenses,
        total_annual_expenses,
        annual_income,
        gross_yield,
        net_yield,
        monthly_cash_flow,
        annual_cash_flow,
        price_to_earnings,
        debt_service_to_rent_ratio,
        cash_flow_to_rent_ratio,
        cash_on_cash_return,
        return_on_capital_employed,
        total_return,
    }
}

// ---------------------------------------------------------------------------
// Loan split
// ---------------------------------------------------------------------------

/// Total interest over the loan's life divided evenly across its months.
///
/// This is a linear average, not a declining-balance schedule: early months
/// of a real amortization pay more interest than this figure.
fn average_monthly_interest(payment: Money, loan_amount: Money, term_years: Years) -> Money {
    if loan_amount <= Decimal::ZERO || term_years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let periods = term_years.saturating_mul(MONTHS_PER_YEAR);
    let total_interest = payment.saturating_mul(periods).saturating_sub(loan_amount);
    safe_divide(total_interest, periods)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
