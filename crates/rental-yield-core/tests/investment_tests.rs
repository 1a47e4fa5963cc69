use pretty_assertions::assert_eq;
use rental_yield_core::investment::{
    analyze_deal, compute_investment, project_cash_flow, DealInput, InvestmentInputs,
};
use rental_yield_core::time_value::monthly_payment;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn city_flat() -> InvestmentInputs {
    InvestmentInputs {
        purchase_price: dec!(105000),
        tax_rate: dec!(0.10),
        closing_costs: dec!(4000),
        renovation_cost: dec!(20000),
        agent_commission: dec!(1500),
        furniture_cost: dec!(4000),
        monthly_rent: dec!(1100),
        financed_fraction: dec!(0.5),
        loan_term_years: dec!(30),
        annual_interest_rate: dec!(0.02),
        annual_appreciation_rate: dec!(0.02),
        ..Default::default()
    }
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_payment_zero_without_principal_or_term() {
    for principal in [dec!(0), dec!(-1), dec!(-250000)] {
        assert_eq!(monthly_payment(dec!(0.03), dec!(25), principal), Decimal::ZERO);
    }
    for term in [dec!(0), dec!(-1), dec!(-30)] {
        assert_eq!(monthly_payment(dec!(0.03), term, dec!(100000)), Decimal::ZERO);
    }
}

#[test]
fn test_payment_zero_rate_matches_straight_line() {
    for (term, principal) in [
        (dec!(30), dec!(52500)),
        (dec!(15), dec!(90000)),
        (dec!(1), dec!(7)),
    ] {
        let payment = monthly_payment(Decimal::ZERO, term, principal);
        let expected = principal / (term * dec!(12));
        assert!((payment - expected).abs() < dec!(0.0000000001));
    }
}

#[test]
fn test_payment_reference_fixture() {
    let payment = monthly_payment(dec!(0.02), dec!(30), dec!(52500));
    assert!(
        (payment - dec!(194.0502)).abs() < dec!(0.0001),
        "Expected ~194.0502, got {payment}"
    );
}

#[test]
fn test_payment_rises_with_rate() {
    let low = monthly_payment(dec!(0.01), dec!(30), dec!(100000));
    let mid = monthly_payment(dec!(0.04), dec!(30), dec!(100000));
    let high = monthly_payment(dec!(0.24), dec!(40), dec!(100000));
    assert!(low < mid && mid < high);
}

// ===========================================================================
// Investment calculator
// ===========================================================================

#[test]
fn test_end_to_end_scenario() {
    let out = compute_investment(&city_flat());
    assert_eq!(out.total_purchase_cost, dec!(145000));
    assert_eq!(out.loan_amount, dec!(52500));
    assert_eq!(out.equity_required, dec!(92500));
    assert_eq!(out.annual_income, dec!(13200));
    assert!((out.gross_yield - dec!(0.0910)).abs() < dec!(0.0001));
    assert_eq!(out.total_annual_expenses, Decimal::ZERO);
    // 1100 - 194.05
    assert!((out.monthly_cash_flow - dec!(905.95)).abs() < dec!(0.01));
    // PER ~10.98 years
    assert!((out.price_to_earnings - dec!(10.98)).abs() < dec!(0.01));
}

#[test]
fn test_compute_is_deterministic() {
    let input = city_flat();
    let results: Vec<_> = (0..3).map(|_| compute_investment(&input)).collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}

#[test]
fn test_zero_purchase_cost_yields_zero() {
    let input = InvestmentInputs {
        monthly_rent: dec!(800),
        ..Default::default()
    };
    let out = compute_investment(&input);
    assert_eq!(out.total_purchase_cost, Decimal::ZERO);
    assert_eq!(out.gross_yield, Decimal::ZERO);
    assert_eq!(out.net_yield, Decimal::ZERO);
}

#[test]
fn test_non_positive_equity_zeroes_equity_ratios() {
    // Exactly fully financed with no extra costs: equity is 0
    let zero_equity = InvestmentInputs {
        purchase_price: dec!(200000),
        tax_rate: Decimal::ZERO,
        financed_fraction: Decimal::ONE,
        monthly_rent: dec!(1500),
        annual_appreciation_rate: dec!(0.05),
        ..Default::default()
    };
    let out = compute_investment(&zero_equity);
    assert_eq!(out.equity_required, Decimal::ZERO);
    assert_eq!(out.cash_on_cash_return, Decimal::ZERO);
    assert_eq!(out.return_on_capital_employed, Decimal::ZERO);
    assert_eq!(out.total_return, Decimal::ZERO);
    // Rent ratios are unaffected
    assert!(out.debt_service_to_rent_ratio > Decimal::ZERO);
}

#[test]
fn test_running_costs_reduce_net_yield_and_cash_flow() {
    let base = compute_investment(&city_flat());
    let with_costs = compute_investment(&InvestmentInputs {
        annual_property_tax: dec!(400),
        annual_insurance: dec!(200),
        annual_community_fees: dec!(480),
        annual_maintenance: dec!(300),
        annual_vacancy_loss: dec!(1100),
        ..city_flat()
    });
    assert_eq!(with_costs.total_annual_expenses, dec!(2480));
    assert_eq!(base.gross_yield, with_costs.gross_yield);
    assert!(with_costs.net_yield < base.net_yield);
    let drop = base.monthly_cash_flow - with_costs.monthly_cash_flow;
    assert!((drop - with_costs.total_monthly_expenses).abs() < dec!(0.0000001));
}

// ===========================================================================
// Full pipeline
// ===========================================================================

#[test]
fn test_pipeline_projects_engine_cash_flow() {
    let investment = compute_investment(&city_flat());
    let series = project_cash_flow(investment.monthly_cash_flow, dec!(0.02), 10);
    assert_eq!(series.len(), 10);
    // 905.95 * 12 = 10871.4
    assert_eq!(series[0].period_cash_flow, dec!(10871));
    assert!(series.windows(2).all(|w| w[1].period_cash_flow >= w[0].period_cash_flow));
}

#[test]
fn test_pipeline_is_idempotent() {
    let deal = DealInput {
        inputs: city_flat(),
        horizon_years: Some(10),
        region: None,
    };
    let first = analyze_deal(&deal).unwrap().result;
    let second = analyze_deal(&deal).unwrap().result;
    assert_eq!(first.investment, second.investment);
    assert_eq!(first.projection, second.projection);
    assert_eq!(deal.inputs, city_flat());
}

#[test]
fn test_deal_json_round_trip_through_envelope() {
    let json = r#"{
        "purchase_price": 105000,
        "closing_costs": 4000,
        "renovation_cost": 20000,
        "agent_commission": 1500,
        "furniture_cost": 4000,
        "monthly_rent": 1100,
        "financed_fraction": 0.5,
        "annual_appreciation_rate": 0.02,
        "horizon_years": 3
    }"#;
    let deal: DealInput = serde_json::from_str(json).unwrap();
    let out = analyze_deal(&deal).unwrap();
    assert_eq!(out.result.investment.total_purchase_cost, dec!(145000));
    assert_eq!(out.result.projection.len(), 3);

    let value = serde_json::to_value(&out).unwrap();
    let equity: Decimal = value["result"]["investment"]["equity_required"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(equity, dec!(92500));
    assert_eq!(value["result"]["projection"][0]["period_label"], "Year 1");
    assert!(value["result"].get("region").is_none());
}
