use std::time::Instant;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::RentalYieldError;
use crate::time_value::MONTHS_PER_YEAR;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RentalYieldResult;

/// Horizon used when the caller does not ask for one.
pub const DEFAULT_HORIZON_YEARS: i32 = 10;

/// Longest horizon the envelope functions accept.
pub const MAX_HORIZON_YEARS: i32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of projected rental cash flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period_label: String,
    /// 1-based year number
    pub year: u32,
    /// Cash flow for the year, rounded to whole currency units
    pub period_cash_flow: Money,
    /// Running sum of the rounded yearly figures
    pub cumulative_cash_flow: Money,
}

/// Input parameters for a standalone projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub base_monthly_cash_flow: Money,
    /// Yearly growth applied to the previous year's cash flow (may be negative)
    #[serde(default)]
    pub annual_growth_rate: Rate,
    #[serde(default = "default_horizon")]
    pub horizon_years: i32,
}

/// Projection series plus its total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub points: Vec<ProjectionPoint>,
    /// Cumulative cash flow at the end of the horizon (0 when empty)
    pub total_cash_flow: Money,
}

fn default_horizon() -> i32 {
    DEFAULT_HORIZON_YEARS
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Project yearly cash flow from a monthly figure.
///
/// Year 1 is `base_monthly_cash_flow * 12`; every later year compounds the
/// previous year's unrounded figure by `1 + annual_growth_rate`. A horizon of
/// zero or less yields an empty series.
pub fn project_cash_flow(
    base_monthly_cash_flow: Money,
    annual_growth_rate: Rate,
    horizon_years: i32,
) -> Vec<ProjectionPoint> {
    let n_years = u32::try_from(horizon_years).unwrap_or(0);
    let growth_factor = Decimal::ONE.saturating_add(annual_growth_rate);

    let mut points = Vec::with_capacity(n_years as usize);
    let mut period_flow = base_monthly_cash_flow.saturating_mul(MONTHS_PER_YEAR);
    let mut cumulative = Decimal::ZERO;

    for year_idx in 0..n_years {
        let year = year_idx + 1;
        if year_idx > 0 {
            period_flow = period_flow.saturating_mul(growth_factor);
        }

        // Round for reporting only; growth compounds on the unrounded figure
        let period_cash_flow = round_currency(period_flow);
        cumulative = cumulative.saturating_add(period_cash_flow);

        points.push(ProjectionPoint {
            period_label: format!("Year {year}"),
            year,
            period_cash_flow,
            cumulative_cash_flow: cumulative,
        });
    }

    points
}

/// Round to whole currency units, halves away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Run a projection and wrap it with warnings and computation metadata.
pub fn build_projection(
    input: &ProjectionInput,
) -> RentalYieldResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_horizon(input.horizon_years)?;

    if input.horizon_years <= 0 {
        warnings.push(format!(
            "Horizon of {} years produces an empty projection",
            input.horizon_years
        ));
    }
    if input.annual_growth_rate < Decimal::ZERO {
        warnings.push(format!(
            "Negative growth rate {} — cash flow declines every year",
            input.annual_growth_rate
        ));
    }

    let points = project_cash_flow(
        input.base_monthly_cash_flow,
        input.annual_growth_rate,
        input.horizon_years,
    );
    let total_cash_flow = points
        .last()
        .map(|p| p.cumulative_cash_flow)
        .unwrap_or(Decimal::ZERO);

    log::debug!(
        "projected {} years, total cash flow {}",
        points.len(),
        total_cash_flow
    );

    let output = ProjectionOutput {
        points,
        total_cash_flow,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Compounded Rental Cash-Flow Projection",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Reject horizons beyond [`MAX_HORIZON_YEARS`]. Non-positive horizons are
/// allowed and simply project nothing.
pub(crate) fn validate_horizon(horizon_years: i32) -> RentalYieldResult<()> {
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(RentalYieldError::InvalidInput {
            field: "horizon_years".into(),
            reason: format!("Horizon must not exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn point(year: u32, flow: Decimal, cumulative: Decimal) -> ProjectionPoint {
        ProjectionPoint {
            period_label: format!("Year {year}"),
            year,
            period_cash_flow: flow,
            cumulative_cash_flow: cumulative,
        }
    }

    #[test]
    fn test_three_year_fixture() {
        let series: Vec<_> = project_cash_flow(dec!(100), dec!(0.02), 3);
        assert_eq!(
            series,
            vec![
                point(1, dec!(1200), dec!(1200)),
                point(2, dec!(1224), dec!(2424)),
                point(3, dec!(1248), dec!(3672)),
            ]
        );
    }

    #[test]
    fn test_cumulative_sums_rounded_years() {
        // 10.5/month: 126, 138.6 -> 139, 152.46 -> 152
        let series: Vec<_> = project_cash_flow(dec!(10.5), dec!(0.1), 3);
        assert_eq!(series[0].period_cash_flow, dec!(126));
        assert_eq!(series[1].period_cash_flow, dec!(139));
        assert_eq!(series[2].period_cash_flow, dec!(152));
        assert_eq!(series[2].cumulative_cash_flow, dec!(417));
    }

    #[test]
    fn test_growth_compounds_on_unrounded_figure() {
        // 100.4/yr at 50%: 150.6 -> 225.9; compounding the rounded 151 would give 226.5 -> 227
        let series: Vec<_> = project_cash_flow(dec!(100.4) / dec!(12), dec!(0.5), 3);
        assert_eq!(series[1].period_cash_flow, dec!(151));
        assert_eq!(series[2].period_cash_flow, dec!(226));
    }

    #[test]
    fn test_default_horizon_length() {
        let series = project_cash_flow(dec!(250), dec!(0.01), DEFAULT_HORIZON_YEARS);
        assert_eq!(series.len(), 10);
        let years: Vec<u32> = series.iter().map(|p| p.year).collect();
        assert_eq!(years, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_non_positive_horizon_is_empty() {
        assert!(project_cash_flow(dec!(100), dec!(0.02), 0).is_empty());
        assert!(project_cash_flow(dec!(100), dec!(0.02), -5).is_empty());
    }

    #[test]
    fn test_zero_growth_is_flat() {
        let series: Vec<_> = project_cash_flow(dec!(50), Decimal::ZERO, 4);
        assert!(series.iter().all(|p| p.period_cash_flow == dec!(600)));
        assert_eq!(series[3].cumulative_cash_flow, dec!(2400));
    }

    #[test]
    fn test_negative_growth_declines() {
        let series: Vec<_> = project_cash_flow(dec!(100), dec!(-0.5), 3);
        assert_eq!(series[1].period_cash_flow, dec!(600));
        assert_eq!(series[2].period_cash_flow, dec!(300));
    }

    #[test]
    fn test_negative_cash_flow_accumulates_losses() {
        let series: Vec<_> = project_cash_flow(dec!(-20.5), Decimal::ZERO, 2);
        assert_eq!(series[0].period_cash_flow, dec!(-246));
        assert_eq!(series[1].cumulative_cash_flow, dec!(-492));
    }

    #[test]
    fn test_single_year_horizon() {
        let series = project_cash_flow(dec!(1), dec!(0.1), 1);
        assert_eq!(series, vec![point(1, dec!(12), dec!(12))]);
    }

    #[test]
    fn test_round_currency_halves_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
        assert_eq!(round_currency(dec!(1248.48)), dec!(1248));
    }

    #[test]
    fn test_build_projection_envelope() {
        let input = ProjectionInput {
            base_monthly_cash_flow: dec!(100),
            annual_growth_rate: dec!(0.02),
            horizon_years: 3,
        };
        let out = build_projection(&input).unwrap();
        assert_eq!(out.result.points.len(), 3);
        assert_eq!(out.result.total_cash_flow, dec!(3672));
        assert!(out.warnings.is_empty());
        assert_eq!(out.methodology, "Compounded Rental Cash-Flow Projection");
    }

    #[test]
    fn test_build_projection_rejects_long_horizon() {
        let input = ProjectionInput {
            base_monthly_cash_flow: dec!(100),
            annual_growth_rate: dec!(0.02),
            horizon_years: MAX_HORIZON_YEARS + 1,
        };
        let err = build_projection(&input).unwrap_err();
        assert!(matches!(
            err,
            RentalYieldError::InvalidInput { ref field, .. } if field == "horizon_years"
        ));
    }

    #[test]
    fn test_build_projection_empty_warns() {
        let input = ProjectionInput {
            base_monthly_cash_flow: dec!(100),
            annual_growth_rate: dec!(-0.1),
            horizon_years: 0,
        };
        let out = build_projection(&input).unwrap();
        assert!(out.result.points.is_empty());
        assert_eq!(out.result.total_cash_flow, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_projection_input_defaults() {
        let input: ProjectionInput =
            serde_json::from_str(r#"{"base_monthly_cash_flow": "100"}"#).unwrap();
        assert_eq!(input.horizon_years, DEFAULT_HORIZON_YEARS);
        assert_eq!(input.annual_growth_rate, Decimal::ZERO);
    }
}
