use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate, Years};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Beyond this many periods the iterative product is swapped for `powd`.
const MAX_ITERATIVE_PERIODS: u32 = 12_000;

/// Ratio with a zero fallback: returns 0 unless `denominator > 0`.
///
/// Every ratio KPI goes through here, so the fallback policy lives in one place.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    safe_divide_or(numerator, denominator, Decimal::ZERO)
}

/// Ratio returning `fallback` unless `denominator > 0`.
///
/// A quotient too large for Decimal saturates in the numerator's direction.
pub fn safe_divide_or(numerator: Decimal, denominator: Decimal, fallback: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return fallback;
    }
    numerator.checked_div(denominator).unwrap_or(if numerator.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Compute (1 + r)^n. Whole periods use iterative multiplication (avoids
/// Decimal::powd drift); fractional periods fall back to `checked_powd`.
///
/// Returns `None` when the factor leaves Decimal range.
pub fn compound(rate: Rate, periods: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(rate)?;
    match periods.to_u32() {
        Some(n) if periods.fract().is_zero() && n <= MAX_ITERATIVE_PERIODS => {
            let mut result = Decimal::ONE;
            for _ in 0..n {
                result = result.checked_mul(factor)?;
            }
            Some(result)
        }
        _ => factor.checked_powd(periods),
    }
}

/// Fixed monthly payment on a fully amortizing loan:
/// `P * r(1+r)^n / ((1+r)^n - 1)` with `r = annual_rate / 12`, `n = term_years * 12`.
///
/// - No principal or no term means no loan: 0.
/// - A zero (or negative) rate amortizes straight-line: `P / n`.
///
/// Total over its domain; inputs are not validated here.
pub fn monthly_payment(annual_rate: Rate, term_years: Years, principal: Money) -> Money {
    if principal <= Decimal::ZERO || term_years <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let periods = term_years.saturating_mul(MONTHS_PER_YEAR);
    if annual_rate <= Decimal::ZERO {
        return safe_divide(principal, periods);
    }

    let monthly_rate = annual_rate / MONTHS_PER_YEAR;
    let growth = match compound(monthly_rate, periods) {
        Some(g) => g,
        // Growth factor out of range: payment has converged on interest-only
        None => return principal.saturating_mul(monthly_rate),
    };

    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register over the term
        return safe_divide(principal, periods);
    }

    principal
        .saturating_mul(monthly_rate)
        .saturating_mul(safe_divide(growth, denominator))
}
