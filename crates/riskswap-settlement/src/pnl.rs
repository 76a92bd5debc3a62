//! Fixed-point PnL with symmetric half-up rounding.

use riskswap_types::{Result, RiskswapError, constants};

/// Round `numerator / denominator` to the nearest integer, halves away from
/// zero.
///
/// For `numerator >= 0` this is `(numerator + denominator / 2) / denominator`
/// with truncating division. For a negative numerator the magnitude is
/// rounded the same way and then negated, which is *not* what floor division
/// on the signed value would give.
///
/// # Errors
/// [`RiskswapError::OutOfRangeParameter`] if `denominator` is zero.
pub fn round_half_up(numerator: i128, denominator: u128) -> Result<i128> {
    if denominator == 0 {
        return Err(RiskswapError::OutOfRangeParameter {
            name: "denominator",
            value: 0,
            min: 1,
            max: u128::MAX,
        });
    }
    let magnitude = numerator.unsigned_abs();
    let rounded = magnitude
        .checked_add(denominator / 2)
        .ok_or(RiskswapError::ArithmeticOverflow {
            context: "round_half_up",
        })?
        / denominator;

    let signed = if numerator < 0 {
        0i128.checked_sub_unsigned(rounded)
    } else {
        i128::try_from(rounded).ok()
    };
    signed.ok_or(RiskswapError::ArithmeticOverflow {
        context: "round_half_up",
    })
}

fn require_range(name: &'static str, value: u128, min: u128, max: u128) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RiskswapError::OutOfRangeParameter {
            name,
            value,
            min,
            max,
        })
    }
}

/// Signed settlement amount for a swap.
///
/// Positive when the fair spread exceeds the contracted one. Who pays whom
/// is left to the caller.
///
/// # Errors
/// - [`RiskswapError::OutOfRangeParameter`] unless
///   `1 <= fair, fixed <= 10000`, `notional > 0`, `1 <= tenor <= 36500` and
///   `1 <= elapsed <= tenor`.
/// - [`RiskswapError::ArithmeticOverflow`] if the numerator does not fit in
///   an `i128`.
pub fn compute_pnl(
    fair_spread_bps: u16,
    fixed_spread_bps: u16,
    notional: u128,
    elapsed_days: u64,
    tenor_days: u64,
) -> Result<i128> {
    let (min_bps, max_bps) = (
        u128::from(constants::MIN_SPREAD_BPS),
        u128::from(constants::MAX_SPREAD_BPS),
    );
    require_range("fair_spread_bps", fair_spread_bps.into(), min_bps, max_bps)?;
    require_range("fixed_spread_bps", fixed_spread_bps.into(), min_bps, max_bps)?;
    require_range("notional", notional, 1, u128::MAX)?;
    require_range(
        "tenor_days",
        tenor_days.into(),
        1,
        constants::MAX_TENOR_DAYS.into(),
    )?;
    require_range("elapsed_days", elapsed_days.into(), 1, tenor_days.into())?;

    let overflow = || RiskswapError::ArithmeticOverflow {
        context: "pnl numerator",
    };
    let delta_bps = i128::from(fair_spread_bps) - i128::from(fixed_spread_bps);
    let numerator = i128::try_from(notional)
        .ok()
        .and_then(|n| n.checked_mul(delta_bps))
        .and_then(|n| n.checked_mul(i128::from(elapsed_days)))
        .ok_or_else(overflow)?;
    let denominator = u128::from(constants::BPS_DENOMINATOR) * u128::from(tenor_days);

    let pnl = round_half_up(numerator, denominator)?;
    tracing::debug!(
        delta_bps,
        numerator,
        denominator,
        pnl,
        "Computed settlement PnL"
    );
    Ok(pnl)
}
