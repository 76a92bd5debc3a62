//! Day-count derivation: swap timestamps to calculator inputs.
//!
//! ```text
//! elapsed = floor((min(now, maturity) - start) / 86400)   clamped to 1..=tenor
//! tenor   = ceil((maturity - start) / 86400)              clamped to 1..=36500
//! ```

use riskswap_types::{Result, RiskswapError, constants};

/// Calculator day inputs for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementWindow {
    pub elapsed_days: u64,
    pub tenor_days: u64,
}

/// Derive the settlement window of a swap evaluated at `now`.
///
/// A swap settled on its first day still accrues one day; one settled after
/// maturity accrues the full tenor.
///
/// # Errors
/// [`RiskswapError::OutOfRangeParameter`] if `maturity <= start` or if
/// `now < start`.
pub fn settlement_window(start: u64, maturity: u64, now: u64) -> Result<SettlementWindow> {
    if maturity <= start {
        return Err(RiskswapError::OutOfRangeParameter {
            name: "maturity",
            value: maturity.into(),
            min: u128::from(start) + 1,
            max: u64::MAX.into(),
        });
    }
    if now < start {
        return Err(RiskswapError::OutOfRangeParameter {
            name: "settlement_time",
            value: now.into(),
            min: start.into(),
            max: u64::MAX.into(),
        });
    }

    let tenor_days = (maturity - start)
        .div_ceil(constants::SECONDS_PER_DAY)
        .clamp(1, constants::MAX_TENOR_DAYS);
    let elapsed_days = ((now.min(maturity) - start) / constants::SECONDS_PER_DAY).clamp(1, tenor_days);

    Ok(SettlementWindow {
        elapsed_days,
        tenor_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_700_000_000;
    const DAY: u64 = constants::SECONDS_PER_DAY;

    fn window(start: u64, maturity: u64, now: u64) -> (u64, u64) {
        let w = settlement_window(start, maturity, now).unwrap();
        (w.elapsed_days, w.tenor_days)
    }

    #[test]
    fn mid_life() {
        assert_eq!(window(T, T + 30 * DAY, T + 29 * DAY), (29, 30));
        // partial days are floored for elapsed
        assert_eq!(window(T, T + 30 * DAY, T + 29 * DAY + DAY - 1), (29, 30));
    }

    #[test]
    fn first_day_clamps_to_one() {
        assert_eq!(window(T, T + 30 * DAY, T), (1, 30));
        assert_eq!(window(T, T + 30 * DAY, T + DAY - 1), (1, 30));
    }

    #[test]
    fn after_maturity_caps_at_tenor() {
        assert_eq!(window(T, T + 30 * DAY, T + 400 * DAY), (30, 30));
    }

    #[test]
    fn partial_last_day_rounds_tenor_up() {
        assert_eq!(window(T, T + 30 * DAY + 1, T + 30 * DAY + 1), (30, 31));
        assert_eq!(window(T, T + 1, T + 1), (1, 1));
    }

    #[test]
    fn overlong_tenor_clamped() {
        let maturity = T + 40_000 * DAY;
        assert_eq!(window(T, maturity, maturity), (36_500, 36_500));
    }

    #[test]
    fn before_start_rejected() {
        let err = settlement_window(T, T + DAY, T - 1).unwrap_err();
        assert!(matches!(err, RiskswapError::OutOfRangeParameter { name: "settlement_time", .. }));
    }

    #[test]
    fn inverted_dates_rejected() {
        assert!(settlement_window(T, T, T).is_err());
        assert!(settlement_window(T + 1, T, T + 2).is_err());
    }
}
