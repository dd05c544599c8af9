use rust_decimal::{Decimal, RoundingStrategy};

use super::domain::{ApplicantProfile, LenderConfig};

const LIMIT_DIVISOR: Decimal = Decimal::TEN;

/// Reasons a lender's limit cannot be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LimitError {
    #[error("weight factor {0} is negative")]
    NegativeWeight(Decimal),
    #[error("maximum limit {0} is negative")]
    NegativeMaxLimit(Decimal),
    #[error("limit arithmetic overflowed")]
    Overflow,
}

/// `min(income × remaining months × weight / 10, max_limit)`, rounded half-up to a whole
/// 만원 and never above `max_limit`.
pub fn compute_limit(
    profile: &ApplicantProfile,
    lender: &LenderConfig,
) -> Result<Decimal, LimitError> {
    if lender.weight_factor < Decimal::ZERO {
        return Err(LimitError::NegativeWeight(lender.weight_factor));
    }
    if lender.max_limit < Decimal::ZERO {
        return Err(LimitError::NegativeMaxLimit(lender.max_limit));
    }

    let raw = profile
        .annual_income
        .checked_mul(Decimal::from(profile.remaining_stay_months))
        .and_then(|value| value.checked_mul(lender.weight_factor))
        .and_then(|value| value.checked_div(LIMIT_DIVISOR))
        .ok_or(LimitError::Overflow)?;

    let capped = raw.min(lender.max_limit);
    let rounded = round_half_up(capped, 0);

    if rounded > lender.max_limit {
        Ok(lender.max_limit.floor())
    } else {
        Ok(rounded)
    }
}

pub(crate) fn round_half_up(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn profile(income: Decimal, months: u32) -> ApplicantProfile {
        ApplicantProfile {
            nationality: "Nepal".to_string(),
            remaining_stay_months: months,
            annual_income: income,
            age: 30,
            employment_months: 12,
            visa_type: "E-9".to_string(),
            health_insurance_type: None,
        }
    }

    #[test]
    fn applies_weight_over_income_and_stay() {
        let lender = LenderConfig::new("KB저축은행", dec!(0.35), dec!(3000));
        let limit = compute_limit(&profile(dec!(2500), 20), &lender).expect("limit");
        assert_eq!(limit, dec!(1750));
    }

    #[test]
    fn caps_at_maximum_limit() {
        let lender = LenderConfig::new("전북은행", dec!(0.36), dec!(5000));
        let limit = compute_limit(&profile(dec!(4000), 60), &lender).expect("limit");
        assert_eq!(limit, dec!(5000));
    }

    #[test]
    fn rounds_half_up_to_whole_units() {
        let lender = LenderConfig::new("OK저축은행", dec!(0.37), dec!(3500));
        // 1234.5 * 3 * 0.37 / 10 = 137.0295
        let limit = compute_limit(&profile(dec!(1234.5), 3), &lender).expect("limit");
        assert_eq!(limit, dec!(137));

        let lender = LenderConfig::new("웰컴저축은행", dec!(0.5), dec!(3000));
        // 1.25 rounds down, 2.5 rounds up
        assert_eq!(compute_limit(&profile(dec!(25), 1), &lender).expect("limit"), dec!(1));
        assert_eq!(compute_limit(&profile(dec!(50), 1), &lender).expect("limit"), dec!(3));
    }

    #[test]
    fn fractional_cap_is_never_exceeded_by_rounding() {
        let lender = LenderConfig::new("예가람저축은행", dec!(1), dec!(100.5));
        let limit = compute_limit(&profile(dec!(5000), 10), &lender).expect("limit");
        assert!(limit <= lender.max_limit);
        assert_eq!(limit, dec!(100));
    }

    #[test]
    fn zero_stay_yields_zero_limit() {
        let lender = LenderConfig::new("KB저축은행", dec!(0.35), dec!(3000));
        assert_eq!(
            compute_limit(&profile(dec!(2500), 0), &lender).expect("limit"),
            Decimal::ZERO
        );
    }

    #[test]
    fn rejects_negative_configuration() {
        let lender = LenderConfig::new("broken", dec!(-0.1), dec!(3000));
        assert_eq!(
            compute_limit(&profile(dec!(2500), 20), &lender),
            Err(LimitError::NegativeWeight(dec!(-0.1)))
        );

        let lender = LenderConfig::new("broken", dec!(0.1), dec!(-1));
        assert_eq!(
            compute_limit(&profile(dec!(2500), 20), &lender),
            Err(LimitError::NegativeMaxLimit(dec!(-1)))
        );
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        let lender = LenderConfig::new("huge", Decimal::MAX, Decimal::MAX);
        assert_eq!(
            compute_limit(&profile(Decimal::MAX, 1000), &lender),
            Err(LimitError::Overflow)
        );
    }
}
