use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::models::referencemodel::Reference;

/// Commission math for settlements. Everything here is pure and operates on
/// unrounded decimals; presentation rounding lives in `utils::decimal`.

/// Referrer commission parameters are fixed when the reference is created
/// and copied onto the settlement verbatim, not derived from current totals.
pub fn referrer_split(reference: &Reference) -> (BigDecimal, BigDecimal) {
    (
        reference.discount_amount.clone(),
        reference.received_amount.clone(),
    )
}

/// Split referenced income between referrer and platform. The rate is the
/// platform share (0.25 by default) and is injected from configuration so
/// every settlement can be audited against the rate in force at the time.
pub fn platform_split(amount: &BigDecimal, rate: &BigDecimal) -> (BigDecimal, BigDecimal) {
    let platform_share = amount * rate;
    let referrer_share = amount - &platform_share;
    (referrer_share, platform_share)
}

/// Shared-fund stakeholder split: 60% kowida, 40% randyll.
pub fn fund_split(amount: &BigDecimal) -> (BigDecimal, BigDecimal) {
    let kowida_rate = BigDecimal::from_str("0.60").unwrap();
    let randyll_rate = BigDecimal::from_str("0.40").unwrap();
    (amount * kowida_rate, amount * randyll_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::decimal::BigDecimalHelpers;
    use chrono::Utc;
    use uuid::Uuid;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_platform_split_default_rate() {
        let (referrer, platform) = platform_split(&dec("100.00"), &dec("0.25"));
        assert_eq!(referrer.round2(), dec("75.00"));
        assert_eq!(platform.round2(), dec("25.00"));
    }

    #[test]
    fn test_platform_split_conserves_amount() {
        let amount = dec("637.19");
        let (referrer, platform) = platform_split(&amount, &dec("0.25"));
        assert_eq!(referrer + platform, amount);
    }

    #[test]
    fn test_platform_split_keeps_precision_until_rounding() {
        let (referrer, _) = platform_split(&dec("100.10"), &dec("0.25"));
        // Unrounded value carries the full 75.075; rounding is a separate step.
        assert_eq!(referrer, dec("75.075"));
        assert_eq!(referrer.round2(), dec("75.08"));
    }

    #[test]
    fn test_fund_split() {
        let (kowida, randyll) = fund_split(&dec("100.00"));
        assert_eq!(kowida.round2(), dec("60.00"));
        assert_eq!(randyll.round2(), dec("40.00"));
    }

    #[test]
    fn test_fund_split_conserves_amount() {
        let amount = dec("1234.56");
        let (kowida, randyll) = fund_split(&amount);
        assert_eq!(kowida + randyll, amount);
    }

    #[test]
    fn test_referrer_split_is_copy_through() {
        let reference = Reference {
            id: Uuid::new_v4(),
            code: "SL002".to_string(),
            phone: "+2348012345678".to_string(),
            discount_amount: dec("500.00"),
            received_amount: dec("1500.00"),
            created_at: Some(Utc::now()),
        };

        let (discount, received) = referrer_split(&reference);
        assert_eq!(discount, dec("500.00"));
        assert_eq!(received, dec("1500.00"));
    }
}
