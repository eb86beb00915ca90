use bigdecimal::{rounding::RoundingMode, BigDecimal};
use num_traits::ToPrimitive;

/// Monetary values are kept unrounded through every calculation and only
/// brought to 2 decimal places at the presentation boundary.
pub trait BigDecimalHelpers {
    fn round2(&self) -> BigDecimal;
    fn to_f64_or_zero(&self) -> f64;
}

impl BigDecimalHelpers for BigDecimal {
    fn round2(&self) -> BigDecimal {
        self.with_scale_round(2, RoundingMode::HalfUp)
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

impl BigDecimalHelpers for Option<BigDecimal> {
    fn round2(&self) -> BigDecimal {
        self.as_ref()
            .map(|bd| bd.round2())
            .unwrap_or_else(BigDecimal::default)
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.as_ref()
            .map(|bd| bd.to_f64().unwrap_or(0.0))
            .unwrap_or(0.0)
    }
}

/// Validate and parse a non-negative amount string.
pub fn parse_amount(amount_str: &str) -> Result<BigDecimal, String> {
    use std::str::FromStr;

    BigDecimal::from_str(amount_str.trim())
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if amount < BigDecimal::default() {
                Err("Amount cannot be negative".to_string())
            } else {
                Ok(amount)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round2() {
        assert_eq!(dec("75.005").round2(), dec("75.01"));
        assert_eq!(dec("75.004").round2(), dec("75.00"));
        assert_eq!(dec("100").round2(), dec("100.00"));
    }

    #[test]
    fn test_round2_none_defaults_to_zero() {
        let missing: Option<BigDecimal> = None;
        assert_eq!(missing.round2(), BigDecimal::default());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("600.00"), Ok(dec("600.00")));
        assert_eq!(parse_amount(" 100 "), Ok(dec("100")));
        assert_eq!(
            parse_amount("-100"),
            Err("Amount cannot be negative".to_string())
        );
        assert_eq!(parse_amount("abc"), Err("Invalid amount format".to_string()));
    }
}
