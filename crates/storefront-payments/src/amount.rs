//! Amounts and currencies accepted by the checkout.
//!
//! Amounts always travel in the currency's minor unit (cents for USD). The
//! browser sends a bare JSON number, so [`MinorUnits`] is the single place that
//! decides what a valid charge looks like before anything reaches the processor.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::constants::MAX_AMOUNT_MINOR_UNITS;
use crate::error::PaymentError;

/// Settlement currency. The storefront only sells in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
}

impl Currency {
    /// ISO 4217 code in the lowercase form the processor expects.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A strictly positive amount in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "serde_json::Number")]
pub struct MinorUnits(u64);

impl MinorUnits {
    pub fn new(value: i64) -> Result<Self, PaymentError> {
        if value <= 0 {
            return Err(PaymentError::InvalidAmount(format!(
                "amount must be a positive number of minor units, got {value}"
            )));
        }
        let value = value as u64;
        if value > MAX_AMOUNT_MINOR_UNITS {
            return Err(PaymentError::InvalidAmount(format!(
                "amount {value} exceeds the maximum of {MAX_AMOUNT_MINOR_UNITS}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<serde_json::Number> for MinorUnits {
    type Error = PaymentError;

    fn try_from(n: serde_json::Number) -> Result<Self, Self::Error> {
        if let Some(v) = n.as_i64() {
            return MinorUnits::new(v);
        }
        if n.as_u64().is_some() {
            return Err(PaymentError::InvalidAmount(format!(
                "amount {n} exceeds the maximum of {MAX_AMOUNT_MINOR_UNITS}"
            )));
        }
        Err(PaymentError::InvalidAmount(format!(
            "amount must be an integer number of minor units, got {n}"
        )))
    }
}

impl Serialize for MinorUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integer() {
        let amount = MinorUnits::new(500).unwrap();
        assert_eq!(amount.get(), 500);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(MinorUnits::new(0).is_err());
        assert!(MinorUnits::new(-1).is_err());
    }

    #[test]
    fn rejects_amount_above_processor_maximum() {
        assert!(MinorUnits::new(MAX_AMOUNT_MINOR_UNITS as i64).is_ok());
        let err = MinorUnits::new(MAX_AMOUNT_MINOR_UNITS as i64 + 1).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn deserializes_from_json_integer() {
        let amount: MinorUnits = serde_json::from_str("1999").unwrap();
        assert_eq!(amount.get(), 1999);
    }

    #[test]
    fn fractional_json_number_is_rejected() {
        let result: Result<MinorUnits, _> = serde_json::from_str("19.99");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("integer number of minor units"), "{err}");
    }

    #[test]
    fn huge_unsigned_json_number_is_rejected() {
        let result: Result<MinorUnits, _> = serde_json::from_str("18446744073709551615");
        assert!(result.is_err());
    }

    #[test]
    fn string_amount_is_rejected() {
        let result: Result<MinorUnits, _> = serde_json::from_str("\"500\"");
        assert!(result.is_err());
    }

    #[test]
    fn currency_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"usd\"");
        assert_eq!(Currency::Usd.to_string(), "usd");
    }
}
