use crate::error::PayLaterError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive monetary amount in the cart's currency unit.
///
/// Wraps `rust_decimal::Decimal` so that totals and installment amounts can
/// never be zero or negative once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PayLaterError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PayLaterError::ValidationError(format!(
                "Amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Splits the amount into `parts` equal shares.
    ///
    /// No remainder is redistributed: `share * parts` may differ from the
    /// original amount by the division's rounding error. Returns `None` when
    /// `parts` is zero.
    pub fn split(&self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        Some(Self(self.0 / Decimal::from(parts)))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PayLaterError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}
