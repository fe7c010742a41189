use super::money::Amount;
use crate::error::PayLaterError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The last four digits of a user's default card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardLast4(String);

impl CardLast4 {
    pub fn new(digits: impl Into<String>) -> Result<Self, PayLaterError> {
        let digits = digits.into();
        if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(digits))
        } else {
            Err(PayLaterError::ValidationError(format!(
                "Card suffix must be exactly 4 digits, got {digits:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CardLast4 {
    type Error = PayLaterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CardLast4> for String {
    fn from(value: CardLast4) -> Self {
        value.0
    }
}

/// A shopper as seen by the checkout flow.
///
/// Owned by the external account system; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub is_verified: bool,
    pub successful_transactions: u32,
    pub has_payment_method: bool,
    pub default_payment_last4: Option<CardLast4>,
    pub timezone: String,
    pub locale: String,
}

/// An immutable snapshot of a cart at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub total: Amount,
    pub currency: String,
    /// Carried with the cart record but not consulted by the eligibility rules,
    /// which use the global minimum instead.
    pub eligible_threshold: Decimal,
    pub item_count: u32,
    pub item_name: String,
    pub notes: String,
}
