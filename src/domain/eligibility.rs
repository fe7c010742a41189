use super::customer::{Cart, User};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use thiserror::Error;

/// Smallest cart total that may be split into installments.
pub const MIN_ELIGIBLE_AMOUNT: Decimal = dec!(30.00);

/// Why a user/cart pair was turned down.
///
/// The `Display` text is stable and doubles as the user-facing reason.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    #[error("User or cart not found.")]
    NotFound,
    #[error("This cart does not belong to the selected user.")]
    CartOwnerMismatch,
    #[error("Order total must be at least ${minimum:.2}.")]
    BelowMinimum { minimum: Decimal },
    #[error("User account is not verified.")]
    Unverified,
    #[error("No payment method linked to account.")]
    NoPaymentMethod,
    #[error("Requires at least one successful past transaction.")]
    NoTransactionHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible(Ineligibility),
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::Eligible => f.write_str("User is eligible for PayLater."),
            Eligibility::Ineligible(reason) => write!(f, "{reason}"),
        }
    }
}

/// Checks a user/cart pair against the PayLater rules.
///
/// Rules run in a fixed order and the first failing one is reported.
pub fn evaluate(user: Option<&User>, cart: Option<&Cart>) -> Eligibility {
    let (Some(user), Some(cart)) = (user, cart) else {
        return Eligibility::Ineligible(Ineligibility::NotFound);
    };

    let rejection = if cart.user_id != user.id {
        Some(Ineligibility::CartOwnerMismatch)
    } else if cart.total.value() < MIN_ELIGIBLE_AMOUNT {
        Some(Ineligibility::BelowMinimum {
            minimum: MIN_ELIGIBLE_AMOUNT,
        })
    } else if !user.is_verified {
        Some(Ineligibility::Unverified)
    } else if !user.has_payment_method {
        Some(Ineligibility::NoPaymentMethod)
    } else if user.successful_transactions < 1 {
        Some(Ineligibility::NoTransactionHistory)
    } else {
        None
    };

    match rejection {
        Some(reason) => Eligibility::Ineligible(reason),
        None => Eligibility::Eligible,
    }
}
