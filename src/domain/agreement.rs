//! Agreement and installment state.
//!
//! Installment lifecycle:
//! ```text
//! UPCOMING ──► DUE ──► PAID
//!    │          │
//!    └──────────┴──► (charge attempt) ──► PAID | FAILED
//!                                            FAILED ──► PAID | FAILED
//! ```

use super::money::Amount;
use super::schedule::is_due;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstallmentStatus {
    #[default]
    Upcoming,
    Due,
    Paid,
    Failed,
}

impl InstallmentStatus {
    /// Only a failed installment may be retried.
    pub fn can_retry(&self) -> bool {
        matches!(self, InstallmentStatus::Failed)
    }

    /// Returns true while the installment is waiting for its due date.
    pub fn is_pending(&self) -> bool {
        matches!(self, InstallmentStatus::Upcoming | InstallmentStatus::Due)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallmentStatus::Upcoming => "UPCOMING",
            InstallmentStatus::Due => "DUE",
            InstallmentStatus::Paid => "PAID",
            InstallmentStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgreementStatus {
    #[default]
    Active,
    Completed,
    Failed,
}

impl AgreementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementStatus::Active => "ACTIVE",
            AgreementStatus::Completed => "COMPLETED",
            AgreementStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled partial payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub amount: Amount,
    pub due_date: DateTime<Utc>,
    pub status: InstallmentStatus,
    /// Set only when the installment becomes PAID.
    pub payment_date: Option<DateTime<Utc>>,
}

impl Installment {
    pub fn upcoming(amount: Amount, due_date: DateTime<Utc>) -> Self {
        Self {
            amount,
            due_date,
            status: InstallmentStatus::Upcoming,
            payment_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgreementId(String);

impl AgreementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgreementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgreementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A user's commitment to pay a cart total across a fixed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub id: AgreementId,
    pub user_id: String,
    pub cart_id: String,
    pub total_amount: Amount,
    pub status: AgreementStatus,
    pub schedule: Vec<Installment>,
}

impl Agreement {
    /// Creates an ACTIVE agreement over an already generated schedule.
    pub fn new(
        id: AgreementId,
        user_id: impl Into<String>,
        cart_id: impl Into<String>,
        total_amount: Amount,
        schedule: Vec<Installment>,
    ) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            cart_id: cart_id.into(),
            total_amount,
            status: AgreementStatus::Active,
            schedule,
        }
    }

    pub fn installment(&self, index: usize) -> Option<&Installment> {
        self.schedule.get(index)
    }

    /// Promotes every UPCOMING installment whose due date has passed to DUE.
    ///
    /// Returns the indexes that changed.
    pub fn promote_due(&mut self, now: DateTime<Utc>) -> Vec<usize> {
        let mut promoted = Vec::new();
        for (index, installment) in self.schedule.iter_mut().enumerate() {
            if installment.status == InstallmentStatus::Upcoming && is_due(installment.due_date, now) {
                installment.status = InstallmentStatus::Due;
                promoted.push(index);
            }
        }
        promoted
    }

    pub fn is_fully_paid(&self) -> bool {
        self.schedule
            .iter()
            .all(|installment| installment.status == InstallmentStatus::Paid)
    }

    pub fn failed_installment_index(&self) -> Option<usize> {
        self.schedule
            .iter()
            .position(|installment| installment.status.can_retry())
    }

    pub fn has_failed_installments(&self) -> bool {
        self.failed_installment_index().is_some()
    }

    pub fn count_failed_installments(&self) -> usize {
        self.schedule
            .iter()
            .filter(|installment| installment.status.can_retry())
            .count()
    }

    /// Sum of all scheduled amounts. Equal to `total_amount` up to rounding.
    pub fn scheduled_total(&self) -> Decimal {
        self.schedule
            .iter()
            .map(|installment| installment.amount.value())
            .sum()
    }
}
