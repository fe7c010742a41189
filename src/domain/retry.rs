use super::agreement::{Agreement, AgreementId, InstallmentStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Why a retry request was not dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryRejection {
    #[error("Agreement not found")]
    AgreementNotFound,
    #[error("Invalid installment index {index} (schedule has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Installment is not in FAILED status (current: {status})")]
    NotFailed { status: InstallmentStatus },
}

/// Checks that `index` names a FAILED installment of `agreement`.
pub fn validate_retry_request(
    agreement: Option<&Agreement>,
    index: usize,
) -> Result<(), RetryRejection> {
    let agreement = agreement.ok_or(RetryRejection::AgreementNotFound)?;
    let installment = agreement
        .installment(index)
        .ok_or(RetryRejection::IndexOutOfRange {
            index,
            len: agreement.schedule.len(),
        })?;

    if installment.status.can_retry() {
        Ok(())
    } else {
        Err(RetryRejection::NotFailed {
            status: installment.status,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    Immediate,
    Delayed,
    Scheduled,
}

impl RetryStrategy {
    /// Recommended strategy given how many times the charge already failed.
    pub fn for_failures(failure_count: u32) -> Self {
        match failure_count {
            0 => RetryStrategy::Immediate,
            1 | 2 => RetryStrategy::Delayed,
            _ => RetryStrategy::Scheduled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryMetadata {
    pub agreement_id: AgreementId,
    pub installment_index: usize,
    pub timestamp: DateTime<Utc>,
    pub attempt_number: u32,
}

impl RetryMetadata {
    pub fn new(
        agreement_id: AgreementId,
        installment_index: usize,
        attempt_number: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            agreement_id,
            installment_index,
            timestamp,
            attempt_number,
        }
    }
}
