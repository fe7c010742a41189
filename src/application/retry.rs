use super::activity::ActivityLogger;
use super::agreements::AgreementStore;
use super::processor::{ChargeOutcome, PaymentProcessor};
use crate::domain::agreement::AgreementId;
use crate::domain::ports::ClockRef;
use crate::domain::retry::{RetryMetadata, RetryRejection, RetryStrategy, validate_retry_request};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome {
    Charged {
        outcome: ChargeOutcome,
        metadata: RetryMetadata,
    },
    Rejected(RetryRejection),
}

impl RetryOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, RetryOutcome::Rejected(_))
    }
}

/// Validates retry requests and dispatches the valid ones to the processor.
pub struct RetryCoordinator {
    agreements: Arc<AgreementStore>,
    processor: Arc<PaymentProcessor>,
    logger: ActivityLogger,
    clock: ClockRef,
    attempts: Mutex<HashMap<(AgreementId, usize), u32>>,
}

impl RetryCoordinator {
    pub fn new(
        agreements: Arc<AgreementStore>,
        processor: Arc<PaymentProcessor>,
        logger: ActivityLogger,
        clock: ClockRef,
    ) -> Self {
        Self {
            agreements,
            processor,
            logger,
            clock,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Checks a retry request without dispatching it.
    pub async fn validate(
        &self,
        agreement_id: &AgreementId,
        index: usize,
    ) -> Result<std::result::Result<(), RetryRejection>> {
        let agreement = self.agreements.get(agreement_id).await?;
        Ok(validate_retry_request(agreement.as_ref(), index))
    }

    /// Re-attempts the charge of a FAILED installment.
    ///
    /// Anything else leaves state untouched and only appends one log entry.
    pub async fn retry_payment(
        &self,
        agreement_id: &AgreementId,
        index: usize,
    ) -> Result<RetryOutcome> {
        let agreement = self.agreements.get(agreement_id).await?;
        if let Err(rejection) = validate_retry_request(agreement.as_ref(), index) {
            tracing::warn!(%agreement_id, index, reason = %rejection, "retry rejected");
            self.logger
                .append(
                    "Retry failed: Installment not found or not in FAILED state.",
                    agreement.as_ref().map(|a| a.user_id.as_str()),
                    agreement.as_ref().map(|a| &a.id),
                )
                .await?;
            return Ok(RetryOutcome::Rejected(rejection));
        }
        let Some(mut agreement) = agreement else {
            return Ok(RetryOutcome::Rejected(RetryRejection::AgreementNotFound));
        };

        let attempt_number = {
            let mut attempts = self.attempts.lock().await;
            let count = attempts.entry((agreement_id.clone(), index)).or_insert(0);
            *count += 1;
            *count
        };
        let metadata = RetryMetadata::new(
            agreement_id.clone(),
            index,
            attempt_number,
            self.clock.now(),
        );
        tracing::info!(
            %agreement_id,
            index,
            attempt = attempt_number,
            strategy = ?RetryStrategy::for_failures(attempt_number - 1),
            "retrying installment"
        );

        let outcome = self.processor.attempt_charge(&mut agreement, index).await?;
        self.agreements.save_installment(&agreement, index).await?;

        if let ChargeOutcome::Succeeded { .. } = outcome {
            self.attempts
                .lock()
                .await
                .remove(&(agreement_id.clone(), index));
        }
        Ok(RetryOutcome::Charged { outcome, metadata })
    }
}
