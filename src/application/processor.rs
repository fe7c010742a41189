use super::activity::ActivityLogger;
use crate::domain::agreement::{Agreement, AgreementStatus, InstallmentStatus};
use crate::domain::ports::ClockRef;
use crate::error::{PayLaterError, Result};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeOutcome {
    /// The installment is now PAID. `completed` is set when it was the last one.
    Succeeded { completed: bool },
    /// The simulated gateway declined a retry.
    Failed,
}

/// Drives installment charges and the resulting agreement status.
///
/// Charges are simulated: the only way a charge fails is the
/// `simulate_failure` switch, and even then only for an installment that had
/// already failed before. A first charge always goes through.
pub struct PaymentProcessor {
    logger: ActivityLogger,
    clock: ClockRef,
    simulate_failure: AtomicBool,
}

impl PaymentProcessor {
    pub fn new(logger: ActivityLogger, clock: ClockRef) -> Self {
        Self {
            logger,
            clock,
            simulate_failure: AtomicBool::new(false),
        }
    }

    pub fn simulate_failure(&self) -> bool {
        self.simulate_failure.load(Ordering::SeqCst)
    }

    pub async fn set_simulate_failure(&self, enabled: bool) -> Result<()> {
        self.simulate_failure.store(enabled, Ordering::SeqCst);
        let state = if enabled { "ENABLED" } else { "DISABLED" };
        self.logger
            .append(format!("Payment failure simulation {state}."), None, None)
            .await
    }

    /// Charges installment `index` of `agreement` in place.
    ///
    /// The caller is responsible for persisting the mutated agreement.
    #[tracing::instrument(skip(self, agreement), fields(agreement_id = %agreement.id))]
    pub async fn attempt_charge(
        &self,
        agreement: &mut Agreement,
        index: usize,
    ) -> Result<ChargeOutcome> {
        let was_already_failed = agreement
            .installment(index)
            .ok_or_else(|| PayLaterError::UnknownInstallment {
                agreement_id: agreement.id.to_string(),
                index,
            })?
            .status
            == InstallmentStatus::Failed;
        let number = index + 1;

        self.logger
            .append(
                format!(
                    "Attempting charge for installment {number} of agreement {}.",
                    agreement.id
                ),
                Some(&agreement.user_id),
                Some(&agreement.id),
            )
            .await?;

        if self.simulate_failure() && was_already_failed {
            agreement.schedule[index].status = InstallmentStatus::Failed;
            agreement.status = AgreementStatus::Failed;
            tracing::warn!(installment = number, "simulated charge failure");
            self.logger
                .append(
                    format!("Charge FAILED for installment {number} (Simulated)."),
                    Some(&agreement.user_id),
                    Some(&agreement.id),
                )
                .await?;
            return Ok(ChargeOutcome::Failed);
        }

        let installment = &mut agreement.schedule[index];
        installment.status = InstallmentStatus::Paid;
        installment.payment_date = Some(self.clock.now());
        self.logger
            .append(
                format!("Charge SUCCEEDED for installment {number}."),
                Some(&agreement.user_id),
                Some(&agreement.id),
            )
            .await?;

        let completed = agreement.is_fully_paid();
        if completed {
            agreement.status = AgreementStatus::Completed;
            self.logger
                .append(
                    format!("Agreement {} is now fully PAID.", agreement.id),
                    Some(&agreement.user_id),
                    Some(&agreement.id),
                )
                .await?;
        } else if agreement.status == AgreementStatus::Failed {
            agreement.status = AgreementStatus::Active;
        }

        Ok(ChargeOutcome::Succeeded { completed })
    }
}
