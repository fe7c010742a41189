use super::activity::ActivityLogger;
use super::processor::PaymentProcessor;
use crate::domain::agreement::{Agreement, AgreementId};
use crate::domain::eligibility::{self, Eligibility, Ineligibility};
use crate::domain::ports::{
    AgreementRepository, AgreementRepositoryRef, ClockRef, CustomerDirectory,
    CustomerDirectoryRef, IdGeneratorRef, InstallmentUpdate,
};
use crate::domain::schedule::{NUM_INSTALLMENTS, compute_schedule};
use crate::error::{PayLaterError, Result};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Agreement),
    Rejected(Ineligibility),
}

impl CreateOutcome {
    pub fn agreement(&self) -> Option<&Agreement> {
        match self {
            CreateOutcome::Created(agreement) => Some(agreement),
            CreateOutcome::Rejected(_) => None,
        }
    }

    pub fn into_agreement(self) -> Option<Agreement> {
        match self {
            CreateOutcome::Created(agreement) => Some(agreement),
            CreateOutcome::Rejected(_) => None,
        }
    }
}

/// Owns the agreement collection: creation, lookup and the due-date sweep.
pub struct AgreementStore {
    directory: CustomerDirectoryRef,
    repository: AgreementRepositoryRef,
    processor: Arc<PaymentProcessor>,
    logger: ActivityLogger,
    clock: ClockRef,
    ids: IdGeneratorRef,
}

impl AgreementStore {
    pub fn new(
        directory: CustomerDirectoryRef,
        repository: AgreementRepositoryRef,
        processor: Arc<PaymentProcessor>,
        logger: ActivityLogger,
        clock: ClockRef,
        ids: IdGeneratorRef,
    ) -> Self {
        Self {
            directory,
            repository,
            processor,
            logger,
            clock,
            ids,
        }
    }

    pub async fn eligibility(&self, user_id: &str, cart_id: &str) -> Result<Eligibility> {
        let user = self.directory.user(user_id).await?;
        let cart = self.directory.cart(cart_id).await?;
        Ok(eligibility::evaluate(user.as_ref(), cart.as_ref()))
    }

    /// Creates an agreement for an eligible user/cart pair and charges its
    /// first installment.
    ///
    /// The first charge runs before the agreement is written, so the store
    /// receives the complete agreement in a single insert.
    pub async fn create(&self, user_id: &str, cart_id: &str) -> Result<CreateOutcome> {
        let user = self.directory.user(user_id).await?;
        let cart = self.directory.cart(cart_id).await?;

        let cart = match (eligibility::evaluate(user.as_ref(), cart.as_ref()), cart) {
            (Eligibility::Eligible, Some(cart)) => cart,
            (Eligibility::Ineligible(reason), _) => {
                self.logger
                    .append(
                        format!("Agreement creation failed for user {user_id}: {reason}"),
                        Some(user_id),
                        None,
                    )
                    .await?;
                return Ok(CreateOutcome::Rejected(reason));
            }
            (Eligibility::Eligible, None) => {
                return Err(PayLaterError::InternalError(
                    format!("cart {cart_id} vanished during eligibility check").into(),
                ));
            }
        };

        let id = self.ids.next_id(user_id);
        let schedule = compute_schedule(cart.total, NUM_INSTALLMENTS, self.clock.now());
        let mut agreement = Agreement::new(id, user_id, &cart.id, cart.total, schedule);

        self.processor.attempt_charge(&mut agreement, 0).await?;
        self.repository.insert(agreement.clone()).await?;
        self.logger
            .append(
                format!("Agreement {} created for user {user_id}.", agreement.id),
                Some(user_id),
                Some(&agreement.id),
            )
            .await?;

        tracing::info!(agreement_id = %agreement.id, total = %agreement.total_amount, "agreement created");
        Ok(CreateOutcome::Created(agreement))
    }

    pub async fn get(&self, agreement_id: &AgreementId) -> Result<Option<Agreement>> {
        self.repository.get(agreement_id).await
    }

    /// Persists the current state of one installment.
    pub async fn save_installment(&self, agreement: &Agreement, index: usize) -> Result<()> {
        let update = InstallmentUpdate::from_agreement(agreement, index).ok_or_else(|| {
            PayLaterError::UnknownInstallment {
                agreement_id: agreement.id.to_string(),
                index,
            }
        })?;
        self.repository.update_installment(update).await
    }

    /// Promotes past-due UPCOMING installments across every stored agreement.
    ///
    /// Returns all agreements, oldest first, in their promoted state.
    pub async fn sweep_due(&self) -> Result<Vec<Agreement>> {
        let now = self.clock.now();
        let mut agreements = self.repository.all().await?;
        for agreement in &mut agreements {
            for index in agreement.promote_due(now) {
                self.save_installment(agreement, index).await?;
            }
        }
        Ok(agreements)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Agreement>> {
        let agreements = self.sweep_due().await?;
        Ok(agreements
            .into_iter()
            .filter(|agreement| agreement.user_id == user_id)
            .collect())
    }
}
