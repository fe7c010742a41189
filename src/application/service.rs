use super::activity::ActivityLogger;
use super::agreements::{AgreementStore, CreateOutcome};
use super::processor::PaymentProcessor;
use super::retry::{RetryCoordinator, RetryOutcome};
use crate::domain::activity::ActivityLogEntry;
use crate::domain::agreement::{Agreement, AgreementId};
use crate::domain::eligibility::Eligibility;
use crate::domain::ports::{
    ActivityLogStoreRef, AgreementRepositoryRef, ClockRef, CustomerDirectoryRef, IdGeneratorRef,
};
use crate::domain::retry::RetryRejection;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage and environment collaborators, assembled once by the host.
pub struct ServicePorts {
    pub directory: CustomerDirectoryRef,
    pub agreements: AgreementRepositoryRef,
    pub activity: ActivityLogStoreRef,
    pub clock: ClockRef,
    pub ids: IdGeneratorRef,
}

/// The PayLater facade consumed by the presentation layer.
///
/// Every state-changing call holds one exclusive lock for its whole
/// read-modify-write, so concurrent callers observe the operations one at a
/// time. Rule rejections come back as outcome values; `Err` only signals a
/// storage failure.
pub struct PayLaterService {
    agreements: Arc<AgreementStore>,
    retries: RetryCoordinator,
    processor: Arc<PaymentProcessor>,
    logger: ActivityLogger,
    write_lock: Mutex<()>,
}

impl PayLaterService {
    pub async fn new(ports: ServicePorts) -> Result<Self> {
        let logger = ActivityLogger::new(ports.activity, ports.clock.clone());
        let processor = Arc::new(PaymentProcessor::new(logger.clone(), ports.clock.clone()));
        let agreements = Arc::new(AgreementStore::new(
            ports.directory,
            ports.agreements,
            processor.clone(),
            logger.clone(),
            ports.clock.clone(),
            ports.ids,
        ));
        let retries = RetryCoordinator::new(
            agreements.clone(),
            processor.clone(),
            logger.clone(),
            ports.clock,
        );

        logger.append("PayLater service initialized.", None, None).await?;
        Ok(Self {
            agreements,
            retries,
            processor,
            logger,
            write_lock: Mutex::new(()),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn is_eligible(&self, user_id: &str, cart_id: &str) -> Result<Eligibility> {
        self.agreements.eligibility(user_id, cart_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_agreement(&self, user_id: &str, cart_id: &str) -> Result<CreateOutcome> {
        let _guard = self.write_lock.lock().await;
        self.agreements.create(user_id, cart_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn retry_payment(
        &self,
        agreement_id: &AgreementId,
        installment_index: usize,
    ) -> Result<RetryOutcome> {
        let _guard = self.write_lock.lock().await;
        self.retries
            .retry_payment(agreement_id, installment_index)
            .await
    }

    /// Checks a retry request and reports exactly why it would be rejected.
    pub async fn validate_retry(
        &self,
        agreement_id: &AgreementId,
        installment_index: usize,
    ) -> Result<std::result::Result<(), RetryRejection>> {
        self.retries.validate(agreement_id, installment_index).await
    }

    /// Lists a user's agreements, oldest first, after promoting past-due installments.
    #[tracing::instrument(skip(self))]
    pub async fn list_agreements_for_user(&self, user_id: &str) -> Result<Vec<Agreement>> {
        let _guard = self.write_lock.lock().await;
        self.agreements.list_for_user(user_id).await
    }

    pub async fn read_activity_log(&self, limit: Option<usize>) -> Result<Vec<ActivityLogEntry>> {
        self.logger.read_log(limit).await
    }

    /// Test and demo control: make retries of failed installments fail.
    pub async fn set_simulate_failure(&self, enabled: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.processor.set_simulate_failure(enabled).await
    }

    pub fn simulate_failure(&self) -> bool {
        self.processor.simulate_failure()
    }
}
