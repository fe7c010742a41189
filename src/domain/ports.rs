use super::activity::ActivityLogEntry;
use super::agreement::{Agreement, AgreementId, AgreementStatus, InstallmentStatus};
use super::customer::{Cart, User};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Read access to the account system's users and carts.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn user(&self, user_id: &str) -> Result<Option<User>>;
    async fn cart(&self, cart_id: &str) -> Result<Option<Cart>>;
    async fn carts_for_user(&self, user_id: &str) -> Result<Vec<Cart>>;
}

/// A single-installment write, together with the agreement status it leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentUpdate {
    pub agreement_id: AgreementId,
    pub index: usize,
    pub status: InstallmentStatus,
    /// Only applied when `status` is PAID.
    pub payment_date: Option<DateTime<Utc>>,
    pub agreement_status: AgreementStatus,
}

impl InstallmentUpdate {
    /// Captures the current state of installment `index` of `agreement`.
    ///
    /// Returns `None` if the index is out of range.
    pub fn from_agreement(agreement: &Agreement, index: usize) -> Option<Self> {
        let installment = agreement.installment(index)?;
        Some(Self {
            agreement_id: agreement.id.clone(),
            index,
            status: installment.status,
            payment_date: installment.payment_date,
            agreement_status: agreement.status,
        })
    }
}

#[async_trait]
pub trait AgreementRepository: Send + Sync {
    /// Stores a new agreement and its whole schedule as one atomic write.
    async fn insert(&self, agreement: Agreement) -> Result<()>;
    async fn get(&self, agreement_id: &AgreementId) -> Result<Option<Agreement>>;
    /// All agreements, oldest created first.
    async fn all(&self) -> Result<Vec<Agreement>>;
    async fn update_installment(&self, update: InstallmentUpdate) -> Result<()>;
}

#[async_trait]
pub trait ActivityLogStore: Send + Sync {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()>;
    /// Entries newest first, at most `limit` of them when given.
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<ActivityLogEntry>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator: Send + Sync {
    /// Returns an id never handed out before by this generator.
    fn next_id(&self, user_id: &str) -> AgreementId;
}

pub type CustomerDirectoryRef = Arc<dyn CustomerDirectory>;
pub type AgreementRepositoryRef = Arc<dyn AgreementRepository>;
pub type ActivityLogStoreRef = Arc<dyn ActivityLogStore>;
pub type ClockRef = Arc<dyn Clock>;
pub type IdGeneratorRef = Arc<dyn IdGenerator>;
