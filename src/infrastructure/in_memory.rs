use crate::domain::activity::ActivityLogEntry;
use crate::domain::agreement::{Agreement, AgreementId, InstallmentStatus};
use crate::domain::customer::{Cart, User};
use crate::domain::ports::{
    ActivityLogStore, AgreementRepository, CustomerDirectory, InstallmentUpdate,
};
use crate::error::{PayLaterError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Users and carts held in memory, typically loaded from seed files.
#[derive(Default, Clone)]
pub struct InMemoryCustomerDirectory {
    users: Arc<RwLock<HashMap<String, User>>>,
    carts: Arc<RwLock<Vec<Cart>>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(users: Vec<User>, carts: Vec<Cart>) -> Self {
        Self {
            users: Arc::new(RwLock::new(
                users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            )),
            carts: Arc::new(RwLock::new(carts)),
        }
    }

    pub async fn add_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Adds a cart, replacing any cart with the same id.
    pub async fn add_cart(&self, cart: Cart) {
        let mut carts = self.carts.write().await;
        carts.retain(|c| c.id != cart.id);
        carts.push(cart);
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn user(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn cart(&self, cart_id: &str) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.iter().find(|c| c.id == cart_id).cloned())
    }

    async fn carts_for_user(&self, user_id: &str) -> Result<Vec<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Agreements kept in insertion order.
///
/// Clones share the same collection.
#[derive(Default, Clone)]
pub struct InMemoryAgreementRepository {
    agreements: Arc<RwLock<Vec<Agreement>>>,
}

impl InMemoryAgreementRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.agreements.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agreements.read().await.is_empty()
    }
}

#[async_trait]
impl AgreementRepository for InMemoryAgreementRepository {
    async fn insert(&self, agreement: Agreement) -> Result<()> {
        self.agreements.write().await.push(agreement);
        Ok(())
    }

    async fn get(&self, agreement_id: &AgreementId) -> Result<Option<Agreement>> {
        let agreements = self.agreements.read().await;
        Ok(agreements.iter().find(|a| &a.id == agreement_id).cloned())
    }

    async fn all(&self) -> Result<Vec<Agreement>> {
        Ok(self.agreements.read().await.clone())
    }

    async fn update_installment(&self, update: InstallmentUpdate) -> Result<()> {
        let mut agreements = self.agreements.write().await;
        let unknown = || PayLaterError::UnknownInstallment {
            agreement_id: update.agreement_id.to_string(),
            index: update.index,
        };

        let agreement = agreements
            .iter_mut()
            .find(|a| a.id == update.agreement_id)
            .ok_or_else(unknown)?;
        let installment = agreement
            .schedule
            .get_mut(update.index)
            .ok_or_else(unknown)?;

        installment.status = update.status;
        if update.status == InstallmentStatus::Paid {
            installment.payment_date = update.payment_date;
        }
        agreement.status = update.agreement_status;
        Ok(())
    }
}

/// Newest-first activity log.
#[derive(Default, Clone)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<VecDeque<ActivityLogEntry>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityLogStore for InMemoryActivityLog {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()> {
        self.entries.write().await.push_front(entry);
        Ok(())
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<ActivityLogEntry>> {
        let entries = self.entries.read().await;
        let limit = limit.unwrap_or(entries.len());
        Ok(entries.iter().take(limit).cloned().collect())
    }
}
