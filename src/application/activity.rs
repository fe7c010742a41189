use crate::domain::activity::ActivityLogEntry;
use crate::domain::agreement::AgreementId;
use crate::domain::ports::{ActivityLogStore, ActivityLogStoreRef, ClockRef};
use crate::error::Result;

/// Append-only audit trail of every state change.
///
/// Entries are stamped with the injected clock and stored newest first.
/// Each entry is mirrored as a `tracing` event for operators.
#[derive(Clone)]
pub struct ActivityLogger {
    store: ActivityLogStoreRef,
    clock: ClockRef,
}

impl ActivityLogger {
    pub fn new(store: ActivityLogStoreRef, clock: ClockRef) -> Self {
        Self { store, clock }
    }

    pub async fn append(
        &self,
        message: impl Into<String>,
        user_id: Option<&str>,
        agreement_id: Option<&AgreementId>,
    ) -> Result<()> {
        let mut entry = ActivityLogEntry::new(self.clock.now(), message);
        if let Some(user_id) = user_id {
            entry = entry.with_user(user_id);
        }
        if let Some(agreement_id) = agreement_id {
            entry = entry.with_agreement(agreement_id.clone());
        }

        tracing::info!(
            target: "paylater::activity",
            user_id = ?entry.related_user_id,
            agreement_id = ?entry.related_agreement_id.as_ref().map(AgreementId::as_str),
            "{}",
            entry.message
        );
        self.store.append(entry).await
    }

    /// Returns an owned copy of the newest `limit` entries (all when `None`).
    pub async fn read_log(&self, limit: Option<usize>) -> Result<Vec<ActivityLogEntry>> {
        self.store.recent(limit).await
    }
}
