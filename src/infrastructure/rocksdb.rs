use crate::domain::activity::ActivityLogEntry;
use crate::domain::agreement::{Agreement, AgreementId, InstallmentStatus};
use crate::domain::ports::{ActivityLogStore, AgreementRepository, InstallmentUpdate};
use crate::error::{PayLaterError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Column Family for agreements, keyed by agreement id.
pub const CF_AGREEMENTS: &str = "agreements";
/// Column Family for the activity log, keyed by big-endian sequence number.
pub const CF_ACTIVITY: &str = "activity";

/// An agreement together with its creation sequence.
///
/// The whole schedule lives inside the same value, so inserting an agreement
/// is a single put and can never leave a partial schedule behind.
#[derive(Serialize, Deserialize)]
struct StoredAgreement {
    sequence: u64,
    agreement: Agreement,
}

/// A persistent store implementation using RocksDB.
///
/// Clones share the underlying `Arc<DB>` and sequence counters.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    next_agreement: Arc<AtomicU64>,
    next_entry: Arc<AtomicU64>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at `path`.
    ///
    /// Sequence counters resume after whatever is already stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_agreements = ColumnFamilyDescriptor::new(CF_AGREEMENTS, Options::default());
        let cf_activity = ColumnFamilyDescriptor::new(CF_ACTIVITY, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_agreements, cf_activity])?;
        let store = Self {
            db: Arc::new(db),
            next_agreement: Arc::new(AtomicU64::new(0)),
            next_entry: Arc::new(AtomicU64::new(0)),
        };

        let last_agreement = store
            .stored_agreements()?
            .iter()
            .map(|stored| stored.sequence + 1)
            .max()
            .unwrap_or(0);
        store.next_agreement.store(last_agreement, Ordering::SeqCst);

        let last_entry = {
            let cf = store.cf(CF_ACTIVITY)?;
            match store.db.iterator_cf(cf, IteratorMode::End).next() {
                Some(item) => {
                    let (key, _) = item?;
                    decode_sequence(&key)? + 1
                }
                None => 0,
            }
        };
        store.next_entry.store(last_entry, Ordering::SeqCst);

        Ok(store)
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PayLaterError::InternalError(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn stored_agreements(&self) -> Result<Vec<StoredAgreement>> {
        let cf = self.cf(CF_AGREEMENTS)?;
        let mut stored = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            stored.push(serde_json::from_slice::<StoredAgreement>(&value)?);
        }
        stored.sort_by_key(|s| s.sequence);
        Ok(stored)
    }

    fn load(&self, agreement_id: &AgreementId) -> Result<Option<StoredAgreement>> {
        let cf = self.cf(CF_AGREEMENTS)?;
        match self.db.get_cf(cf, agreement_id.as_str().as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, stored: &StoredAgreement) -> Result<()> {
        let cf = self.cf(CF_AGREEMENTS)?;
        let value = serde_json::to_vec(stored)?;
        self.db
            .put_cf(cf, stored.agreement.id.as_str().as_bytes(), value)?;
        Ok(())
    }
}

fn decode_sequence(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        PayLaterError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Malformed activity key of {} bytes", key.len()),
        )))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

#[async_trait]
impl AgreementRepository for RocksDBStore {
    async fn insert(&self, agreement: Agreement) -> Result<()> {
        let sequence = self.next_agreement.fetch_add(1, Ordering::SeqCst);
        self.save(&StoredAgreement {
            sequence,
            agreement,
        })
    }

    async fn get(&self, agreement_id: &AgreementId) -> Result<Option<Agreement>> {
        Ok(self.load(agreement_id)?.map(|stored| stored.agreement))
    }

    async fn all(&self) -> Result<Vec<Agreement>> {
        Ok(self
            .stored_agreements()?
            .into_iter()
            .map(|stored| stored.agreement)
            .collect())
    }

    async fn update_installment(&self, update: InstallmentUpdate) -> Result<()> {
        let unknown = || PayLaterError::UnknownInstallment {
            agreement_id: update.agreement_id.to_string(),
            index: update.index,
        };

        let mut stored = self.load(&update.agreement_id)?.ok_or_else(unknown)?;
        let installment = stored
            .agreement
            .schedule
            .get_mut(update.index)
            .ok_or_else(unknown)?;

        installment.status = update.status;
        if update.status == InstallmentStatus::Paid {
            installment.payment_date = update.payment_date;
        }
        stored.agreement.status = update.agreement_status;
        self.save(&stored)
    }
}

#[async_trait]
impl ActivityLogStore for RocksDBStore {
    async fn append(&self, entry: ActivityLogEntry) -> Result<()> {
        let cf = self.cf(CF_ACTIVITY)?;
        let key = self.next_entry.fetch_add(1, Ordering::SeqCst).to_be_bytes();
        let value = serde_json::to_vec(&entry)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<ActivityLogEntry>> {
        let cf = self.cf(CF_ACTIVITY)?;
        let limit = limit.unwrap_or(usize::MAX);
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::End).take(limit) {
            let (_key, value) = item?;
            entries.push(serde_json::from_slice(&value)?);
        }
        Ok(entries)
    }
}
