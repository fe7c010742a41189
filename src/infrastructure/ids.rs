use crate::domain::agreement::AgreementId;
use crate::domain::ports::IdGenerator;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Hands out `PL-000001-<user>`, `PL-000002-<user>`, ...
///
/// The counter is shared by all users, so two calls never collide even for
/// the same user within the same instant.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Continues numbering after ids already persisted elsewhere.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self, user_id: &str) -> AgreementId {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        AgreementId::new(format!("PL-{sequence:06}-{user_id}"))
    }
}

/// Random v4 ids, for hosts that create agreements from several processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, _user_id: &str) -> AgreementId {
        AgreementId::new(format!("PL-{}", Uuid::new_v4()))
    }
}
