use super::agreement::AgreementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable line of the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub related_user_id: Option<String>,
    pub related_agreement_id: Option<AgreementId>,
}

impl ActivityLogEntry {
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
            related_user_id: None,
            related_agreement_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.related_user_id = Some(user_id.into());
        self
    }

    pub fn with_agreement(mut self, agreement_id: AgreementId) -> Self {
        self.related_agreement_id = Some(agreement_id);
        self
    }
}
