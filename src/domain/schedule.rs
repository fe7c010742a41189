use super::agreement::Installment;
use super::money::Amount;
use chrono::{DateTime, Duration, Utc};

/// Number of installments in every PayLater plan.
pub const NUM_INSTALLMENTS: usize = 3;

/// Days between consecutive due dates.
pub const INSTALLMENT_INTERVAL_DAYS: i64 = 30;

/// Builds the installment plan for `total`.
///
/// Every installment gets `total / num_installments` with no remainder
/// correction. The first one is due at `start`, each following one
/// `INSTALLMENT_INTERVAL_DAYS` later. All start out UPCOMING.
pub fn compute_schedule(
    total: Amount,
    num_installments: usize,
    start: DateTime<Utc>,
) -> Vec<Installment> {
    let Some(share) = total.split(num_installments) else {
        return Vec::new();
    };

    (0..num_installments)
        .map(|index| Installment::upcoming(share, due_date(index, start)))
        .collect()
}

pub fn due_date(index: usize, start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::days(index as i64 * INSTALLMENT_INTERVAL_DAYS)
}

pub fn is_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    due_date <= now
}

/// Human-readable offset of an installment, e.g. "Today" or "in 30 days".
pub fn due_label(index: usize) -> String {
    if index == 0 {
        "Today".to_string()
    } else {
        format!("in {} days", index as i64 * INSTALLMENT_INTERVAL_DAYS)
    }
}
