mod common;

use chrono::Duration;
use common::Harness;
use paylater::domain::agreement::{AgreementId, AgreementStatus, InstallmentStatus};
use paylater::domain::retry::RetryRejection;

const REJECTED: &str = "Retry failed: Installment not found or not in FAILED state.";

#[tokio::test]
async fn test_retry_unknown_agreement() {
    let h = Harness::new().await;
    let missing = AgreementId::new("PL-999999-U001");

    let outcome = h.service.retry_payment(&missing, 0).await.unwrap();

    assert!(outcome.is_rejected());
    assert_eq!(
        h.service.validate_retry(&missing, 0).await.unwrap(),
        Err(RetryRejection::AgreementNotFound)
    );
    let log = h.service.read_activity_log(Some(1)).await.unwrap();
    assert_eq!(log[0].message, REJECTED);
    assert_eq!(log[0].related_agreement_id, None);
}

#[tokio::test]
async fn test_retry_index_out_of_range() {
    let h = Harness::new().await;
    let id = h.create("U001", "C001").await;

    let outcome = h.service.retry_payment(&id, 3).await.unwrap();

    assert!(outcome.is_rejected());
    assert_eq!(
        h.service.validate_retry(&id, 3).await.unwrap(),
        Err(RetryRejection::IndexOutOfRange { index: 3, len: 3 })
    );
}

#[tokio::test]
async fn test_retry_of_non_failed_leaves_state_untouched() {
    let h = Harness::new().await;
    let id = h.create("U001", "C001").await;
    h.clock.advance(Duration::days(30));
    let before = h.service.list_agreements_for_user("U001").await.unwrap();
    assert_eq!(before[0].schedule[1].status, InstallmentStatus::Due);
    let log_len = h.messages().await.len();

    for index in 0..3 {
        let outcome = h.service.retry_payment(&id, index).await.unwrap();
        assert!(outcome.is_rejected(), "index {index}");
    }

    let after = h.service.list_agreements_for_user("U001").await.unwrap();
    assert_eq!(before, after);
    let messages = h.messages().await;
    assert_eq!(messages.len(), log_len + 3);
    assert!(messages[..3].iter().all(|m| m == REJECTED));
}

#[tokio::test]
async fn test_failed_retry_logs_attempt_and_simulated_failure() {
    let h = Harness::new().await;
    let id = h.create("U001", "C001").await;
    h.force_failed(&id, 2).await;
    h.service.set_simulate_failure(true).await.unwrap();
    assert!(h.service.simulate_failure());

    h.service.retry_payment(&id, 2).await.unwrap();

    let messages = h.messages().await;
    assert_eq!(messages[0], "Charge FAILED for installment 3 (Simulated).");
    assert_eq!(
        messages[1],
        format!("Attempting charge for installment 3 of agreement {id}.")
    );
    assert_eq!(messages[2], "Payment failure simulation ENABLED.");
}

#[tokio::test]
async fn test_simulation_flag_only_affects_failed_installments() {
    let h = Harness::new().await;
    h.service.set_simulate_failure(true).await.unwrap();

    let agreement = h
        .service
        .create_agreement("U001", "C001")
        .await
        .unwrap()
        .into_agreement()
        .unwrap();

    assert_eq!(agreement.schedule[0].status, InstallmentStatus::Paid);
    assert_eq!(agreement.status, AgreementStatus::Active);
}

#[tokio::test]
async fn test_partial_recovery_reactivates_agreement() {
    let h = Harness::new().await;
    let id = h.create("U008", "C009").await;
    h.force_failed(&id, 1).await;
    h.force_failed(&id, 2).await;

    h.service.retry_payment(&id, 1).await.unwrap();

    let agreement = h.service.list_agreements_for_user("U008").await.unwrap().remove(0);
    assert_eq!(agreement.schedule[1].status, InstallmentStatus::Paid);
    assert_eq!(agreement.status, AgreementStatus::Active);
    assert!(agreement.has_failed_installments());
    assert_eq!(agreement.count_failed_installments(), 1);
    assert_eq!(agreement.failed_installment_index(), Some(2));
}
