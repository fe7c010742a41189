mod common;

use chrono::Duration;
use common::Harness;
use paylater::domain::agreement::InstallmentStatus;
use paylater::domain::ports::AgreementRepository;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_listing_is_scoped_to_user_and_ordered() {
    let h = Harness::new().await;
    let first = h.create("U001", "C001").await;
    let other = h.create("U006", "C007").await;
    let second = h.create("U001", "C002").await;

    let listed = h.service.list_agreements_for_user("U001").await.unwrap();

    let ids: Vec<_> = listed.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(listed.iter().all(|a| a.user_id == "U001"));

    let theirs = h.service.list_agreements_for_user("U006").await.unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].id, other);
    assert!(
        h.service
            .list_agreements_for_user("U404")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_repeated_creation_yields_distinct_ids() {
    let h = Harness::new().await;

    let a = h.create("U001", "C001").await;
    let b = h.create("U001", "C001").await;

    assert_ne!(a, b);
    assert_eq!(a.as_str(), "PL-000001-U001");
    assert_eq!(b.as_str(), "PL-000002-U001");
}

#[tokio::test]
async fn test_concurrent_creation_is_serialised() {
    let h = Harness::new().await;
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_agreement("U006", "C007")
                .await
                .unwrap()
                .into_agreement()
                .unwrap()
                .id
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 10);
    assert_eq!(h.repository.len().await, 10);
}

async fn statuses(h: &Harness, user: &str) -> Vec<InstallmentStatus> {
    h.service.list_agreements_for_user(user).await.unwrap()[0]
        .schedule
        .iter()
        .map(|installment| installment.status)
        .collect()
}

#[tokio::test]
async fn test_installments_become_due_as_time_passes() {
    let h = Harness::new().await;
    h.create("U001", "C001").await;

    use InstallmentStatus::{Due, Paid, Upcoming};
    assert_eq!(statuses(&h, "U001").await, vec![Paid, Upcoming, Upcoming]);

    h.clock.advance(Duration::days(30) - Duration::seconds(1));
    assert_eq!(statuses(&h, "U001").await, vec![Paid, Upcoming, Upcoming]);

    h.clock.advance(Duration::seconds(1));
    assert_eq!(statuses(&h, "U001").await, vec![Paid, Due, Upcoming]);

    h.clock.advance(Duration::days(90));
    assert_eq!(statuses(&h, "U001").await, vec![Paid, Due, Due]);

    // The promotion is persisted, not just derived for the caller.
    let stored = h.repository.all().await.unwrap();
    assert_eq!(stored[0].schedule[2].status, Due);
}

#[tokio::test]
async fn test_failed_installment_is_never_promoted() {
    let h = Harness::new().await;
    let id = h.create("U001", "C001").await;
    h.force_failed(&id, 1).await;

    h.clock.advance(Duration::days(45));
    let agreement = h.service.list_agreements_for_user("U001").await.unwrap().remove(0);

    assert_eq!(agreement.schedule[1].status, InstallmentStatus::Failed);
}

#[tokio::test]
async fn test_activity_log_limit_and_order() {
    let h = Harness::new().await;
    h.create("U001", "C001").await;
    h.service.set_simulate_failure(true).await.unwrap();
    h.service.set_simulate_failure(false).await.unwrap();

    let all = h.service.read_activity_log(None).await.unwrap();
    let messages: Vec<&str> = all.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Payment failure simulation DISABLED.",
            "Payment failure simulation ENABLED.",
            "Agreement PL-000001-U001 created for user U001.",
            "Charge SUCCEEDED for installment 1.",
            "Attempting charge for installment 1 of agreement PL-000001-U001.",
            "PayLater service initialized.",
        ]
    );
    assert!(all.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    let limited = h.service.read_activity_log(Some(2)).await.unwrap();
    assert_eq!(limited, all[..2].to_vec());
    assert_eq!(h.service.read_activity_log(Some(100)).await.unwrap().len(), 6);
    assert!(h.service.read_activity_log(Some(0)).await.unwrap().is_empty());
}
