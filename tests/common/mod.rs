#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use paylater::application::service::{PayLaterService, ServicePorts};
use paylater::domain::agreement::{AgreementId, AgreementStatus, InstallmentStatus};
use paylater::domain::customer::{Cart, User};
use paylater::domain::ports::{AgreementRepository, InstallmentUpdate};
use paylater::infrastructure::clock::ManualClock;
use paylater::infrastructure::ids::SequentialIdGenerator;
use paylater::infrastructure::in_memory::{
    InMemoryActivityLog, InMemoryAgreementRepository, InMemoryCustomerDirectory,
};
use paylater::interfaces::csv::record_reader::{CartReader, UserReader};
use std::fs::File;
use std::sync::Arc;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

pub fn fixture_users() -> Vec<User> {
    let file = File::open("tests/fixtures/users.csv").unwrap();
    UserReader::new(file)
        .records()
        .collect::<Result<_, _>>()
        .unwrap()
}

pub fn fixture_carts() -> Vec<Cart> {
    let file = File::open("tests/fixtures/carts.csv").unwrap();
    CartReader::new(file)
        .records()
        .collect::<Result<_, _>>()
        .unwrap()
}

/// A service over the fixture users and carts, plus handles to the pieces
/// tests need to steer directly.
pub struct Harness {
    pub service: PayLaterService,
    pub clock: ManualClock,
    pub repository: InMemoryAgreementRepository,
    pub directory: Arc<InMemoryCustomerDirectory>,
}

impl Harness {
    pub async fn new() -> Self {
        let clock = ManualClock::new(start_time());
        let repository = InMemoryAgreementRepository::new();
        let directory = Arc::new(InMemoryCustomerDirectory::with_records(
            fixture_users(),
            fixture_carts(),
        ));

        let service = PayLaterService::new(ServicePorts {
            directory: directory.clone(),
            agreements: Arc::new(repository.clone()),
            activity: Arc::new(InMemoryActivityLog::new()),
            clock: Arc::new(clock.clone()),
            ids: Arc::new(SequentialIdGenerator::new()),
        })
        .await
        .unwrap();

        Self {
            service,
            clock,
            repository,
            directory,
        }
    }

    /// Puts one installment into FAILED the way an external charge failure would.
    pub async fn force_failed(&self, agreement_id: &AgreementId, index: usize) {
        self.repository
            .update_installment(InstallmentUpdate {
                agreement_id: agreement_id.clone(),
                index,
                status: InstallmentStatus::Failed,
                payment_date: None,
                agreement_status: AgreementStatus::Failed,
            })
            .await
            .unwrap();
    }

    pub async fn create(&self, user: &str, cart: &str) -> AgreementId {
        self.service
            .create_agreement(user, cart)
            .await
            .unwrap()
            .into_agreement()
            .unwrap()
            .id
    }

    pub async fn messages(&self) -> Vec<String> {
        self.service
            .read_activity_log(None)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }
}
