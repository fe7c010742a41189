//! Application layer orchestrating the PayLater core.
//!
//! `PayLaterService` is the entry point. It composes the `ActivityLogger`,
//! the `PaymentProcessor` state machine, the `AgreementStore` and the
//! `RetryCoordinator` over the storage ports supplied by the host.

pub mod activity;
pub mod agreements;
pub mod processor;
pub mod retry;
pub mod service;
