//! Domain layer: records, rules and the ports the application depends on.
//!
//! Nothing in here performs IO. Eligibility and schedule generation are pure
//! functions; storage, time and id generation are reached through `ports`.

pub mod activity;
pub mod agreement;
pub mod customer;
pub mod eligibility;
pub mod money;
pub mod ports;
pub mod retry;
pub mod schedule;
