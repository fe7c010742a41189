//! Adapters for the domain ports: storage backends, clocks and id generators.

pub mod clock;
pub mod ids;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
