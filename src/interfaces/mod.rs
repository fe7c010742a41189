//! Host-side adapters for feeding the service and reporting its state.

pub mod csv;
