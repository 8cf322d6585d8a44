//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **storage**: shared in-memory and JSON-file key-value stores
//! - **simulated_backend**: latency-simulating authentication backend over the
//!   identity directory
//! - **tracing_ui**: toast, navigation and header adapters that log through
//!   `tracing`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod simulated_backend;
pub mod storage;
pub mod tracing_ui;
