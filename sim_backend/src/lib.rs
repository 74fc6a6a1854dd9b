//! # Simulated Backend
//!
//! A deterministic, in-memory stand-in for the storage backend.
//!
//! ## Philosophy
//!
//! - **Same wire, no network**: [`SimulatedBackend`] is a [`Transport`], so
//!   the real [`BackendClient`] runs against it unchanged
//! - **Faults are planned**: [`FaultPlan`] fails chosen routes a set number
//!   of times, never at random
//! - **Timing is explicit**: [`DeferredQueue`] parks requests so tests choose
//!   the order results arrive in
//!
//! ## Example
//!
//! ```
//! use sim_backend::SimulatedBackend;
//! use services_network::{BackendClient, CredentialVerifier};
//! use services_logger::Logger;
//! use identity::Credentials;
//!
//! let backend = SimulatedBackend::new()
//!     .with_account("AKIA", "secret")
//!     .with_object("data", "reports/q1.csv", "quarter,total\nq1,10\n");
//! let client = BackendClient::new(&backend, "http://sim", Logger::new("doc"));
//! assert!(client.verify(&Credentials::new("AKIA", "secret")).is_ok());
//! ```
//!
//! [`Transport`]: services_network::Transport
//! [`BackendClient`]: services_network::BackendClient

pub mod backend;
pub mod deferred;
pub mod detect;
pub mod fault_injection;

pub use backend::SimulatedBackend;
pub use deferred::DeferredQueue;
pub use fault_injection::{FaultAction, FaultInjector, FaultPlan, RouteFault};
