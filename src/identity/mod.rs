//! User accounts and credential-based access control.
//!
//! This module owns everything the task core treats as an external
//! collaborator: account registration, password hashing, signed credential
//! issuance, and the access gate that resolves a credential into the
//! identity every task operation is scoped by. Layout mirrors [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
