//! Owner-scoped task lists with embedded sub-tasks.
//!
//! Every read and write is filtered by the owning user in the same store
//! operation that locates the task. The module follows hexagonal
//! architecture:
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
