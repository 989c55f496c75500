//! Checklist: a multi-user task list service.
//!
//! Users register and log in, then create, list, complete and delete tasks
//! and their nested sub-tasks. Every task operation is scoped to the caller's
//! identity.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (memory, `PostgreSQL`, JWT)
//!
//! # Modules
//!
//! - [`identity`]: Accounts, password hashing, credentials and the access gate
//! - [`task`]: Owner-scoped tasks with embedded sub-tasks
//! - [`api`]: axum router and handlers
//! - [`config`]: Environment configuration
//! - [`database`]: `PostgreSQL` pool and schema bootstrap
//! - [`server`]: Listener setup and graceful shutdown

pub mod api;
pub mod config;
pub mod database;
pub mod identity;
pub mod server;
pub mod task;
