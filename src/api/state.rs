//! Shared handler state.

use crate::identity::{
    adapters::jwt::JwtCredentials,
    domain::PasswordHasher,
    ports::{CredentialIssuer, CredentialVerifier, UserRepository},
    services::{AccessGate, AccountService},
};
use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use axum::extract::FromRef;
use mockable::DefaultClock;
use std::sync::Arc;

/// Services shared by every handler.
pub struct AppState<T, U>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    tasks: Arc<TaskLifecycleService<T, DefaultClock>>,
    accounts: Arc<AccountService<U, DefaultClock>>,
    gate: Arc<AccessGate>,
}

impl<T, U> Clone for AppState<T, U>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            accounts: Arc::clone(&self.accounts),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<T, U> AppState<T, U>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    /// Creates state from already constructed services.
    #[must_use]
    pub const fn new(
        tasks: Arc<TaskLifecycleService<T, DefaultClock>>,
        accounts: Arc<AccountService<U, DefaultClock>>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            tasks,
            accounts,
            gate,
        }
    }

    /// Wires services over the given stores, using `credentials` both to
    /// issue tokens at login and to verify them at the gate.
    #[must_use]
    pub fn assemble(
        task_repository: Arc<T>,
        user_repository: Arc<U>,
        credentials: Arc<JwtCredentials>,
        hasher: PasswordHasher,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        let issuer: Arc<dyn CredentialIssuer> = Arc::clone(&credentials) as _;
        let verifier: Arc<dyn CredentialVerifier> = credentials;

        Self::new(
            Arc::new(TaskLifecycleService::new(task_repository, Arc::clone(&clock))),
            Arc::new(AccountService::new(user_repository, issuer, hasher, clock)),
            Arc::new(AccessGate::new(verifier)),
        )
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub fn tasks(&self) -> &TaskLifecycleService<T, DefaultClock> {
        &self.tasks
    }

    /// Returns the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService<U, DefaultClock> {
        &self.accounts
    }
}

impl<T, U> FromRef<AppState<T, U>> for Arc<AccessGate>
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Arc::clone(&state.gate)
    }
}
