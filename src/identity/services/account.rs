//! Service layer for account registration and login.

use crate::identity::{
    domain::{EmailAddress, IdentityDomainError, Password, PasswordHasher, User},
    ports::{Credential, CredentialError, CredentialIssuer, UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    email: String,
    password: String,
}

impl RegisterRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Request payload for logging in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    /// Creates a login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// Credential could not be issued.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// No account uses the given email.
    #[error("user not found")]
    UserNotFound,
    /// The password does not match the account.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The background hashing task did not complete.
    #[error("password hashing task failed: {0}")]
    Hashing(String),
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;

/// Account registration and login service.
#[derive(Clone)]
pub struct AccountService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    issuer: Arc<dyn CredentialIssuer>,
    hasher: PasswordHasher,
    clock: Arc<C>,
}

impl<R, C> AccountService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        issuer: Arc<dyn CredentialIssuer>,
        hasher: PasswordHasher,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            issuer,
            hasher,
            clock,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] when the email or password is missing
    /// and [`AccountError::Repository`] when the email is already registered
    /// or the store fails.
    pub async fn register(&self, request: RegisterRequest) -> AccountResult<User> {
        let email = EmailAddress::new(&request.email)?;
        let password = Password::new(request.password)?;

        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AccountError::Hashing(err.to_string()))?;

        let user = User::register(email, password_hash, &*self.clock);
        self.repository.store(&user).await?;
        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }

    /// Authenticates an account and issues a credential for it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when no account uses the email,
    /// [`AccountError::InvalidCredentials`] when the password does not match,
    /// and [`AccountError::Repository`] or [`AccountError::Credential`] on
    /// infrastructure failure.
    pub async fn login(&self, request: LoginRequest) -> AccountResult<Credential> {
        let email = EmailAddress::new(&request.email)?;
        let password = Password::new(request.password)?;

        let Some(user) = self.repository.find_by_email(&email).await? else {
            debug!(%email, "login rejected: unknown email");
            return Err(AccountError::UserNotFound);
        };

        let hasher = self.hasher;
        let stored = user.password_hash().clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|err| AccountError::Hashing(err.to_string()))??;
        if !matches {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let credential = self.issuer.issue(user.id(), self.clock.utc())?;
        info!(user_id = %user.id(), "issued credential");
        Ok(credential)
    }
}
