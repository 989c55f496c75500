//! Account service tests for registration and login.

use std::sync::Arc;

use crate::identity::{
    adapters::{jwt::JwtCredentials, memory::InMemoryUserRepository},
    domain::{EmailAddress, IdentityDomainError, PasswordHasher, User},
    ports::{CredentialVerifier, UserRepository, UserRepositoryError, UserRepositoryResult},
    services::{AccountError, AccountService, LoginRequest, RegisterRequest},
};
use async_trait::async_trait;
use chrono::{TimeDelta, Timelike};
use mockable::DefaultClock;
use mockall::mock;
use rstest::{fixture, rstest};

type TestService = AccountService<InMemoryUserRepository, DefaultClock>;

struct Harness {
    service: TestService,
    credentials: Arc<JwtCredentials>,
}

#[fixture]
fn harness() -> Harness {
    let credentials = Arc::new(JwtCredentials::new(b"account-secret", TimeDelta::hours(1)));
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::clone(&credentials) as _,
        PasswordHasher::new(1_000),
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        credentials,
    }
}

mock! {
    pub UserStore {}

    #[async_trait]
    impl UserRepository for UserStore {
        async fn store(&self, user: &User) -> UserRepositoryResult<()>;
        async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_then_login_issues_credential_for_the_user(harness: Harness) {
    let user = harness
        .service
        .register(RegisterRequest::new("Alice@Example.com", "pw"))
        .await
        .expect("registration should succeed");

    let credential = harness
        .service
        .login(LoginRequest::new("alice@example.com", "pw"))
        .await
        .expect("login should succeed");

    assert_eq!(user.email().as_str(), "alice@example.com");
    assert_ne!(user.password_hash().as_str(), "pw");
    assert_eq!(user.created_at().nanosecond() % 1_000, 0);
    assert_eq!(harness.credentials.verify(credential.as_str()), Ok(user.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_email_is_rejected(harness: Harness) {
    harness
        .service
        .register(RegisterRequest::new("bob@example.com", "pw"))
        .await
        .expect("first registration should succeed");

    let result = harness
        .service
        .register(RegisterRequest::new(" BOB@example.com", "other"))
        .await;

    assert!(matches!(
        result,
        Err(AccountError::Repository(UserRepositoryError::DuplicateEmail(_)))
    ));
}

#[rstest]
#[case("", "pw", IdentityDomainError::EmptyEmail)]
#[case("carol@example.com", "", IdentityDomainError::EmptyPassword)]
#[tokio::test(flavor = "multi_thread")]
async fn register_requires_both_fields(
    harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: IdentityDomainError,
) {
    let result = harness
        .service
        .register(RegisterRequest::new(email, password))
        .await;
    assert!(matches!(result, Err(AccountError::Domain(err)) if err == expected));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_with_unknown_email_is_user_not_found(harness: Harness) {
    let result = harness
        .service
        .login(LoginRequest::new("nobody@example.com", "pw"))
        .await;
    assert!(matches!(result, Err(AccountError::UserNotFound)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn login_with_wrong_password_is_invalid_credentials(harness: Harness) {
    harness
        .service
        .register(RegisterRequest::new("dave@example.com", "right"))
        .await
        .expect("registration should succeed");

    let result = harness
        .service
        .login(LoginRequest::new("dave@example.com", "wrong"))
        .await;

    assert!(matches!(result, Err(AccountError::InvalidCredentials)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_failure_surfaces_as_repository_error() {
    let mut store = MockUserStore::new();
    store.expect_store().times(1).returning(|_| {
        Err(UserRepositoryError::persistence(std::io::Error::other(
            "disk full",
        )))
    });
    let service = AccountService::new(
        Arc::new(store),
        Arc::new(JwtCredentials::new(b"secret", TimeDelta::hours(1))) as _,
        PasswordHasher::new(1_000),
        Arc::new(DefaultClock),
    );

    let result = service
        .register(RegisterRequest::new("erin@example.com", "pw"))
        .await;

    assert!(matches!(
        result,
        Err(AccountError::Repository(UserRepositoryError::Persistence(_)))
    ));
}
