//! Application services for account management and request access control.

mod account;
mod gate;

pub use account::{AccountError, AccountResult, AccountService, LoginRequest, RegisterRequest};
pub use gate::{AccessError, AccessGate};
