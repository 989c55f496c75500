//! Unit tests for the identity module.

mod account_tests;
