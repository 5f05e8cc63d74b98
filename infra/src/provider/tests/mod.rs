//! Unit tests for verification providers

#[cfg(all(test, feature = "messagebird"))]
pub mod messagebird_tests;
