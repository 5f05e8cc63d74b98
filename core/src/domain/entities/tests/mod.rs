//! Unit tests for domain entities

mod verification_session_tests;
