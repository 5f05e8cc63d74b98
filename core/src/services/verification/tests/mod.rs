//! Unit tests for the verification flow
