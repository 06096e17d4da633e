//! Unit tests for domain entities

mod token_tests;
