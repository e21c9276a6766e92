//! HTTP API tests

mod error_tests;
mod health_tests;
