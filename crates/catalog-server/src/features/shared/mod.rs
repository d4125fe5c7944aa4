//! Shared utilities for feature modules
//!
//! # Contents
//!
//! - **validation**: Filter value validation and normalization

pub mod validation;

pub use validation::FilterValidationError;
