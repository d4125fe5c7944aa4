//! Shared validation utilities
//!
//! Filter values are validated, and normalized where a canonical form exists,
//! before any store access.
//!
//! # Examples
//!
//! ```rust,ignore
//! use catalog_server::features::shared::validation::{validate_enum, validate_date};
//!
//! validate_enum("BOOK", &["ARTICLE", "BOOK"])?;
//! let day = validate_date("2026-1-5")?; // "2026-01-05"
//! ```

use std::sync::OnceLock;

use catalog_common::types::EntityId;
use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

/// Maximum accepted length of a free-text filter value
pub const MAX_TEXT_FILTER_LENGTH: usize = 256;

/// Errors that can occur while validating a filter value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterValidationError {
    #[error("'{0}' is not a valid entity id")]
    InvalidId(String),

    #[error("'{value}' is not one of: {allowed}")]
    InvalidEnum { value: String, allowed: String },

    #[error("'{0}' is not a date in YYYY-MM-DD form")]
    InvalidDate(String),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("must be between 1 and {max_length} characters")]
    InvalidLength { max_length: usize },
}

/// Validate an entity id and return its canonical form
pub fn validate_entity_id(value: &str) -> Result<String, FilterValidationError> {
    EntityId::parse(value)
        .map(EntityId::into_string)
        .map_err(|_| FilterValidationError::InvalidId(value.to_string()))
}

/// Validate a value against a closed, case-sensitive set
pub fn validate_enum(value: &str, allowed: &[&str]) -> Result<String, FilterValidationError> {
    if allowed.contains(&value) {
        Ok(value.to_string())
    } else {
        Err(FilterValidationError::InvalidEnum {
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}

/// Validate a calendar date and return it zero-padded
pub fn validate_date(value: &str) -> Result<String, FilterValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| FilterValidationError::InvalidDate(value.to_string()))
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
    })
}

/// Validate an email address shape
///
/// Only the shape is checked; deliverability is the mailer's concern.
pub fn validate_email(value: &str) -> Result<String, FilterValidationError> {
    if email_regex().is_match(value) {
        Ok(value.to_string())
    } else {
        Err(FilterValidationError::InvalidEmail(value.to_string()))
    }
}

/// Validate free text used as an index key
pub fn validate_text(value: &str) -> Result<String, FilterValidationError> {
    if value.is_empty() || value.chars().count() > MAX_TEXT_FILTER_LENGTH {
        return Err(FilterValidationError::InvalidLength {
            max_length: MAX_TEXT_FILTER_LENGTH,
        });
    }
    Ok(value.to_string())
}
