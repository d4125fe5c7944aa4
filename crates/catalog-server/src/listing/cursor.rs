//! Pagination cursors
//!
//! A cursor marks the exclusive start of the next page in a direction. Clients
//! pass the last ID of the previous page back as `offset`; when no offset is
//! supplied the page starts at the sentinel for the requested direction.

use super::ParamError;

/// Exclusive page boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Before every identifier.
    Min,
    /// After every identifier.
    Max,
    /// Strictly after (forward) or strictly before (reverse) this identifier.
    After(String),
}

/// One bounded slice of an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub reverse: bool,
    /// `None` means unbounded.
    pub limit: Option<u32>,
    pub offset: Cursor,
}

impl Page {
    pub fn new(reverse: bool, limit: Option<u32>, offset: Option<&str>) -> Self {
        Self {
            reverse,
            limit,
            offset: resolve_offset(reverse, offset),
        }
    }

    /// Page continuing after `last` in the same direction.
    pub fn after(&self, last: &str) -> Self {
        Self {
            reverse: self.reverse,
            limit: self.limit,
            offset: Cursor::After(last.to_string()),
        }
    }
}

/// Resolve a client-supplied offset into a cursor.
///
/// Empty input yields the direction's starting sentinel; anything else is
/// passed through unchanged.
pub fn resolve_offset(reverse: bool, supplied: Option<&str>) -> Cursor {
    match supplied {
        Some(offset) if !offset.is_empty() => Cursor::After(offset.to_string()),
        _ if reverse => Cursor::Max,
        _ => Cursor::Min,
    }
}

/// Parse the `limit` parameter.
///
/// Absent input yields `default`; zero, negatives and non-integers are rejected.
pub fn parse_limit(supplied: Option<&str>, default: Option<u32>) -> Result<Option<u32>, ParamError> {
    let Some(raw) = supplied else {
        return Ok(default);
    };

    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ParamError::new("limit", "must be greater than 0")),
        Ok(limit) => Ok(Some(limit)),
        Err(_) => Err(ParamError::new(
            "limit",
            format!("'{}' is not a non-negative integer", raw),
        )),
    }
}
