//! Raw listing query parameters
//!
//! Parameters arrive as a string map so that every malformed value can be
//! reported under its own name instead of as a generic extractor rejection.

use std::collections::HashMap;

use super::cursor::parse_limit;
use super::ParamError;

pub const REVERSE: &str = "reverse";
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";
pub const SORTED: &str = "sorted";
pub const SEARCH: &str = "search";
pub const ANY: &str = "any";

/// Parameters common to every listing endpoint, already validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub reverse: bool,
    /// `None` when the client supplied no `limit` and the listing has no default.
    pub limit: Option<u32>,
    pub offset: Option<String>,
    pub sorted: bool,
    pub search: Option<String>,
    pub any: bool,
}

impl ListParams {
    /// Validate the common parameters.
    ///
    /// `max_limit` bounds an explicit `limit`; larger values are rejected.
    pub fn parse(
        raw: &HashMap<String, String>,
        default_limit: Option<u32>,
        max_limit: u32,
    ) -> Result<Self, ParamError> {
        let supplied_limit = raw.get(LIMIT).map(String::as_str);
        let limit = parse_limit(supplied_limit, default_limit)?;

        if supplied_limit.is_some() {
            if let Some(limit) = limit {
                if limit > max_limit {
                    return Err(ParamError::new(
                        LIMIT,
                        format!("must not exceed {}", max_limit),
                    ));
                }
            }
        }

        Ok(Self {
            reverse: parse_bool(raw, REVERSE)?,
            limit,
            offset: non_empty(raw, OFFSET),
            sorted: parse_bool(raw, SORTED)?,
            search: raw
                .get(SEARCH)
                .filter(|s| !s.trim().is_empty())
                .cloned(),
            any: parse_bool(raw, ANY)?,
        })
    }
}

/// Parse an optional boolean flag, defaulting to `false`.
pub fn parse_bool(raw: &HashMap<String, String>, name: &str) -> Result<bool, ParamError> {
    let Some(value) = raw.get(name) else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(ParamError::new(
            name,
            format!("'{}' is not a boolean (expected true or false)", value),
        )),
    }
}

/// The trimmed value of `name`, or `None` when absent or blank.
pub fn non_empty(raw: &HashMap<String, String>, name: &str) -> Option<String> {
    raw.get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let params = ListParams::parse(&HashMap::new(), None, 1000).unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn test_parses_every_flag() {
        let params = ListParams::parse(
            &query(&[
                ("reverse", "TRUE"),
                ("limit", "5"),
                ("offset", "abc"),
                ("sorted", "0"),
                ("search", "dragon"),
                ("any", "1"),
            ]),
            None,
            1000,
        )
        .unwrap();

        assert!(params.reverse);
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.offset.as_deref(), Some("abc"));
        assert!(!params.sorted);
        assert_eq!(params.search.as_deref(), Some("dragon"));
        assert!(params.any);
    }

    #[test]
    fn test_default_limit_applies_when_absent() {
        let params = ListParams::parse(&HashMap::new(), Some(100), 1000).unwrap();
        assert_eq!(params.limit, Some(100));
    }

    #[test]
    fn test_bad_boolean_names_parameter() {
        let err = ListParams::parse(&query(&[("sorted", "yes")]), None, 1000).unwrap_err();
        assert_eq!(err.parameter, "sorted");
    }

    #[test]
    fn test_limit_above_maximum_is_rejected() {
        let err = ListParams::parse(&query(&[("limit", "5000")]), None, 1000).unwrap_err();
        assert_eq!(err.parameter, "limit");
    }

    #[test]
    fn test_blank_search_counts_as_absent() {
        let params = ListParams::parse(&query(&[("search", "   ")]), None, 1000).unwrap();
        assert_eq!(params.search, None);
    }
}
