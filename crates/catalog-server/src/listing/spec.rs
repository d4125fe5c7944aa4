//! Declarative listing tables
//!
//! A [`ListingSpec`] says, for one entity kind, which filters a listing
//! accepts (in precedence order), which body field each filter indexes, and
//! which field is the human-readable display text.

use catalog_common::types::EntityKind;

use super::ParamError;
use crate::features::shared::validation::{
    validate_date, validate_email, validate_entity_id, validate_enum, validate_text,
    FilterValidationError,
};

/// How a filter value is validated and normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    EntityId,
    Enum(&'static [&'static str]),
    Date,
    Email,
    Text,
}

impl FilterKind {
    /// Validate a raw value and return its normalized form.
    pub fn validate(&self, value: &str) -> Result<String, FilterValidationError> {
        match self {
            Self::EntityId => validate_entity_id(value),
            Self::Enum(allowed) => validate_enum(value, allowed),
            Self::Date => validate_date(value),
            Self::Email => validate_email(value),
            Self::Text => validate_text(value),
        }
    }
}

/// One filter parameter and the index it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Query parameter name, also the index name.
    pub param: &'static str,
    /// Body field holding the indexed value. Array fields index each element.
    pub field: &'static str,
    pub kind: FilterKind,
}

impl FilterSpec {
    /// Validate a raw value, naming this filter in the error.
    pub fn validate(&self, value: &str) -> Result<String, ParamError> {
        self.kind
            .validate(value)
            .map_err(|e| ParamError::new(self.param, e.to_string()))
    }
}

/// Listing configuration for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSpec {
    pub kind: EntityKind,
    /// Path segment of the `(id, value)` listing, e.g. `content_titles`.
    pub text_path: &'static str,
    /// Body field used as display text.
    pub display_field: &'static str,
    /// Filters, highest precedence first.
    pub filters: Vec<FilterSpec>,
    /// Page size applied when the client sends no `limit`. `None` returns
    /// everything.
    pub default_limit: Option<u32>,
}

impl ListingSpec {
    pub fn builder(kind: EntityKind) -> ListingSpecBuilder {
        ListingSpecBuilder {
            spec: ListingSpec {
                kind,
                text_path: kind.collection(),
                display_field: "name",
                filters: Vec::new(),
                default_limit: None,
            },
        }
    }

    pub fn filter(&self, param: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.param == param)
    }

    /// `(index name, body field)` pairs the store must maintain for this kind.
    pub fn index_fields(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.filters.iter().map(|f| (f.param, f.field))
    }
}

/// Builder for [`ListingSpec`].
#[derive(Debug, Clone)]
pub struct ListingSpecBuilder {
    spec: ListingSpec,
}

impl ListingSpecBuilder {
    /// Path and display field of the text listing.
    pub fn text_listing(mut self, path: &'static str, display_field: &'static str) -> Self {
        self.spec.text_path = path;
        self.spec.display_field = display_field;
        self
    }

    /// Add a filter whose body field has the same name as the parameter.
    pub fn filter(self, param: &'static str, kind: FilterKind) -> Self {
        self.filter_on(param, param, kind)
    }

    /// Add a filter reading a differently named body field.
    pub fn filter_on(mut self, param: &'static str, field: &'static str, kind: FilterKind) -> Self {
        self.spec.filters.push(FilterSpec { param, field, kind });
        self
    }

    pub fn default_limit(mut self, limit: u32) -> Self {
        self.spec.default_limit = Some(limit);
        self
    }

    pub fn build(self) -> ListingSpec {
        self.spec
    }
}
