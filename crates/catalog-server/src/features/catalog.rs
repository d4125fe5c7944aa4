//! Listing table for every entity kind
//!
//! Filters are declared highest precedence first. Changing their order
//! changes which index a multi-filter request reads.

use catalog_common::types::EntityKind;

use crate::listing::{FilterKind, ListingSpec};

pub const CONTENT_TYPES: &[&str] = &["ARTICLE", "BOOK", "PAGE", "POST", "VIDEO"];
pub const USER_ROLES: &[&str] = &["ADMIN", "EDITOR", "AUTHOR", "VIEWER"];
pub const USER_STATUSES: &[&str] = &["ACTIVE", "INVITED", "SUSPENDED"];
pub const ORGANIZATION_STATUSES: &[&str] = &["ACTIVE", "SUSPENDED"];
pub const EMAIL_STATUSES: &[&str] = &["QUEUED", "SENT", "FAILED"];
pub const DEVICE_STATUSES: &[&str] = &["ACTIVE", "REVOKED"];
pub const TOKEN_STATUSES: &[&str] = &["ACTIVE", "EXPIRED", "REVOKED"];

/// Page size for high-volume kinds when the client sends no `limit`
pub const HIGH_VOLUME_DEFAULT_LIMIT: u32 = 100;

pub fn listing_specs() -> Vec<ListingSpec> {
    vec![
        ListingSpec::builder(EntityKind::Content)
            .text_listing("content_titles", "title")
            .filter("type", FilterKind::Enum(CONTENT_TYPES))
            .filter("author", FilterKind::Text)
            .filter("editor", FilterKind::EntityId)
            .filter_on("tag", "tags", FilterKind::Text)
            .build(),
        ListingSpec::builder(EntityKind::User)
            .text_listing("user_names", "name")
            .filter("organization", FilterKind::EntityId)
            .filter("role", FilterKind::Enum(USER_ROLES))
            .filter("status", FilterKind::Enum(USER_STATUSES))
            .build(),
        ListingSpec::builder(EntityKind::Organization)
            .text_listing("organization_names", "name")
            .filter("status", FilterKind::Enum(ORGANIZATION_STATUSES))
            .build(),
        ListingSpec::builder(EntityKind::Email)
            .text_listing("email_subjects", "subject")
            .filter("status", FilterKind::Enum(EMAIL_STATUSES))
            .filter("recipient", FilterKind::Email)
            .build(),
        ListingSpec::builder(EntityKind::Device)
            .text_listing("device_names", "name")
            .filter("user", FilterKind::EntityId)
            .filter("status", FilterKind::Enum(DEVICE_STATUSES))
            .build(),
        ListingSpec::builder(EntityKind::Token)
            .text_listing("token_labels", "label")
            .filter("user", FilterKind::EntityId)
            .filter("status", FilterKind::Enum(TOKEN_STATUSES))
            .build(),
        ListingSpec::builder(EntityKind::Metric)
            .text_listing("metric_names", "name")
            .filter("name", FilterKind::Text)
            .filter("date", FilterKind::Date)
            .default_limit(HIGH_VOLUME_DEFAULT_LIMIT)
            .build(),
        ListingSpec::builder(EntityKind::Event)
            .text_listing("event_summaries", "summary")
            .filter("type", FilterKind::Text)
            .filter("organization", FilterKind::EntityId)
            .filter("date", FilterKind::Date)
            .default_limit(HIGH_VOLUME_DEFAULT_LIMIT)
            .build(),
    ]
}
