//! Shared constant values.

/// OpenAPI tag for system endpoints (health, docs).
pub const SYSTEM_TAG: &str = "System";

/// OpenAPI tag for the Bible lookup endpoints.
pub const BIBLE_TAG: &str = "Bible";
