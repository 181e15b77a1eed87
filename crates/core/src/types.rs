/// All entity identifiers are UUIDs, generated with `Uuid::new_v4` at creation.
pub type Id = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
