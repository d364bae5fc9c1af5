//! SQL schemas for the two Inzidenz databases.
//!
//! Executed once at connection startup. Both are idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

/// Region data: records, cursors and search buckets.
pub const REGION_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Latest record per region, stored as the upstream attribute JSON.
CREATE TABLE IF NOT EXISTS regions (
    object_id   INTEGER PRIMARY KEY,
    record_json TEXT NOT NULL
);

-- Last applied upstream `last_update`, compared as text.
CREATE TABLE IF NOT EXISTS last_updated (
    object_id   INTEGER PRIMARY KEY,
    last_update TEXT NOT NULL
);

-- Append-only: rows are never deleted, even when a region is renamed.
CREATE TABLE IF NOT EXISTS city_search (
    bucket    TEXT    NOT NULL,   -- first character of the upper-cased name
    object_id INTEGER NOT NULL,
    PRIMARY KEY (bucket, object_id)
);

PRAGMA user_version = 1;
";

/// Subscription data.
pub const SUBSCRIPTION_SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS user_city (
    subscriber_id INTEGER NOT NULL,
    object_id     INTEGER NOT NULL,
    PRIMARY KEY (subscriber_id, object_id)
);

PRAGMA user_version = 1;
";
