//! Embedded schema migrations for Feedmill.
//!
//! Each entry is applied exactly once, in order, inside its own transaction.
//! The current version is tracked in the `schema_version` table.

/// Ordered list of schema migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users, feeds, items
    r#"
    CREATE TABLE users (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        username    TEXT NOT NULL COLLATE NOCASE,
        password    TEXT NOT NULL,
        created_at  TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE UNIQUE INDEX idx_users_username ON users (username);

    CREATE TABLE feeds (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        url              TEXT NOT NULL,
        title            TEXT NOT NULL DEFAULT '',
        description      TEXT NOT NULL DEFAULT '',
        last_fetched_at  TEXT,
        last_error       TEXT,
        last_error_at    TEXT,
        created_at       TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE UNIQUE INDEX idx_feeds_url ON feeds (url);

    CREATE TABLE items (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        feed_id       INTEGER NOT NULL REFERENCES feeds (id) ON DELETE CASCADE,
        guid          TEXT NOT NULL,
        title         TEXT NOT NULL DEFAULT '',
        link          TEXT NOT NULL DEFAULT '',
        description   TEXT NOT NULL DEFAULT '',
        content       TEXT NOT NULL DEFAULT '',
        author        TEXT NOT NULL DEFAULT '',
        published_at  TEXT,
        created_at    TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX idx_items_feed_guid ON items (feed_id, guid);
    CREATE INDEX idx_items_created_at ON items (created_at);
    "#,
];
