use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                verified    INTEGER NOT NULL DEFAULT 0,
                status      TEXT NOT NULL DEFAULT 'Online',
                game        TEXT NOT NULL DEFAULT 'Newbie',
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE pending_verifications (
                email       TEXT PRIMARY KEY REFERENCES accounts(email) ON DELETE CASCADE,
                code        TEXT NOT NULL,
                issued_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE delivery_tasks (
                id            TEXT PRIMARY KEY,
                recipient     TEXT NOT NULL,
                subject       TEXT NOT NULL,
                body          TEXT NOT NULL,
                status        TEXT NOT NULL DEFAULT 'pending',
                created_at    TEXT NOT NULL DEFAULT (datetime('now')),
                delivered_at  TEXT
            );

            CREATE INDEX idx_delivery_tasks_status
                ON delivery_tasks(status, created_at);
            CREATE INDEX idx_delivery_tasks_recipient
                ON delivery_tasks(recipient, status);

            CREATE TABLE sessions (
                token       TEXT PRIMARY KEY,
                username    TEXT NOT NULL REFERENCES accounts(username),
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE friend_requests (
                from_user   TEXT NOT NULL REFERENCES accounts(username),
                to_user     TEXT NOT NULL REFERENCES accounts(username),
                status      TEXT NOT NULL DEFAULT 'pending',
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (from_user, to_user)
            );

            CREATE INDEX idx_friend_requests_to
                ON friend_requests(to_user, status);

            -- Unordered edge, stored with user_low < user_high
            CREATE TABLE friendships (
                user_low    TEXT NOT NULL REFERENCES accounts(username),
                user_high   TEXT NOT NULL REFERENCES accounts(username),
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (user_low, user_high),
                CHECK (user_low < user_high)
            );

            CREATE INDEX idx_friendships_high
                ON friendships(user_high);

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                sender      TEXT NOT NULL REFERENCES accounts(username),
                recipient   TEXT NOT NULL REFERENCES accounts(username),
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_messages_sender
                ON messages(sender, id);
            CREATE INDEX idx_messages_recipient
                ON messages(recipient, id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
