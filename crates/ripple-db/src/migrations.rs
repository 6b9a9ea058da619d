use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            username        TEXT NOT NULL UNIQUE,
            email           TEXT NOT NULL DEFAULT '',
            name            TEXT NOT NULL DEFAULT '',
            last_name       TEXT NOT NULL DEFAULT '',
            image           TEXT NOT NULL DEFAULT '',
            password_hash   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            token           TEXT NOT NULL UNIQUE,
            provider        TEXT NOT NULL DEFAULT 'LOCAL',
            last_active_at  TEXT NOT NULL,
            expires_at      TEXT NOT NULL,
            device_info     TEXT NOT NULL DEFAULT '{}'
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_user
            ON sessions(user_id);

        CREATE TABLE IF NOT EXISTS follows (
            follower_id     INTEGER NOT NULL REFERENCES users(id),
            followed_id     INTEGER NOT NULL REFERENCES users(id),
            PRIMARY KEY (follower_id, followed_id)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
