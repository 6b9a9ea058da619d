//! Database row types — these map directly to SQLite rows.
//! Distinct from the ripple-types API models to keep the DB layer
//! independent; in particular, only rows ever carry the password hash.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub image: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub provider: String,
    pub last_active_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub device_info: serde_json::Value,
}
