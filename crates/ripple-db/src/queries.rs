use crate::Database;
use crate::models::{SessionRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        name: &str,
        last_name: &str,
        image: &str,
        password_hash: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, name, last_name, image, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (username, email, name, last_name, image, password_hash),
            )?;
            Ok(UserRow {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                last_name: last_name.to_string(),
                image: image.to_string(),
                password_hash: password_hash.to_string(),
            })
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", [username]))
    }

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", [id]))
    }

    /// Full-row update of every mutable user column.
    pub fn update_user(&self, row: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users
                 SET username = ?1, email = ?2, name = ?3, last_name = ?4,
                     image = ?5, password_hash = ?6
                 WHERE id = ?7",
                (
                    &row.username,
                    &row.email,
                    &row.name,
                    &row.last_name,
                    &row.image,
                    &row.password_hash,
                    row.id,
                ),
            )?;
            Ok(())
        })
    }

    // -- Sessions --

    /// Insert a session row. Fails on the `sessions.token` unique constraint
    /// if the token was ever issued before; the caller owns retry.
    pub fn create_session(
        &self,
        user_id: i64,
        token: &str,
        provider: &str,
        last_active_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        device_info: &serde_json::Value,
    ) -> Result<SessionRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (user_id, token, provider, last_active_at, expires_at, device_info)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (user_id, token, provider, last_active_at, expires_at, device_info),
            )?;
            Ok(SessionRow {
                id: conn.last_insert_rowid(),
                user_id,
                token: token.to_string(),
                provider: provider.to_string(),
                last_active_at,
                expires_at,
                device_info: device_info.clone(),
            })
        })
    }

    pub fn find_session_by_token(&self, token: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, token, provider, last_active_at, expires_at, device_info
                 FROM sessions WHERE token = ?1",
            )?;

            let row = stmt
                .query_row([token], |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        token: row.get(2)?,
                        provider: row.get(3)?,
                        last_active_at: row.get(4)?,
                        expires_at: row.get(5)?,
                        device_info: row.get(6)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    pub fn touch_session(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE sessions SET last_active_at = ?1 WHERE id = ?2",
                (at, id),
            )?;
            Ok(())
        })
    }

    // -- Follow edges --

    /// Idempotent: re-inserting an existing edge is a no-op, and concurrent
    /// inserts of the same pair collapse onto the composite primary key.
    pub fn insert_follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                (follower_id, followed_id),
            )?;
            Ok(())
        })
    }

    pub fn delete_follow(&self, follower_id: i64, followed_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                (follower_id, followed_id),
            )?;
            Ok(())
        })
    }

    pub fn is_following(&self, follower_id: i64, followed_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2)",
                (follower_id, followed_id),
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }
}

fn query_user(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, email, name, last_name, image, password_hash
         FROM users WHERE {filter}"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                name: row.get(3)?,
                last_name: row.get(4)?,
                image: row.get(5)?,
                password_hash: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_unique_violation;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn insert_user(db: &Database, username: &str) -> UserRow {
        db.create_user(username, "", "", "", "", "hash").unwrap()
    }

    #[test]
    fn test_duplicate_username_is_unique_violation() {
        let db = test_db();
        insert_user(&db, "ana");
        let err = db
            .create_user("ana", "", "", "", "", "hash")
            .unwrap_err();
        assert!(is_unique_violation(&err, "users.username"));
        assert!(!is_unique_violation(&err, "sessions.token"));
    }

    #[test]
    fn test_duplicate_token_is_unique_violation() {
        let db = test_db();
        let user = insert_user(&db, "ana");
        let now = Utc::now();
        let info = serde_json::json!({});
        db.create_session(user.id, "tok", "LOCAL", now, now, &info)
            .unwrap();
        let err = db
            .create_session(user.id, "tok", "LOCAL", now, now, &info)
            .unwrap_err();
        assert!(is_unique_violation(&err, "sessions.token"));
    }

    #[test]
    fn test_follow_edge_idempotent_at_storage_level() {
        let db = test_db();
        let a = insert_user(&db, "a");
        let b = insert_user(&db, "b");

        db.insert_follow(a.id, b.id).unwrap();
        db.insert_follow(a.id, b.id).unwrap();

        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM follows", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert!(db.is_following(a.id, b.id).unwrap());
        assert!(!db.is_following(b.id, a.id).unwrap());
    }

    #[test]
    fn test_device_info_round_trips() {
        let db = test_db();
        let user = insert_user(&db, "ana");
        let now = Utc::now();
        let info = serde_json::json!({"os": "ios", "push": {"enabled": true}});
        db.create_session(user.id, "tok", "LOCAL", now, now, &info)
            .unwrap();

        let row = db.find_session_by_token("tok").unwrap().unwrap();
        assert_eq!(row.device_info, info);
    }
}
