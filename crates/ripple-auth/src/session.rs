//! Session issuance and validation.
//!
//! A session is Active strictly before its expiry, Expired at or after it,
//! and Unknown when the token has no row. There is no way back from
//! Expired or Unknown, and the core never deletes rows — physical cleanup
//! of dead sessions is an external housekeeping concern.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Duration, Utc};
use tracing::warn;

use ripple_db::models::SessionRow;
use ripple_db::{Database, is_unique_violation};
use ripple_types::models::{Session, User};

use crate::error::AuthError;
use crate::{token, user_from_row};

/// Provider tag stamped on locally issued sessions.
pub const LOCAL_PROVIDER: &str = "LOCAL";

// A collision means 256 bits of CSPRNG output repeated; one retry is
// already paranoid.
const TOKEN_RETRIES: usize = 3;

pub struct SessionManager {
    db: Arc<Database>,
}

impl SessionManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Issue a session for `user_id` with an absolute expiry of now + ttl.
    ///
    /// Token uniqueness is enforced by the `sessions.token` unique
    /// constraint; on the astronomically rare collision a fresh token is
    /// generated. There is no cap on concurrent sessions per user —
    /// multi-device login is intended.
    pub fn create(
        &self,
        user_id: i64,
        ttl: Duration,
        device_info: serde_json::Value,
    ) -> Result<Session, AuthError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        for _ in 0..TOKEN_RETRIES {
            let token = token::generate_token();
            match self
                .db
                .create_session(user_id, &token, LOCAL_PROVIDER, now, expires_at, &device_info)
            {
                Ok(row) => return Ok(session_from_row(row)),
                Err(err) if is_unique_violation(&err, "sessions.token") => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(AuthError::Internal(anyhow!(
            "token generation collided {TOKEN_RETRIES} times in a row"
        )))
    }

    /// Resolve a token to its owning user and session.
    ///
    /// Expiry is absolute, not sliding: validation never extends the
    /// session, and the boundary instant `now == expires_at` is already
    /// expired. A compromised token therefore dies on schedule no matter
    /// how often it is used.
    pub fn validate(&self, token: &str) -> Result<(User, Session), AuthError> {
        let row = self
            .db
            .find_session_by_token(token)?
            .ok_or(AuthError::SessionNotFound)?;

        if Utc::now() >= row.expires_at {
            return Err(AuthError::SessionExpired);
        }

        // A session whose user vanished is as good as no session.
        let user_row = self
            .db
            .find_user_by_id(row.user_id)?
            .ok_or(AuthError::SessionNotFound)?;

        Ok((user_from_row(user_row), session_from_row(row)))
    }

    /// Record that the session was just used. Best-effort telemetry, not a
    /// security check: a persistence failure is logged and swallowed so it
    /// never fails the request that triggered it.
    pub fn touch(&self, session: &Session) {
        if let Err(err) = self.db.touch_session(session.id, Utc::now()) {
            warn!(session_id = session.id, error = %err, "failed to update session last-active time");
        }
    }
}

fn session_from_row(row: SessionRow) -> Session {
    Session {
        id: row.id,
        user_id: row.user_id,
        token: row.token,
        provider: row.provider,
        last_active_at: row.last_active_at,
        expires_at: row.expires_at,
        device_info: row.device_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialStore, NewUser};

    fn setup() -> (Arc<Database>, SessionManager, User) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let users = CredentialStore::new(db.clone());
        let user = users
            .register(
                &NewUser {
                    username: "ana".into(),
                    email: "ana@example.com".into(),
                    name: String::new(),
                    last_name: String::new(),
                    image: String::new(),
                },
                "secret1",
            )
            .unwrap();
        let sessions = SessionManager::new(db.clone());
        (db, sessions, user)
    }

    fn no_device() -> serde_json::Value {
        serde_json::json!({})
    }

    #[test]
    fn test_create_and_validate() {
        let (_db, sessions, user) = setup();

        let session = sessions
            .create(user.id, Duration::hours(24), no_device())
            .unwrap();
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.provider, LOCAL_PROVIDER);
        assert!(session.expires_at > session.last_active_at);

        let (resolved_user, resolved_session) = sessions.validate(&session.token).unwrap();
        assert_eq!(resolved_user.username, "ana");
        assert_eq!(resolved_session.id, session.id);
    }

    #[test]
    fn test_repeated_logins_issue_distinct_tokens() {
        let (_db, sessions, user) = setup();

        let first = sessions
            .create(user.id, Duration::hours(24), no_device())
            .unwrap();
        let second = sessions
            .create(user.id, Duration::hours(24), no_device())
            .unwrap();

        assert_ne!(first.token, second.token);

        // Multi-device: both stay valid side by side.
        assert!(sessions.validate(&first.token).is_ok());
        assert!(sessions.validate(&second.token).is_ok());
    }

    #[test]
    fn test_unknown_token_is_not_found() {
        let (_db, sessions, _user) = setup();
        let err = sessions.validate("no-such-token").unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
    }

    #[test]
    fn test_zero_ttl_session_is_immediately_expired() {
        let (_db, sessions, user) = setup();
        let session = sessions
            .create(user.id, Duration::zero(), no_device())
            .unwrap();

        let err = sessions.validate(&session.token).unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired));
    }

    #[test]
    fn test_past_expiry_session_is_expired() {
        let (_db, sessions, user) = setup();
        let session = sessions
            .create(user.id, Duration::hours(-1), no_device())
            .unwrap();

        let err = sessions.validate(&session.token).unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired));
    }

    #[test]
    fn test_validate_does_not_extend_expiry() {
        let (db, sessions, user) = setup();
        let session = sessions
            .create(user.id, Duration::hours(24), no_device())
            .unwrap();

        sessions.validate(&session.token).unwrap();

        let row = db.find_session_by_token(&session.token).unwrap().unwrap();
        assert_eq!(row.expires_at, session.expires_at);
    }

    #[test]
    fn test_touch_moves_last_active_forward() {
        let (db, sessions, user) = setup();
        let session = sessions
            .create(user.id, Duration::hours(24), no_device())
            .unwrap();

        sessions.touch(&session);

        let row = db.find_session_by_token(&session.token).unwrap().unwrap();
        assert!(row.last_active_at >= session.last_active_at);
        // Touch is telemetry only; the session is exactly as valid as before.
        assert!(sessions.validate(&session.token).is_ok());
    }

    #[test]
    fn test_device_info_is_stored_untouched() {
        let (_db, sessions, user) = setup();
        let info = serde_json::json!({"os": "android", "app": {"version": "1.4.2"}});
        let session = sessions
            .create(user.id, Duration::hours(24), info.clone())
            .unwrap();

        let (_, resolved) = sessions.validate(&session.token).unwrap();
        assert_eq!(resolved.device_info, info);
    }
}
