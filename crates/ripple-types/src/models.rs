use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub image: String,
}

/// Proof of authentication. The token is opaque — random bytes, no embedded
/// claims — and only ever resolved through the sessions table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub provider: String,
    pub last_active_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Opaque caller-supplied metadata, stored and returned untouched.
    /// Defaults to an empty object when the login request sent none.
    pub device_info: serde_json::Value,
}

/// Public projection of a [`User`], relative to the requesting identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    /// Not persisted in the users table; always empty for now.
    pub bio: String,
    pub image: String,
    pub following: bool,
}

impl Profile {
    pub fn new(user: &User, following: bool) -> Self {
        Self {
            username: user.username.clone(),
            bio: String::new(),
            image: user.image.clone(),
            following,
        }
    }
}
