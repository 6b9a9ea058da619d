//! User records and password verification.

use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use ripple_db::{Database, is_unique_violation};
use ripple_types::models::User;

use crate::error::AuthError;
use crate::user_from_row;

/// Profile fields for registration. The password travels separately and is
/// hashed before it reaches storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub image: String,
}

/// Partial update of an existing user. `None` leaves a field unchanged;
/// a new password is re-hashed.
#[derive(Debug, Default, Clone)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
}

/// Owns user records and every operation that sees password material.
/// Hashes never leave this module.
pub struct CredentialStore {
    db: Arc<Database>,
}

impl CredentialStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a user with an Argon2id-hashed password. The username unique
    /// constraint is the arbiter under concurrent registration.
    pub fn register(&self, new_user: &NewUser, password: &str) -> Result<User, AuthError> {
        let password_hash = hash_password(password)?;

        match self.db.create_user(
            &new_user.username,
            &new_user.email,
            &new_user.name,
            &new_user.last_name,
            &new_user.image,
            &password_hash,
        ) {
            Ok(row) => Ok(user_from_row(row)),
            Err(err) if is_unique_violation(&err, "users.username") => {
                Err(AuthError::DuplicateUsername)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Verify a username/password pair.
    ///
    /// An unknown username and a wrong password both come back as
    /// [`AuthError::InvalidCredentials`]; the unknown-username path burns
    /// one hashing pass so its latency matches verification, keeping the
    /// two cases observably identical (no username enumeration).
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Some(row) = self.db.find_user_by_username(username)? else {
            let _ = hash_password(password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(&row.password_hash, password)?;
        Ok(user_from_row(row))
    }

    /// Apply a partial update to the user's profile fields.
    pub fn update(&self, user_id: i64, update: &UserUpdate) -> Result<User, AuthError> {
        let mut row = self
            .db
            .find_user_by_id(user_id)?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(username) = &update.username {
            row.username = username.clone();
        }
        if let Some(email) = &update.email {
            row.email = email.clone();
        }
        if let Some(name) = &update.name {
            row.name = name.clone();
        }
        if let Some(last_name) = &update.last_name {
            row.last_name = last_name.clone();
        }
        if let Some(image) = &update.image {
            row.image = image.clone();
        }
        if let Some(password) = &update.password {
            row.password_hash = hash_password(password)?;
        }

        match self.db.update_user(&row) {
            Ok(()) => Ok(user_from_row(row)),
            Err(err) if is_unique_violation(&err, "users.username") => {
                Err(AuthError::DuplicateUsername)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn find_by_id(&self, id: i64) -> Result<User, AuthError> {
        let row = self.db.find_user_by_id(id)?.ok_or(AuthError::UserNotFound)?;
        Ok(user_from_row(row))
    }

    pub fn find_by_username(&self, username: &str) -> Result<User, AuthError> {
        let row = self
            .db
            .find_user_by_username(username)?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user_from_row(row))
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

fn verify_password(stored_hash: &str, password: &str) -> Result<(), AuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| anyhow!("stored hash unparseable: {e}"))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
