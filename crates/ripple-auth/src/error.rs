use thiserror::Error;

/// Typed failures surfaced by the auth core. The HTTP boundary maps these
/// onto status codes; the core never sees transport concerns.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Covers both "no such user" and "wrong password" on login, so the
    /// two are indistinguishable to the caller.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("username already taken")]
    DuplicateUsername,

    #[error("session not found")]
    SessionNotFound,

    #[error("session expired")]
    SessionExpired,

    #[error("users cannot follow themselves")]
    SelfFollow,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
