pub mod error;
pub mod extract;
pub mod health;
pub mod profiles;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::Duration;

use ripple_auth::{CredentialStore, FollowGraph, SessionManager};
use ripple_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: CredentialStore,
    pub sessions: SessionManager,
    pub follows: FollowGraph,
    pub session_ttl: Duration,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, session_ttl: Duration) -> AppState {
        Arc::new(Self {
            users: CredentialStore::new(db.clone()),
            sessions: SessionManager::new(db.clone()),
            follows: FollowGraph::new(db),
            session_ttl,
        })
    }
}

/// Full route table. Protected routes enforce authentication through the
/// [`extract::CurrentUser`] extractor rather than a middleware layer, so
/// each handler's auth tier is visible in its signature.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/profiles/{username}", get(profiles::profile));

    let protected = Router::new()
        .route("/user/", get(users::current).put(users::update))
        .route(
            "/profiles/{username}/follow",
            post(profiles::follow).delete(profiles::unfollow),
        );

    Router::new().merge(public).merge(protected).with_state(state)
}
