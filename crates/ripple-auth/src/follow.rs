//! Directed follow edges between users.

use std::sync::Arc;

use ripple_db::Database;

use crate::error::AuthError;

/// Owns follow-edge records. Authorization (who may call this) is the
/// gate's business; the graph itself only rejects self-follows.
pub struct FollowGraph {
    db: Arc<Database>,
}

impl FollowGraph {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Add an edge. Idempotent: following someone already followed is a
    /// no-op, not an error. Self-follow is rejected before any lookup, so
    /// it fails the same way whether or not the user exists.
    pub fn follow(&self, follower_id: i64, target_id: i64) -> Result<(), AuthError> {
        if follower_id == target_id {
            return Err(AuthError::SelfFollow);
        }
        self.db.insert_follow(follower_id, target_id)?;
        Ok(())
    }

    /// Remove an edge if present; absence is not an error.
    pub fn unfollow(&self, follower_id: i64, target_id: i64) -> Result<(), AuthError> {
        self.db.delete_follow(follower_id, target_id)?;
        Ok(())
    }

    pub fn is_following(&self, follower_id: i64, target_id: i64) -> Result<bool, AuthError> {
        Ok(self.db.is_following(follower_id, target_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{CredentialStore, NewUser};
    use ripple_types::models::User;

    fn setup() -> (FollowGraph, User, User) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let users = CredentialStore::new(db.clone());
        let register = |username: &str| {
            users
                .register(
                    &NewUser {
                        username: username.into(),
                        email: String::new(),
                        name: String::new(),
                        last_name: String::new(),
                        image: String::new(),
                    },
                    "secret1",
                )
                .unwrap()
        };
        let ana = register("ana");
        let bea = register("bea");
        (FollowGraph::new(db), ana, bea)
    }

    #[test]
    fn test_follow_then_unfollow() {
        let (graph, ana, bea) = setup();

        graph.follow(ana.id, bea.id).unwrap();
        assert!(graph.is_following(ana.id, bea.id).unwrap());
        // Directed: the reverse edge does not exist.
        assert!(!graph.is_following(bea.id, ana.id).unwrap());

        graph.unfollow(ana.id, bea.id).unwrap();
        assert!(!graph.is_following(ana.id, bea.id).unwrap());
    }

    #[test]
    fn test_follow_is_idempotent() {
        let (graph, ana, bea) = setup();

        graph.follow(ana.id, bea.id).unwrap();
        graph.follow(ana.id, bea.id).unwrap();
        assert!(graph.is_following(ana.id, bea.id).unwrap());

        // One unfollow clears the single edge.
        graph.unfollow(ana.id, bea.id).unwrap();
        assert!(!graph.is_following(ana.id, bea.id).unwrap());
    }

    #[test]
    fn test_unfollow_without_edge_is_a_noop() {
        let (graph, ana, bea) = setup();
        graph.unfollow(ana.id, bea.id).unwrap();
        assert!(!graph.is_following(ana.id, bea.id).unwrap());
    }

    #[test]
    fn test_self_follow_rejected() {
        let (graph, ana, _bea) = setup();
        let err = graph.follow(ana.id, ana.id).unwrap_err();
        assert!(matches!(err, AuthError::SelfFollow));
    }

    #[test]
    fn test_self_follow_rejected_even_for_unknown_user() {
        let (graph, _ana, _bea) = setup();
        let err = graph.follow(999, 999).unwrap_err();
        assert!(matches!(err, AuthError::SelfFollow));
    }
}
