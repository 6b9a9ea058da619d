pub mod credentials;
pub mod error;
pub mod follow;
pub mod session;
pub mod token;

pub use credentials::CredentialStore;
pub use error::AuthError;
pub use follow::FollowGraph;
pub use session::SessionManager;

use ripple_db::models::UserRow;
use ripple_types::models::User;

/// Project a storage row onto the public user model. The password hash
/// stays behind in the row.
pub(crate) fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
        name: row.name,
        last_name: row.last_name,
        image: row.image,
    }
}
