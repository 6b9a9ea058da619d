use axum::{
    Json,
    extract::{Path, State},
};

use ripple_types::api::ProfileResponse;
use ripple_types::models::Profile;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// Public profile view. The `following` flag is computed relative to the
/// viewer and is always false for anonymous requests.
pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    viewer: Option<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let target = state.users.find_by_username(&username)?;

    let following = match &viewer {
        Some(current) => state.follows.is_following(current.user.id, target.id)?,
        None => false,
    };

    Ok(Json(ProfileResponse {
        profile: Profile::new(&target, following),
    }))
}

pub async fn follow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let target = state.users.find_by_username(&username)?;
    state.follows.follow(current.user.id, target.id)?;

    Ok(Json(ProfileResponse {
        profile: Profile::new(&target, true),
    }))
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(username): Path<String>,
    current: CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let target = state.users.find_by_username(&username)?;
    state.follows.unfollow(current.user.id, target.id)?;

    Ok(Json(ProfileResponse {
        profile: Profile::new(&target, false),
    }))
}
