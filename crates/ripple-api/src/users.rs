use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use ripple_auth::credentials::{NewUser, UserUpdate};
use ripple_types::api::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateUserRequest,
    UserResponse,
};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::CurrentUser;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_user = NewUser {
        username: req.username,
        email: req.email,
        name: req.name,
        last_name: req.last_name,
        image: req.image,
    };

    let user = state.users.register(&new_user, &req.password)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.users.authenticate(&req.username, &req.password)?;

    let device_info = req.device_info.unwrap_or_else(|| serde_json::json!({}));
    let session = state
        .sessions
        .create(user.id, state.session_ttl, device_info)?;

    Ok(Json(LoginResponse {
        user,
        token: session.token,
        expires_at: session.expires_at,
    }))
}

pub async fn current(current: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse { user: current.user })
}

pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let update = UserUpdate {
        username: req.username,
        email: req.email,
        password: req.password,
        name: req.name,
        last_name: req.last_name,
        image: req.image,
    };

    let user = state.users.update(current.user.id, &update)?;
    Ok(Json(UserResponse { user }))
}
