//! Request handlers for the user endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::auth::{MaybeUser, policy};
use crate::user::{CreateUserRequest, UpdateUserRequest, UserSummary};

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint, no authentication.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Authenticate with username/password and receive a bearer token.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .verify_credentials(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = state
        .auth
        .codec()
        .encode(user.id, &user.username, Some(&user.email), user.role())
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token }))
}

/// Create a new user. No authentication required.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    let user = state.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user. Requires authentication; any authenticated user may
/// update any record (no ownership gate, matching existing behavior).
#[instrument(skip(state, user, request))]
pub async fn update_user(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserSummary>> {
    let user = user.ok_or_else(ApiError::unauthorized)?;

    if !policy::can_update(&user, id) {
        return Err(ApiError::forbidden());
    }

    let updated = state.users.update_user(id, request).await?;
    Ok(Json(updated.into()))
}

/// Delete a user. Owners and admins only.
#[instrument(skip(state, user))]
pub async fn delete_user(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let user = user.ok_or_else(ApiError::unauthorized)?;

    if !policy::can_delete(&user, id) {
        return Err(ApiError::forbidden());
    }

    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all users. No authentication required (matching existing behavior).
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.users.list_users().await?;
    let summaries: Vec<UserSummary> = users.into_iter().map(Into::into).collect();
    Ok(Json(summaries))
}

/// Get the current user's own record.
#[instrument(skip(state, user))]
pub async fn get_me(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> ApiResult<Json<UserSummary>> {
    let user = user.ok_or_else(ApiError::unauthorized)?;

    if !policy::can_view_self(&user) {
        return Err(ApiError::forbidden());
    }

    state
        .users
        .get_user(user.id)
        .await?
        .map(|u| Json(u.into()))
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", user.id)))
}
