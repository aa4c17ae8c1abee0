//! User handlers

use crate::error::ApiResult;
use crate::extractors::{parse_id, JsonBody};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use blog_core::{CreateProfileRequest, CreateUserRequest, Profile, User, UserDetail};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDetail>> {
    let id = parse_id("User", &id)?;
    Ok(Json(state.users.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn create_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    let user_id = parse_id("User", &id)?;
    let profile = state.users.create_profile(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}
