//! Member management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateSuspension, UserDetails},
};

/// Register a new member
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Member registered", body = UserDetails),
        (status = 400, description = "Invalid name or email"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserDetails>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.services.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get member details
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member details", body = UserDetails),
        (status = 404, description = "Member not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserDetails>> {
    let user = state.services.users.get_user(&user_id).await?;
    Ok(Json(user))
}

/// Suspend or reinstate a member
#[utoipa::path(
    put,
    path = "/users/{id}/suspend",
    tag = "users",
    params(
        ("id" = String, Path, description = "Member ID")
    ),
    request_body = UpdateSuspension,
    responses(
        (status = 200, description = "Member updated", body = UserDetails),
        (status = 404, description = "Member not found")
    )
)]
pub async fn update_suspension(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateSuspension>,
) -> AppResult<Json<UserDetails>> {
    let user = state
        .services
        .users
        .set_suspended(&user_id, request.suspended)
        .await?;
    Ok(Json(user))
}
