//! User management API handlers
//!
//! Listing and activation changes are admin-only. Any authenticated user
//! may read a profile; updates are limited to admins and the owner.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::info;

use super::dto::{UpdateUserRequest, UserDto};
use crate::domain::{DomainError, UserRole};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::AuthHandlerState;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users, newest first", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<UserDto>> {
    caller.require_role(&[UserRole::Admin])?;

    let users = state.user_service.list_users().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AuthHandlerState>,
    Path(id): Path<String>,
) -> ApiResult<UserDto> {
    let user = state.user_service.get_user(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<UserDto> {
    if !caller.is_admin() && caller.user_id != id {
        return Err(domain_error(DomainError::Forbidden(
            "Only admins can update other users".into(),
        )));
    }

    let user = state
        .user_service
        .update_user(&id, request.into())
        .await
        .map_err(domain_error)?;

    info!(user_id = %user.id, updated_by = %caller.user_id, "User updated");
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/toggle-status",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn toggle_status(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> ApiResult<UserDto> {
    caller.require_role(&[UserRole::Admin])?;

    let user = state
        .user_service
        .toggle_status(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}
