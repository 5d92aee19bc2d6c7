use axum::extract::{Json, Path};
use contracts::system::users::{UpdateUserDto, User, UserRole};
use serde_json::{json, Value};

use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::ensure_role;
use crate::system::users::service;

/// GET /api/users (admin)
pub async fn list() -> Result<Json<Vec<User>>, ApiError> {
    let users = service::list_all()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch users", e))?;
    Ok(Json(users))
}

/// GET /api/users/:id (admin, manager)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<User>, ApiError> {
    let user = service::get_by_id(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch user", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// PUT /api/users/:id (admin)
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<User>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin])?;
    let user = service::update(&id, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

/// DELETE /api/users/:id (admin)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin])?;
    let deleted = service::delete(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete user", e))?;

    if !deleted {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
