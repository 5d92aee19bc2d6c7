use axum::extract::Json;
use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};
use contracts::system::users::{ChangePasswordDto, RegisterDto, User};
use serde_json::{json, Value};

use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::{auth::jwt, users::service as user_service};

/// POST /api/auth/register
pub async fn register(Json(dto): Json<RegisterDto>) -> Result<Json<Value>, ApiError> {
    user_service::register(dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(Json(json!({ "message": "User registered successfully" })))
}

/// POST /api/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let user = user_service::verify_credentials(&request.email, &request.password)
        .await
        .map_err(|e| ApiError::Forbidden(e.to_string()))?
        .ok_or_else(|| ApiError::validation("Invalid email or password"))?;

    let token = jwt::generate_access_token(&user.id, user.role, &user.name)
        .await
        .map_err(|e| ApiError::internal("Login failed", e))?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            department: user.department,
        },
    }))
}

/// GET /api/auth/profile
pub async fn profile(CurrentUser(claims): CurrentUser) -> Result<Json<User>, ApiError> {
    let user = user_service::get_by_id(&claims.sub)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch profile", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}

/// PUT /api/auth/password
pub async fn update_password(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ChangePasswordDto>,
) -> Result<Json<Value>, ApiError> {
    user_service::change_password(&claims.sub, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
