use axum::{body::Body, extract::Request, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;
use contracts::system::users::UserRole;

use crate::shared::error::ApiError;

/// Role gate: returns true when `role` is in the allowed set.
pub fn is_allowed(role: UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(&role)
}

async fn authorize(
    mut req: Request<Body>,
    next: Next,
    allowed: Option<&[UserRole]>,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

    let claims = super::jwt::validate_token(token)
        .await
        .map_err(|_| ApiError::Forbidden("Invalid or expired token".to_string()))?;

    if let Some(allowed) = allowed {
        if !is_allowed(claims.role, allowed) {
            return Err(ApiError::Forbidden("Access denied".to_string()));
        }
    }

    // Make claims available to handlers via the CurrentUser extractor
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Middleware that requires a valid JWT (any role)
pub async fn require_auth(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize(req, next, None).await
}

/// Middleware that requires the admin or manager role
pub async fn require_manager(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize(req, next, Some(&[UserRole::Admin, UserRole::Manager])).await
}

/// Middleware that requires the admin role
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    authorize(req, next, Some(&[UserRole::Admin])).await
}

/// Re-check a role set inside a handler, for routes where only one method
/// of a shared path needs the stricter gate.
pub fn ensure_role(claims: &TokenClaims, allowed: &[UserRole]) -> Result<(), ApiError> {
    if is_allowed(claims.role, allowed) {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mapping() {
        let managers = [UserRole::Admin, UserRole::Manager];
        assert!(is_allowed(UserRole::Admin, &managers));
        assert!(is_allowed(UserRole::Manager, &managers));
        assert!(!is_allowed(UserRole::Staff, &managers));

        let admins = [UserRole::Admin];
        assert!(is_allowed(UserRole::Admin, &admins));
        assert!(!is_allowed(UserRole::Manager, &admins));
    }
}
