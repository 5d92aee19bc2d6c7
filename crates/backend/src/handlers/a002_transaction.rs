use axum::extract::{Json, Path, Query};
use contracts::domain::transaction::{Transaction, TransactionDto, TransactionFilter};
use contracts::system::users::UserRole;
use serde_json::{json, Value};

use crate::domain::a002_transaction::service;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::ensure_role;

/// GET /api/finance (manager)
pub async fn list(
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = service::list(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch transactions", e))?;
    Ok(Json(transactions))
}

/// GET /api/finance/:id (manager)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Transaction>, ApiError> {
    let transaction = service::get_by_id(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch transaction", e))?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// POST /api/finance (manager)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<TransactionDto>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = service::create(dto, Some(claims.sub))
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(Json(transaction))
}

/// PUT /api/finance/:id (manager)
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<TransactionDto>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = service::update(&id, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// DELETE /api/finance/:id (admin)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin])?;
    let deleted = service::delete(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete transaction", e))?;

    if !deleted {
        return Err(ApiError::not_found("Transaction not found"));
    }

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
