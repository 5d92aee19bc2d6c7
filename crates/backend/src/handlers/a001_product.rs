use axum::extract::{Json, Path, Query};
use contracts::domain::product::{
    InventoryStats, Product, ProductDto, ProductFilter, StockAdjustment,
};
use serde_json::{json, Value};

use contracts::system::users::UserRole;

use crate::domain::a001_product::service;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::middleware::ensure_role;

/// GET /api/inventory
pub async fn list(Query(filter): Query<ProductFilter>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = service::list(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch products", e))?;
    Ok(Json(products))
}

/// GET /api/inventory/stats
pub async fn stats() -> Result<Json<InventoryStats>, ApiError> {
    let stats = service::stats()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch inventory stats", e))?;
    Ok(Json(stats))
}

/// GET /api/inventory/categories
pub async fn categories() -> Result<Json<Vec<String>>, ApiError> {
    let categories = service::categories()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch categories", e))?;
    Ok(Json(categories))
}

/// GET /api/inventory/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Product>, ApiError> {
    let product = service::get_by_id(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch product", e))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// POST /api/inventory (manager)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin, UserRole::Manager])?;
    let product = service::create(dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(Json(product))
}

/// PUT /api/inventory/:id (manager)
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ProductDto>,
) -> Result<Json<Product>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin, UserRole::Manager])?;
    let product = service::update(&id, dto)
        .await
        .map_err(|e| ApiError::validation(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// PATCH /api/inventory/:id/stock (manager)
pub async fn adjust_stock(
    Path(id): Path<String>,
    Json(adjustment): Json<StockAdjustment>,
) -> Result<Json<Product>, ApiError> {
    let outcome = service::adjust_stock(&id, adjustment)
        .await
        .map_err(|e| ApiError::internal("Failed to adjust stock", e))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    match outcome {
        Ok(product) => Ok(Json(product)),
        Err(e) => Err(ApiError::validation(e.to_string())),
    }
}

/// DELETE /api/inventory/:id (admin)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    ensure_role(&claims, &[UserRole::Admin])?;
    let deleted = service::delete(&id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete product", e))?;

    if !deleted {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
