use chrono::Utc;
use contracts::domain::product::{
    InventoryStats, Product, ProductDto, ProductFilter, StockAdjustment, StockDirection,
};
use thiserror::Error;
use uuid::Uuid;

use super::repository;

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,
    #[error("Insufficient stock")]
    InsufficientStock,
}

/// Compute the stock level after an adjustment without touching storage.
/// Subtracting more than the current level is rejected; additions are unbounded.
pub fn apply_adjustment(stock: i64, quantity: i64, direction: StockDirection) -> Result<i64, StockError> {
    if quantity <= 0 {
        return Err(StockError::InvalidQuantity);
    }
    match direction {
        StockDirection::Add => Ok(stock + quantity),
        StockDirection::Subtract => {
            if quantity > stock {
                Err(StockError::InsufficientStock)
            } else {
                Ok(stock - quantity)
            }
        }
    }
}

pub async fn list(filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
    repository::list(filter).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Product>> {
    repository::get_by_id(id).await
}

pub async fn create(dto: ProductDto) -> anyhow::Result<Product> {
    if dto.name.trim().is_empty() {
        anyhow::bail!("Product name is required");
    }
    if dto.category.trim().is_empty() {
        anyhow::bail!("Product category is required");
    }
    if dto.price < 0.0 {
        anyhow::bail!("Price cannot be negative");
    }

    let sku = match dto.sku {
        Some(sku) if !sku.trim().is_empty() => sku,
        _ => format!("SKU-{}", Utc::now().timestamp_millis()),
    };

    if repository::get_by_sku(&sku).await?.is_some() {
        anyhow::bail!("A product with this SKU already exists");
    }

    let now = Utc::now().to_rfc3339();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: dto.name,
        sku,
        description: dto.description,
        stock: dto.stock.unwrap_or(0),
        min_stock: dto.min_stock.unwrap_or(10),
        price: dto.price,
        cost: dto.cost.unwrap_or(0.0),
        category: dto.category,
        supplier: dto.supplier,
        location: dto.location,
        is_active: dto.is_active.unwrap_or(true),
        created_at: now.clone(),
        updated_at: now,
    };

    repository::insert(&product).await?;
    Ok(product)
}

pub async fn update(id: &str, dto: ProductDto) -> anyhow::Result<Option<Product>> {
    let Some(mut product) = repository::get_by_id(id).await? else {
        return Ok(None);
    };

    if let Some(sku) = dto.sku {
        if sku != product.sku {
            if repository::get_by_sku(&sku).await?.is_some() {
                anyhow::bail!("A product with this SKU already exists");
            }
            product.sku = sku;
        }
    }

    product.name = dto.name;
    product.category = dto.category;
    product.price = dto.price;
    product.description = dto.description;
    product.supplier = dto.supplier;
    product.location = dto.location;
    if let Some(stock) = dto.stock {
        product.stock = stock;
    }
    if let Some(min_stock) = dto.min_stock {
        product.min_stock = min_stock;
    }
    if let Some(cost) = dto.cost {
        product.cost = cost;
    }
    if let Some(is_active) = dto.is_active {
        product.is_active = is_active;
    }
    product.updated_at = Utc::now().to_rfc3339();

    repository::update(&product).await?;
    Ok(Some(product))
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::delete(id).await
}

/// Adjust stock for a product. Returns the updated product, or None if it
/// does not exist. A failed guard leaves the stored stock untouched.
pub async fn adjust_stock(
    id: &str,
    adjustment: StockAdjustment,
) -> anyhow::Result<Option<Result<Product, StockError>>> {
    let Some(mut product) = repository::get_by_id(id).await? else {
        return Ok(None);
    };

    match apply_adjustment(product.stock, adjustment.quantity, adjustment.direction) {
        Ok(new_stock) => {
            repository::set_stock(id, new_stock).await?;
            product.stock = new_stock;
            product.updated_at = Utc::now().to_rfc3339();
            Ok(Some(Ok(product)))
        }
        Err(e) => Ok(Some(Err(e))),
    }
}

pub async fn stats() -> anyhow::Result<InventoryStats> {
    repository::stats().await
}

pub async fn categories() -> anyhow::Result<Vec<String>> {
    repository::distinct_categories().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_increases_stock() {
        assert_eq!(apply_adjustment(5, 3, StockDirection::Add).unwrap(), 8);
    }

    #[test]
    fn add_is_unbounded() {
        assert_eq!(
            apply_adjustment(0, 1_000_000, StockDirection::Add).unwrap(),
            1_000_000
        );
    }

    #[test]
    fn subtract_within_stock_reduces_exactly() {
        assert_eq!(apply_adjustment(10, 10, StockDirection::Subtract).unwrap(), 0);
        assert_eq!(apply_adjustment(10, 4, StockDirection::Subtract).unwrap(), 6);
    }

    #[test]
    fn subtract_beyond_stock_is_rejected() {
        let err = apply_adjustment(3, 4, StockDirection::Subtract).unwrap_err();
        assert!(matches!(err, StockError::InsufficientStock));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(matches!(
            apply_adjustment(10, 0, StockDirection::Add),
            Err(StockError::InvalidQuantity)
        ));
        assert!(matches!(
            apply_adjustment(10, -2, StockDirection::Subtract),
            Err(StockError::InvalidQuantity)
        ));
    }
}
