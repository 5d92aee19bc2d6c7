use serde::{Deserialize, Serialize};

/// Inventory product. `low_stock` is derived: `stock <= min_stock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub stock: i64,
    pub min_stock: i64,
    pub price: f64,
    pub cost: f64,
    pub category: String,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Payload for create/update. SKU is generated when absent on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    pub price: f64,
    #[serde(default)]
    pub cost: Option<f64>,
    pub category: String,
    pub supplier: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Query filter for the product list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub low_stock: Option<bool>,
}

/// Direction of a signed stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    Add,
    Subtract,
}

/// PATCH /api/inventory/:id/stock body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub quantity: i64,
    #[serde(rename = "type")]
    pub direction: StockDirection,
}

/// GET /api/inventory/stats response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_products: i64,
    pub low_stock_products: i64,
    pub total_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_direction_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&StockDirection::Subtract).unwrap(),
            "\"subtract\""
        );
        let adj: StockAdjustment =
            serde_json::from_str(r#"{"quantity": 5, "type": "add"}"#).unwrap();
        assert_eq!(adj.direction, StockDirection::Add);
        assert_eq!(adj.quantity, 5);
    }

    #[test]
    fn low_stock_is_inclusive_of_threshold() {
        let mut p = Product {
            id: "1".into(),
            name: "Widget".into(),
            sku: "SKU-1".into(),
            description: None,
            stock: 10,
            min_stock: 10,
            price: 100.0,
            cost: 60.0,
            category: "Parts".into(),
            supplier: None,
            location: None,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert!(p.is_low_stock());
        p.stock = 11;
        assert!(!p.is_low_stock());
    }
}
