use contracts::domain::product::{InventoryStats, Product, ProductFilter};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseBackend, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
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
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(m: Model) -> Self {
        Product {
            id: m.id,
            name: m.name,
            sku: m.sku,
            description: m.description,
            stock: m.stock,
            min_stock: m.min_stock,
            price: m.price,
            cost: m.cost,
            category: m.category,
            supplier: m.supplier,
            location: m.location,
            is_active: m.is_active,
            created_at: m.created_at.unwrap_or_default(),
            updated_at: m.updated_at.unwrap_or_default(),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active_model(p: &Product) -> ActiveModel {
    ActiveModel {
        id: Set(p.id.clone()),
        name: Set(p.name.clone()),
        sku: Set(p.sku.clone()),
        description: Set(p.description.clone()),
        stock: Set(p.stock),
        min_stock: Set(p.min_stock),
        price: Set(p.price),
        cost: Set(p.cost),
        category: Set(p.category.clone()),
        supplier: Set(p.supplier.clone()),
        location: Set(p.location.clone()),
        is_active: Set(p.is_active),
        created_at: Set(Some(p.created_at.clone())),
        updated_at: Set(Some(p.updated_at.clone())),
    }
}

/// List products, newest first, with optional category/search/low-stock filter
pub async fn list(filter: &ProductFilter) -> anyhow::Result<Vec<Product>> {
    let mut query = Entity::find();

    if let Some(ref category) = filter.category {
        query = query.filter(Column::Category.eq(category.clone()));
    }
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", search);
        query = query.filter(
            Condition::any()
                .add(Column::Name.like(pattern.as_str()))
                .add(Column::Sku.like(pattern.as_str())),
        );
    }
    if filter.low_stock == Some(true) {
        query = query.filter(Expr::col(Column::Stock).lte(Expr::col(Column::MinStock)));
    }

    let items = query
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Product>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_sku(sku: &str) -> anyhow::Result<Option<Product>> {
    let result = Entity::find()
        .filter(Column::Sku.eq(sku))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(product: &Product) -> anyhow::Result<()> {
    to_active_model(product).insert(conn()).await?;
    Ok(())
}

pub async fn update(product: &Product) -> anyhow::Result<()> {
    to_active_model(product).update(conn()).await?;
    Ok(())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

/// Persist a new stock level, bumping updated_at
pub async fn set_stock(id: &str, stock: i64) -> anyhow::Result<()> {
    Entity::update_many()
        .col_expr(Column::Stock, Expr::value(stock))
        .col_expr(
            Column::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(())
}

/// Distinct product categories
pub async fn distinct_categories() -> anyhow::Result<Vec<String>> {
    #[derive(Debug, FromQueryResult)]
    struct CategoryRow {
        category: String,
    }

    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT DISTINCT category FROM a001_product ORDER BY category".to_string(),
    );
    let rows = CategoryRow::find_by_statement(stmt).all(conn()).await?;

    Ok(rows.into_iter().map(|r| r.category).collect())
}

/// Aggregated inventory statistics, computed from current rows on every call
pub async fn stats() -> anyhow::Result<InventoryStats> {
    #[derive(Debug, FromQueryResult)]
    struct StatsRow {
        total_products: i64,
        low_stock_products: i64,
        total_value: f64,
    }

    let sql = r#"
        SELECT
            COUNT(*) AS total_products,
            COALESCE(SUM(CASE WHEN stock <= min_stock THEN 1 ELSE 0 END), 0) AS low_stock_products,
            COALESCE(SUM(stock * price), 0.0) AS total_value
        FROM a001_product
    "#;

    let stmt = Statement::from_string(DatabaseBackend::Sqlite, sql.to_string());
    let row = StatsRow::find_by_statement(stmt)
        .one(conn())
        .await?
        .ok_or_else(|| anyhow::anyhow!("Empty inventory stats result"))?;

    Ok(InventoryStats {
        total_products: row.total_products,
        low_stock_products: row.low_stock_products,
        total_value: row.total_value,
    })
}

/// Count all products
pub async fn count() -> anyhow::Result<i64> {
    #[derive(Debug, FromQueryResult)]
    struct CountRow {
        count: i64,
    }

    let stmt = Statement::from_string(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS count FROM a001_product".to_string(),
    );
    let row = CountRow::find_by_statement(stmt).one(conn()).await?;
    Ok(row.map(|r| r.count).unwrap_or(0))
}

/// Low-stock products, lowest stock first, bounded by `limit`
pub async fn low_stock(limit: u64) -> anyhow::Result<Vec<Product>> {
    use sea_orm::QuerySelect;

    let items = Entity::find()
        .filter(Expr::col(Column::Stock).lte(Expr::col(Column::MinStock)))
        .order_by_asc(Column::Stock)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Most expensive products first, bounded by `limit`
pub async fn top_by_price(limit: u64) -> anyhow::Result<Vec<Product>> {
    use sea_orm::QuerySelect;

    let items = Entity::find()
        .order_by_desc(Column::Price)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
