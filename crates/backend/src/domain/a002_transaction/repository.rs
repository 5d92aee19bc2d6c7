use contracts::domain::transaction::{Transaction, TransactionFilter, TransactionStatus, TransactionType};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "type")]
    pub transaction_type: String,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub reference: Option<String>,
    pub payment_method: String,
    pub status: String,
    pub date: String,
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn parse_type(raw: &str) -> TransactionType {
    match raw {
        "expense" => TransactionType::Expense,
        _ => TransactionType::Income,
    }
}

fn parse_status(raw: &str) -> TransactionStatus {
    match raw {
        "pending" => TransactionStatus::Pending,
        "cancelled" => TransactionStatus::Cancelled,
        _ => TransactionStatus::Completed,
    }
}

impl From<Model> for Transaction {
    fn from(m: Model) -> Self {
        Transaction {
            id: m.id,
            transaction_type: parse_type(&m.transaction_type),
            category: m.category,
            amount: m.amount,
            description: m.description,
            reference: m.reference,
            payment_method: m.payment_method,
            status: parse_status(&m.status),
            date: m.date,
            created_by: m.created_by,
            created_at: m.created_at.unwrap_or_default(),
            updated_at: m.updated_at.unwrap_or_default(),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active_model(t: &Transaction) -> ActiveModel {
    ActiveModel {
        id: Set(t.id.clone()),
        transaction_type: Set(t.transaction_type.as_str().to_string()),
        category: Set(t.category.clone()),
        amount: Set(t.amount),
        description: Set(t.description.clone()),
        reference: Set(t.reference.clone()),
        payment_method: Set(t.payment_method.clone()),
        status: Set(t.status.as_str().to_string()),
        date: Set(t.date.clone()),
        created_by: Set(t.created_by.clone()),
        created_at: Set(Some(t.created_at.clone())),
        updated_at: Set(Some(t.updated_at.clone())),
    }
}

fn apply_filter(mut query: Select<Entity>, filter: &TransactionFilter) -> Select<Entity> {
    if let Some(tx_type) = filter.transaction_type {
        query = query.filter(Column::TransactionType.eq(tx_type.as_str()));
    }
    if let Some(ref category) = filter.category {
        query = query.filter(Column::Category.eq(category.clone()));
    }
    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(ref start) = filter.start_date {
        query = query.filter(Column::Date.gte(start.clone()));
    }
    if let Some(ref end) = filter.end_date {
        query = query.filter(Column::Date.lte(end.clone()));
    }
    query
}

/// List transactions, most recent date first
pub async fn list(filter: &TransactionFilter) -> anyhow::Result<Vec<Transaction>> {
    let items = apply_filter(Entity::find(), filter)
        .order_by_desc(Column::Date)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Transaction>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(transaction: &Transaction) -> anyhow::Result<()> {
    to_active_model(transaction).insert(conn()).await?;
    Ok(())
}

pub async fn update(transaction: &Transaction) -> anyhow::Result<()> {
    to_active_model(transaction).update(conn()).await?;
    Ok(())
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count() -> anyhow::Result<i64> {
    use sea_orm::PaginatorTrait;
    let count = Entity::find().count(conn()).await?;
    Ok(count as i64)
}

/// Most recent transactions, bounded by `limit`
pub async fn recent(limit: u64) -> anyhow::Result<Vec<Transaction>> {
    let items = Entity::find()
        .order_by_desc(Column::Date)
        .limit(limit)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
