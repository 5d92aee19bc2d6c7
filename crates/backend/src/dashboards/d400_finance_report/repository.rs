use contracts::domain::transaction::{CategoryBreakdownRow, TransactionType};
use sea_orm::{DatabaseBackend, FromQueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

/// Income/expense totals of completed transactions, one row per type
#[derive(Debug, FromQueryResult)]
pub struct TypeTotalRow {
    pub transaction_type: String,
    pub total: f64,
}

/// One month's totals as stored, before densification
#[derive(Debug, FromQueryResult)]
pub struct MonthTotalRow {
    pub month: i32,
    pub transaction_type: String,
    pub total: f64,
}

#[derive(Debug, FromQueryResult)]
struct CategoryRow {
    category: String,
    transaction_type: String,
    total: f64,
    count: i64,
}

/// Completed income and expense totals, optionally bounded by a date range
pub async fn totals_by_type(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> anyhow::Result<Vec<TypeTotalRow>> {
    let mut sql = String::from(
        "SELECT type AS transaction_type, COALESCE(SUM(amount), 0.0) AS total \
         FROM a002_transaction WHERE status = 'completed'",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(start) = start_date {
        sql.push_str(" AND date >= ?");
        values.push(start.into());
    }
    if let Some(end) = end_date {
        sql.push_str(" AND date <= ?");
        values.push(end.into());
    }
    sql.push_str(" GROUP BY type");

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values);
    let rows = TypeTotalRow::find_by_statement(stmt)
        .all(get_connection())
        .await?;
    Ok(rows)
}

/// Completed transactions grouped by (category, type), largest total first
pub async fn category_breakdown(
    type_filter: Option<TransactionType>,
) -> anyhow::Result<Vec<CategoryBreakdownRow>> {
    let mut sql = String::from(
        "SELECT category, type AS transaction_type, \
                COALESCE(SUM(amount), 0.0) AS total, COUNT(*) AS count \
         FROM a002_transaction WHERE status = 'completed'",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(tx_type) = type_filter {
        sql.push_str(" AND type = ?");
        values.push(tx_type.as_str().into());
    }
    sql.push_str(" GROUP BY category, type ORDER BY total DESC");

    let stmt = Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values);
    let rows = CategoryRow::find_by_statement(stmt)
        .all(get_connection())
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| CategoryBreakdownRow {
            category: r.category,
            transaction_type: match r.transaction_type.as_str() {
                "expense" => TransactionType::Expense,
                _ => TransactionType::Income,
            },
            total: r.total,
            count: r.count,
        })
        .collect())
}

/// Per-month completed totals of one calendar year, only months with data
pub async fn monthly_totals(year: i32) -> anyhow::Result<Vec<MonthTotalRow>> {
    let sql = "SELECT CAST(strftime('%m', date) AS INTEGER) AS month, \
                      type AS transaction_type, \
                      COALESCE(SUM(amount), 0.0) AS total \
               FROM a002_transaction \
               WHERE status = 'completed' AND strftime('%Y', date) = ? \
               GROUP BY month, type \
               ORDER BY month";

    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        sql,
        [format!("{:04}", year).into()],
    );
    let rows = MonthTotalRow::find_by_statement(stmt)
        .all(get_connection())
        .await?;
    Ok(rows)
}
