use axum::extract::{Json, Query};
use contracts::domain::transaction::{
    CategoryBreakdownRow, FinanceSummary, MonthlyReportRow, TransactionType,
};
use serde::Deserialize;

use crate::dashboards::d400_finance_report::service;
use crate::shared::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

/// GET /api/finance/summary (manager)
pub async fn summary(Query(query): Query<SummaryQuery>) -> Result<Json<FinanceSummary>, ApiError> {
    let summary = service::summary(query.start_date.as_deref(), query.end_date.as_deref())
        .await
        .map_err(|e| ApiError::internal("Failed to build finance summary", e))?;
    Ok(Json(summary))
}

/// GET /api/finance/categories (manager)
pub async fn categories(
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<CategoryBreakdownRow>>, ApiError> {
    let rows = service::categories(query.transaction_type)
        .await
        .map_err(|e| ApiError::internal("Failed to build category breakdown", e))?;
    Ok(Json(rows))
}

/// GET /api/finance/monthly (manager)
pub async fn monthly() -> Result<Json<Vec<MonthlyReportRow>>, ApiError> {
    let report = service::monthly()
        .await
        .map_err(|e| ApiError::internal("Failed to build monthly report", e))?;
    Ok(Json(report))
}
