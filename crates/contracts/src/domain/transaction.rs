use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// Only `Completed` transactions count toward financial summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount: f64,
    pub description: String,
    pub reference: Option<String>,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub date: String,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Option<String>,
    pub amount: f64,
    pub description: String,
    pub reference: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<TransactionStatus>,
    pub date: Option<String>,
}

/// Query filter for the transaction list and summary endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub status: Option<TransactionStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/finance/summary response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_profit: f64,
    /// net_profit / total_income * 100, rounded to 2 decimals; 0 when income is 0.
    pub profit_margin: f64,
}

/// One group of GET /api/finance/categories, sorted by `total` descending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownRow {
    pub category: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total: f64,
    pub count: i64,
}

/// One of exactly 12 rows of GET /api/finance/monthly (month is 1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReportRow {
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_status_use_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let dto: TransactionDto = serde_json::from_str(
            r#"{"type": "expense", "amount": 400.0, "description": "Rent"}"#,
        )
        .unwrap();
        assert_eq!(dto.transaction_type, TransactionType::Expense);
        assert!(dto.status.is_none());
    }
}
