use chrono::Utc;
use contracts::domain::transaction::{
    Transaction, TransactionDto, TransactionFilter, TransactionStatus, TransactionType,
};
use uuid::Uuid;

use super::repository;

/// Fallback category per transaction type when the payload omits one
pub fn default_category(tx_type: TransactionType) -> &'static str {
    match tx_type {
        TransactionType::Income => "Sales",
        TransactionType::Expense => "Operations",
    }
}

pub async fn list(filter: &TransactionFilter) -> anyhow::Result<Vec<Transaction>> {
    repository::list(filter).await
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Transaction>> {
    repository::get_by_id(id).await
}

pub async fn create(dto: TransactionDto, created_by: Option<String>) -> anyhow::Result<Transaction> {
    if dto.description.trim().is_empty() {
        anyhow::bail!("Description is required");
    }
    if dto.amount <= 0.0 {
        anyhow::bail!("Amount must be greater than zero");
    }

    let now = Utc::now().to_rfc3339();
    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        transaction_type: dto.transaction_type,
        category: dto
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_category(dto.transaction_type).to_string()),
        amount: dto.amount,
        description: dto.description,
        reference: Some(
            dto.reference
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| format!("TXN-{}", Utc::now().timestamp_millis())),
        ),
        payment_method: dto.payment_method.unwrap_or_else(|| "cash".to_string()),
        status: dto.status.unwrap_or(TransactionStatus::Completed),
        date: dto.date.unwrap_or_else(|| now.clone()),
        created_by,
        created_at: now.clone(),
        updated_at: now,
    };

    repository::insert(&transaction).await?;
    Ok(transaction)
}

pub async fn update(id: &str, dto: TransactionDto) -> anyhow::Result<Option<Transaction>> {
    let Some(mut transaction) = repository::get_by_id(id).await? else {
        return Ok(None);
    };

    if dto.amount <= 0.0 {
        anyhow::bail!("Amount must be greater than zero");
    }

    transaction.transaction_type = dto.transaction_type;
    transaction.amount = dto.amount;
    transaction.description = dto.description;
    if let Some(category) = dto.category {
        transaction.category = category;
    }
    if let Some(reference) = dto.reference {
        transaction.reference = Some(reference);
    }
    if let Some(payment_method) = dto.payment_method {
        transaction.payment_method = payment_method;
    }
    if let Some(status) = dto.status {
        transaction.status = status;
    }
    if let Some(date) = dto.date {
        transaction.date = date;
    }
    transaction.updated_at = Utc::now().to_rfc3339();

    repository::update(&transaction).await?;
    Ok(Some(transaction))
}

pub async fn delete(id: &str) -> anyhow::Result<bool> {
    repository::delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_categories_depend_on_type() {
        assert_eq!(default_category(TransactionType::Income), "Sales");
        assert_eq!(default_category(TransactionType::Expense), "Operations");
    }
}
