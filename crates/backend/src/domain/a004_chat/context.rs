use contracts::domain::product::Product;
use contracts::domain::project::Project;
use contracts::domain::transaction::{CategoryBreakdownRow, Transaction, TransactionType};
use std::fmt::Write as _;

use crate::dashboards::d400_finance_report::{repository as finance_repo, service as finance};
use crate::domain::{a001_product, a002_transaction, a003_project};
use crate::shared::format::format_idr;
use crate::system::users::repository as users_repo;

const SAMPLE_SIZE: usize = 5;

/// Point-in-time business data gathered for the assistant prompt
pub struct BusinessSnapshot {
    pub product_count: i64,
    pub transaction_count: i64,
    pub project_count: i64,
    pub user_count: i64,
    pub low_stock: Vec<Product>,
    pub top_priced: Vec<Product>,
    pub product_categories: Vec<String>,
    pub recent_transactions: Vec<Transaction>,
    pub active_projects: Vec<Project>,
    pub high_priority_projects: Vec<Project>,
    pub total_income: f64,
    pub total_expense: f64,
    pub income_by_category: Vec<CategoryBreakdownRow>,
    pub expense_by_category: Vec<CategoryBreakdownRow>,
}

/// Gather the snapshot. The independent queries run concurrently.
pub async fn fetch_snapshot() -> anyhow::Result<BusinessSnapshot> {
    let limit = SAMPLE_SIZE as u64;

    let (
        product_count,
        transaction_count,
        project_count,
        user_count,
        low_stock,
        top_priced,
        product_categories,
        recent_transactions,
        active_projects,
        high_priority_projects,
        totals,
        income_by_category,
        expense_by_category,
    ) = tokio::try_join!(
        a001_product::repository::count(),
        a002_transaction::repository::count(),
        a003_project::repository::count(),
        async { anyhow::Ok(users_repo::count_users().await? as i64) },
        a001_product::repository::low_stock(limit),
        a001_product::repository::top_by_price(limit),
        a001_product::repository::distinct_categories(),
        a002_transaction::repository::recent(limit),
        a003_project::repository::active(limit),
        a003_project::repository::high_priority_open(limit),
        finance_repo::totals_by_type(None, None),
        finance_repo::category_breakdown(Some(TransactionType::Income)),
        finance_repo::category_breakdown(Some(TransactionType::Expense)),
    )?;

    let summary = finance::build_summary(&totals);

    Ok(BusinessSnapshot {
        product_count,
        transaction_count,
        project_count,
        user_count,
        low_stock,
        top_priced,
        product_categories,
        recent_transactions,
        active_projects,
        high_priority_projects,
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        income_by_category: income_by_category.into_iter().take(SAMPLE_SIZE).collect(),
        expense_by_category: expense_by_category.into_iter().take(SAMPLE_SIZE).collect(),
    })
}

/// Render the snapshot as the plain-text digest handed to the model
pub fn build_digest(snapshot: &BusinessSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== BUSINESS DATA SNAPSHOT ===");
    let _ = writeln!(
        out,
        "Totals: {} products, {} transactions, {} projects, {} users.",
        snapshot.product_count,
        snapshot.transaction_count,
        snapshot.project_count,
        snapshot.user_count
    );

    let _ = writeln!(out, "\n--- Inventory ---");
    if snapshot.product_categories.is_empty() {
        let _ = writeln!(out, "No product categories yet.");
    } else {
        let _ = writeln!(out, "Categories: {}.", snapshot.product_categories.join(", "));
    }
    if snapshot.low_stock.is_empty() {
        let _ = writeln!(out, "No products are low on stock.");
    } else {
        let _ = writeln!(out, "Low stock products:");
        for p in &snapshot.low_stock {
            let _ = writeln!(
                out,
                "- {} ({}): stock {} / minimum {}",
                p.name, p.sku, p.stock, p.min_stock
            );
        }
    }
    if !snapshot.top_priced.is_empty() {
        let _ = writeln!(out, "Highest priced products:");
        for p in &snapshot.top_priced {
            let _ = writeln!(out, "- {}: {}", p.name, format_idr(p.price));
        }
    }

    let _ = writeln!(out, "\n--- Finance (completed transactions) ---");
    let _ = writeln!(
        out,
        "Total income {}, total expense {}, net {}.",
        format_idr(snapshot.total_income),
        format_idr(snapshot.total_expense),
        format_idr(snapshot.total_income - snapshot.total_expense)
    );
    if !snapshot.income_by_category.is_empty() {
        let _ = writeln!(out, "Top income categories:");
        for row in &snapshot.income_by_category {
            let _ = writeln!(
                out,
                "- {}: {} across {} transactions",
                row.category,
                format_idr(row.total),
                row.count
            );
        }
    }
    if !snapshot.expense_by_category.is_empty() {
        let _ = writeln!(out, "Top expense categories:");
        for row in &snapshot.expense_by_category {
            let _ = writeln!(
                out,
                "- {}: {} across {} transactions",
                row.category,
                format_idr(row.total),
                row.count
            );
        }
    }
    if !snapshot.recent_transactions.is_empty() {
        let _ = writeln!(out, "Recent transactions:");
        for t in &snapshot.recent_transactions {
            let _ = writeln!(
                out,
                "- [{}] {} {} ({}, {})",
                t.date,
                t.transaction_type.as_str(),
                format_idr(t.amount),
                t.category,
                t.status.as_str()
            );
        }
    }

    let _ = writeln!(out, "\n--- Projects ---");
    if snapshot.active_projects.is_empty() {
        let _ = writeln!(out, "No active projects.");
    } else {
        let _ = writeln!(out, "Active projects:");
        for p in &snapshot.active_projects {
            let _ = writeln!(
                out,
                "- {} ({}% complete, {} tasks)",
                p.title,
                p.progress,
                p.tasks.len()
            );
        }
    }
    if !snapshot.high_priority_projects.is_empty() {
        let _ = writeln!(out, "High priority projects still open:");
        for p in &snapshot.high_priority_projects {
            let _ = writeln!(
                out,
                "- {} (status {}, {}% complete)",
                p.title,
                p.status.as_str(),
                p.progress
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::project::{Priority, ProjectStatus};
    use contracts::domain::transaction::TransactionStatus;

    fn empty_snapshot() -> BusinessSnapshot {
        BusinessSnapshot {
            product_count: 0,
            transaction_count: 0,
            project_count: 0,
            user_count: 0,
            low_stock: Vec::new(),
            top_priced: Vec::new(),
            product_categories: Vec::new(),
            recent_transactions: Vec::new(),
            active_projects: Vec::new(),
            high_priority_projects: Vec::new(),
            total_income: 0.0,
            total_expense: 0.0,
            income_by_category: Vec::new(),
            expense_by_category: Vec::new(),
        }
    }

    #[test]
    fn digest_handles_an_empty_database() {
        let digest = build_digest(&empty_snapshot());
        assert!(digest.contains("0 products, 0 transactions, 0 projects, 0 users"));
        assert!(digest.contains("No products are low on stock."));
        assert!(digest.contains("No active projects."));
    }

    #[test]
    fn digest_formats_amounts_as_rupiah() {
        let mut snapshot = empty_snapshot();
        snapshot.total_income = 1_500_000.0;
        snapshot.total_expense = 250_000.0;
        snapshot.income_by_category.push(CategoryBreakdownRow {
            category: "Sales".to_string(),
            transaction_type: TransactionType::Income,
            total: 1_500_000.0,
            count: 3,
        });

        let digest = build_digest(&snapshot);
        assert!(digest.contains("Total income Rp 1.500.000"));
        assert!(digest.contains("net Rp 1.250.000"));
        assert!(digest.contains("- Sales: Rp 1.500.000 across 3 transactions"));
    }

    #[test]
    fn digest_lists_low_stock_and_projects() {
        let mut snapshot = empty_snapshot();
        snapshot.low_stock.push(Product {
            id: "1".into(),
            name: "Cable".into(),
            sku: "SKU-9".into(),
            description: None,
            stock: 2,
            min_stock: 10,
            price: 15_000.0,
            cost: 9_000.0,
            category: "Parts".into(),
            supplier: None,
            location: None,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        });
        snapshot.active_projects.push(Project {
            id: "p1".into(),
            title: "Warehouse move".into(),
            description: None,
            status: ProjectStatus::Active,
            priority: Priority::High,
            start_date: None,
            end_date: None,
            budget: None,
            manager: None,
            team: Vec::new(),
            tasks: Vec::new(),
            progress: 40,
            created_at: String::new(),
            updated_at: String::new(),
        });
        snapshot.recent_transactions.push(Transaction {
            id: "t1".into(),
            transaction_type: TransactionType::Expense,
            category: "Operations".into(),
            amount: 75_000.0,
            description: "Fuel".into(),
            reference: None,
            payment_method: "cash".into(),
            status: TransactionStatus::Completed,
            date: "2026-02-01".into(),
            created_by: None,
            created_at: String::new(),
            updated_at: String::new(),
        });

        let digest = build_digest(&snapshot);
        assert!(digest.contains("- Cable (SKU-9): stock 2 / minimum 10"));
        assert!(digest.contains("- Warehouse move (40% complete, 0 tasks)"));
        assert!(digest.contains("expense Rp 75.000 (Operations, completed)"));
    }
}
