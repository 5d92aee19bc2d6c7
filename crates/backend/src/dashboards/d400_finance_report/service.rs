use contracts::domain::transaction::{
    CategoryBreakdownRow, FinanceSummary, MonthlyReportRow, TransactionType,
};

use super::repository::{self, MonthTotalRow, TypeTotalRow};

/// Fold per-type totals into a summary. The margin is net profit over income
/// as a percentage, rounded to 2 decimals, and 0 when there is no income.
pub fn build_summary(rows: &[TypeTotalRow]) -> FinanceSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    for row in rows {
        match row.transaction_type.as_str() {
            "income" => total_income += row.total,
            "expense" => total_expense += row.total,
            _ => {}
        }
    }

    let net_profit = total_income - total_expense;
    let profit_margin = if total_income == 0.0 {
        0.0
    } else {
        (net_profit / total_income * 100.0 * 100.0).round() / 100.0
    };

    FinanceSummary {
        total_income,
        total_expense,
        net_profit,
        profit_margin,
    }
}

/// Expand sparse month rows into exactly 12 entries, January through
/// December, with zeros where no data exists.
pub fn densify_months(rows: &[MonthTotalRow]) -> Vec<MonthlyReportRow> {
    let mut report: Vec<MonthlyReportRow> = (1..=12)
        .map(|month| MonthlyReportRow {
            month,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for row in rows {
        if !(1..=12).contains(&row.month) {
            continue;
        }
        let entry = &mut report[(row.month - 1) as usize];
        match row.transaction_type.as_str() {
            "income" => entry.income += row.total,
            "expense" => entry.expense += row.total,
            _ => {}
        }
    }

    report
}

pub async fn summary(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> anyhow::Result<FinanceSummary> {
    let rows = repository::totals_by_type(start_date, end_date).await?;
    Ok(build_summary(&rows))
}

pub async fn categories(
    type_filter: Option<TransactionType>,
) -> anyhow::Result<Vec<CategoryBreakdownRow>> {
    repository::category_breakdown(type_filter).await
}

/// Monthly report for the current calendar year
pub async fn monthly() -> anyhow::Result<Vec<MonthlyReportRow>> {
    use chrono::Datelike;
    let year = chrono::Utc::now().year();
    let rows = repository::monthly_totals(year).await?;
    Ok(densify_months(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(transaction_type: &str, total: f64) -> TypeTotalRow {
        TypeTotalRow {
            transaction_type: transaction_type.to_string(),
            total,
        }
    }

    #[test]
    fn summary_ignores_non_completed_amounts_by_construction() {
        // 1000 completed income, 400 completed expense; a 500 pending income
        // never reaches these rows.
        let summary = build_summary(&[row("income", 1000.0), row("expense", 400.0)]);
        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.total_expense, 400.0);
        assert_eq!(summary.net_profit, 600.0);
        assert_eq!(summary.profit_margin, 60.0);
    }

    #[test]
    fn margin_is_zero_without_income() {
        let summary = build_summary(&[row("expense", 250.0)]);
        assert_eq!(summary.net_profit, -250.0);
        assert_eq!(summary.profit_margin, 0.0);
    }

    #[test]
    fn margin_rounds_to_two_decimals() {
        let summary = build_summary(&[row("income", 300.0), row("expense", 100.0)]);
        assert_eq!(summary.profit_margin, 66.67);
    }

    #[test]
    fn densification_always_yields_twelve_months() {
        let rows = vec![
            MonthTotalRow {
                month: 3,
                transaction_type: "income".to_string(),
                total: 500.0,
            },
            MonthTotalRow {
                month: 3,
                transaction_type: "expense".to_string(),
                total: 120.0,
            },
        ];
        let report = densify_months(&rows);
        assert_eq!(report.len(), 12);
        assert_eq!(
            report[2],
            MonthlyReportRow {
                month: 3,
                income: 500.0,
                expense: 120.0
            }
        );
        for (i, entry) in report.iter().enumerate() {
            assert_eq!(entry.month as usize, i + 1);
            if i != 2 {
                assert_eq!(entry.income, 0.0);
                assert_eq!(entry.expense, 0.0);
            }
        }
    }

    #[test]
    fn category_totals_fold_to_the_same_summary() {
        // Grouping by (category, type) and re-summing per type must agree
        // with the direct per-type totals.
        let categories = [
            CategoryBreakdownRow {
                category: "Sales".to_string(),
                transaction_type: TransactionType::Income,
                total: 700.0,
                count: 2,
            },
            CategoryBreakdownRow {
                category: "Services".to_string(),
                transaction_type: TransactionType::Income,
                total: 300.0,
                count: 1,
            },
            CategoryBreakdownRow {
                category: "Operations".to_string(),
                transaction_type: TransactionType::Expense,
                total: 400.0,
                count: 3,
            },
        ];

        let mut folded: Vec<TypeTotalRow> = Vec::new();
        for c in &categories {
            let key = c.transaction_type.as_str();
            match folded.iter_mut().find(|r| r.transaction_type == key) {
                Some(r) => r.total += c.total,
                None => folded.push(row(key, c.total)),
            }
        }

        let from_categories = build_summary(&folded);
        let direct = build_summary(&[row("income", 1000.0), row("expense", 400.0)]);
        assert_eq!(from_categories.total_income, direct.total_income);
        assert_eq!(from_categories.total_expense, direct.total_expense);
        assert_eq!(from_categories.profit_margin, direct.profit_margin);
    }

    #[test]
    fn densification_of_empty_input_is_all_zeros() {
        let report = densify_months(&[]);
        assert_eq!(report.len(), 12);
        assert!(report.iter().all(|m| m.income == 0.0 && m.expense == 0.0));
    }
}
