//! Pure functions that aggregate a list of transactions into the dashboard
//! numbers.

use serde::Serialize;

use crate::transaction::{Transaction, TransactionKind};

/// The maximum number of categories shown in the expense breakdown.
pub const BREAKDOWN_LIMIT: usize = 8;

/// The headline numbers shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// How many transactions were aggregated.
    pub transaction_count: usize,
}

/// One slice of the expense breakdown: a category and its share of total
/// expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// The name of the category.
    pub category: String,
    /// The total amount spent in the category.
    pub amount: f64,
    /// The category's share of total expenses, from 0 to 100.
    pub percentage: f64,
}

/// Sum `transactions` into the dashboard's headline numbers.
pub fn compute_stats(transactions: &[Transaction]) -> DashboardStats {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Income => total_income += transaction.amount,
            TransactionKind::Expense => total_expenses += transaction.amount,
        }
    }

    DashboardStats {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        transaction_count: transactions.len(),
    }
}

/// Total the expenses in `transactions` per category, largest first,
/// keeping at most [BREAKDOWN_LIMIT] categories.
///
/// Categories with equal totals keep the order in which they first appear
/// in `transactions`. Percentages are of total expenses and are all zero
/// when there are no expenses.
pub fn expense_breakdown(transactions: &[Transaction]) -> Vec<CategoryExpense> {
    // Accumulate into a Vec instead of a HashMap to keep first-seen order
    // for the tie-break. The category count is small enough that the linear
    // scan does not matter.
    let mut totals: Vec<(String, f64)> = Vec::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Expense {
            continue;
        }

        match totals
            .iter_mut()
            .find(|(category, _)| category == &transaction.category)
        {
            Some((_, amount)) => *amount += transaction.amount,
            None => totals.push((transaction.category.clone(), transaction.amount)),
        }
    }

    let total_expenses: f64 = totals.iter().map(|(_, amount)| amount).sum();

    totals.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    totals.truncate(BREAKDOWN_LIMIT);

    totals
        .into_iter()
        .map(|(category, amount)| CategoryExpense {
            category,
            amount,
            percentage: if total_expenses > 0.0 {
                amount / total_expenses * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::{
        transaction::{Transaction, TransactionKind},
        user::UserID,
    };

    use super::{BREAKDOWN_LIMIT, compute_stats, expense_breakdown};

    fn transaction(id: i64, kind: TransactionKind, category: &str, amount: f64) -> Transaction {
        Transaction {
            id,
            user_id: UserID::new(1),
            date: date!(2026 - 05 - 01),
            description: "test".to_owned(),
            category: category.to_owned(),
            kind,
            amount,
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            transaction(1, TransactionKind::Income, "Sueldo", 1000.0),
            transaction(2, TransactionKind::Expense, "Alimentación", 200.0),
            transaction(3, TransactionKind::Expense, "Alimentación", 300.0),
            transaction(4, TransactionKind::Expense, "Transporte", 500.0),
        ]
    }

    #[test]
    fn stats_sum_income_and_expenses() {
        let stats = compute_stats(&sample_transactions());

        assert_eq!(stats.total_income, 1000.0);
        assert_eq!(stats.total_expenses, 1000.0);
        assert_eq!(stats.balance, 0.0);
        assert_eq!(stats.transaction_count, 4);
    }

    #[test]
    fn stats_of_empty_list_are_zero() {
        let stats = compute_stats(&[]);

        assert_eq!(stats.total_income, 0.0);
        assert_eq!(stats.total_expenses, 0.0);
        assert_eq!(stats.balance, 0.0);
        assert_eq!(stats.transaction_count, 0);
    }

    #[test]
    fn balance_can_be_negative() {
        let transactions = vec![
            transaction(1, TransactionKind::Income, "Sueldo", 100.0),
            transaction(2, TransactionKind::Expense, "Vivienda", 250.0),
        ];

        let stats = compute_stats(&transactions);

        assert_eq!(stats.balance, -150.0);
    }

    #[test]
    fn breakdown_totals_expenses_per_category() {
        let breakdown = expense_breakdown(&sample_transactions());

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Alimentación");
        assert_eq!(breakdown[0].amount, 500.0);
        assert_eq!(breakdown[0].percentage, 50.0);
        assert_eq!(breakdown[1].category, "Transporte");
        assert_eq!(breakdown[1].amount, 500.0);
        assert_eq!(breakdown[1].percentage, 50.0);
    }

    #[test]
    fn breakdown_ignores_income() {
        let transactions = vec![transaction(1, TransactionKind::Income, "Sueldo", 1000.0)];

        assert!(expense_breakdown(&transactions).is_empty());
    }

    #[test]
    fn breakdown_tie_break_keeps_first_seen_order() {
        let transactions = vec![
            transaction(1, TransactionKind::Expense, "Transporte", 50.0),
            transaction(2, TransactionKind::Expense, "Alimentación", 50.0),
        ];

        let breakdown = expense_breakdown(&transactions);

        assert_eq!(breakdown[0].category, "Transporte");
        assert_eq!(breakdown[1].category, "Alimentación");
    }

    #[test]
    fn breakdown_is_limited_to_the_largest_categories() {
        let transactions: Vec<_> = (0..12)
            .map(|i| {
                transaction(
                    i,
                    TransactionKind::Expense,
                    &format!("Category {i}"),
                    (i + 1) as f64,
                )
            })
            .collect();

        let breakdown = expense_breakdown(&transactions);

        assert_eq!(breakdown.len(), BREAKDOWN_LIMIT);
        assert_eq!(breakdown[0].category, "Category 11");
        assert_eq!(breakdown[BREAKDOWN_LIMIT - 1].category, "Category 4");
    }

    #[test]
    fn percentages_are_zero_without_expenses() {
        let transactions = vec![
            transaction(1, TransactionKind::Income, "Sueldo", 1000.0),
            // A zero-amount expense cannot be created through the API but the
            // aggregation must not divide by zero regardless.
            transaction(2, TransactionKind::Expense, "Otros", 0.0),
        ];

        let breakdown = expense_breakdown(&transactions);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].percentage, 0.0);
    }
}
