// 💰 Financial State - the canonical records and their derived totals
//
// The snapshot written to local storage is this struct minus `hydrated`:
//
//   { "salary": 0, "expenses": [...], "additionalIncome": [...] }
//
// Derived values are computed on demand and never cached.

use serde::{Deserialize, Serialize};

use crate::entities::record::null_as_zero;
use crate::entities::{ExpenseRecord, IncomeRecord, LineItem};

/// Salary, expense list and additional-income list.
///
/// Missing snapshot fields fall back to their defaults on load, so a snapshot
/// that only carries `salary` still restores cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialState {
    /// Monthly base salary
    #[serde(deserialize_with = "null_as_zero")]
    pub salary: f64,

    /// Expense line items, in insertion order
    pub expenses: Vec<ExpenseRecord>,

    /// Additional-income line items, in insertion order
    pub additional_income: Vec<IncomeRecord>,

    /// Set once the persisted snapshot has been loaded (or found absent).
    /// Never persisted.
    #[serde(skip)]
    pub hydrated: bool,
}

impl FinancialState {
    /// Sum of every expense amount (0 when there are none)
    pub fn total_expenses(&self) -> f64 {
        sum_amounts(&self.expenses)
    }

    /// Sum of every additional-income amount (0 when there are none)
    pub fn total_additional_income(&self) -> f64 {
        sum_amounts(&self.additional_income)
    }

    /// Salary plus additional income
    pub fn total_income(&self) -> f64 {
        self.salary + self.total_additional_income()
    }

    /// `salary + additional income - expenses`. May be negative.
    pub fn net_income(&self) -> f64 {
        self.salary + self.total_additional_income() - self.total_expenses()
    }

    pub fn find_expense(&self, id: &str) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn find_income(&self, id: &str) -> Option<&IncomeRecord> {
        self.additional_income.iter().find(|i| i.id == id)
    }

    /// Drop records whose id already appeared earlier in the same list.
    /// Returns how many were removed.
    pub(crate) fn dedup_ids(&mut self) -> usize {
        dedup_by_id(&mut self.expenses) + dedup_by_id(&mut self.additional_income)
    }
}

fn sum_amounts<C>(items: &[LineItem<C>]) -> f64 {
    items.iter().map(|item| item.amount).sum()
}

fn dedup_by_id<C>(items: &mut Vec<LineItem<C>>) -> usize {
    let before = items.len();
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.id.clone()));
    before - items.len()
}

// ============================================================================
// TESTS
// ============================================================================
