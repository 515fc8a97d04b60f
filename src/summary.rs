// 📊 Summary - percentage breakdowns over a FinancialState
//
// Pure functions of the current state. Rounding and currency formatting are
// left to whoever displays the numbers.

use serde::Serialize;

use crate::entities::{ExpenseCategory, IncomeCategory, ItemCategory, LineItem};
use crate::state::FinancialState;

/// Expenses and savings as a share of total income (salary + additional).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakdown {
    /// total expenses / total income * 100
    pub expense_ratio: f64,

    /// net income / total income * 100 (negative on a deficit)
    pub savings_rate: f64,
}

/// One category's total and its share of its list's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare<C> {
    pub category: C,
    pub count: usize,
    pub total: f64,
    pub percentage: f64,
}

/// Every derived figure in one value, for printing or serializing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub salary: f64,
    pub total_expenses: f64,
    pub total_additional_income: f64,
    pub total_income: f64,
    pub net_income: f64,
    pub breakdown: Option<Breakdown>,
}

impl FinancialState {
    /// Percentage breakdown, or `None` when total income is not positive
    pub fn breakdown(&self) -> Option<Breakdown> {
        let total_income = self.total_income();
        if total_income <= 0.0 {
            return None;
        }

        Some(Breakdown {
            expense_ratio: self.total_expenses() / total_income * 100.0,
            savings_rate: self.net_income() / total_income * 100.0,
        })
    }

    pub fn expenses_by_category(&self) -> Vec<CategoryShare<ExpenseCategory>> {
        category_shares(&self.expenses)
    }

    pub fn income_by_category(&self) -> Vec<CategoryShare<IncomeCategory>> {
        category_shares(&self.additional_income)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            salary: self.salary,
            total_expenses: self.total_expenses(),
            total_additional_income: self.total_additional_income(),
            total_income: self.total_income(),
            net_income: self.net_income(),
            breakdown: self.breakdown(),
        }
    }
}

/// Group items by category in `ALL` order, skipping empty categories.
fn category_shares<C: ItemCategory>(items: &[LineItem<C>]) -> Vec<CategoryShare<C>> {
    let grand_total: f64 = items.iter().map(|item| item.amount).sum();

    C::ALL
        .iter()
        .filter_map(|category| {
            let matching: Vec<&LineItem<C>> =
                items.iter().filter(|item| item.category == *category).collect();
            if matching.is_empty() {
                return None;
            }

            let total: f64 = matching.iter().map(|item| item.amount).sum();
            let percentage = if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            };

            Some(CategoryShare {
                category: *category,
                count: matching.len(),
                total,
                percentage,
            })
        })
        .collect()
}
