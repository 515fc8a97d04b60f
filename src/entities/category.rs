// 🏷️ Categories - closed enumerations for expense and income line items
//
// The persisted form is the kebab-case value ("side-income"), the display
// form is the label ("Side Income"). Both lists end with `Custom`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SHARED BEHAVIOUR
// ============================================================================

/// Behaviour shared by both category enumerations.
///
/// `ALL` fixes the display order used by forms and breakdowns.
pub trait ItemCategory: Copy + PartialEq + fmt::Debug + 'static {
    /// Every variant, in display order
    const ALL: &'static [Self];

    /// Persisted value (e.g. "rental")
    fn as_str(&self) -> &'static str;

    /// Human label (e.g. "Rent/Mortgage")
    fn label(&self) -> &'static str;

    /// Parse a persisted value, case-insensitive
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }

    /// Position of this variant inside `ALL`
    fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    /// Next variant, wrapping around
    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous variant, wrapping around
    fn previous(&self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

// ============================================================================
// EXPENSE CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseCategory {
    #[default]
    Groceries,
    Rental,
    Utilities,
    Transport,
    Healthcare,
    Entertainment,
    Custom,
}

impl ItemCategory for ExpenseCategory {
    const ALL: &'static [Self] = &[
        ExpenseCategory::Groceries,
        ExpenseCategory::Rental,
        ExpenseCategory::Utilities,
        ExpenseCategory::Transport,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Custom,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Rental => "rental",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Healthcare => "healthcare",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Custom => "custom",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::Rental => "Rent/Mortgage",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Transport => "Transportation",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Custom => "Custom",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// INCOME CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncomeCategory {
    #[default]
    SideIncome,
    Investment,
    Freelance,
    Bonus,
    Custom,
}

impl ItemCategory for IncomeCategory {
    const ALL: &'static [Self] = &[
        IncomeCategory::SideIncome,
        IncomeCategory::Investment,
        IncomeCategory::Freelance,
        IncomeCategory::Bonus,
        IncomeCategory::Custom,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::SideIncome => "side-income",
            IncomeCategory::Investment => "investment",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Bonus => "bonus",
            IncomeCategory::Custom => "custom",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IncomeCategory::SideIncome => "Side Income",
            IncomeCategory::Investment => "Investment Returns",
            IncomeCategory::Freelance => "Freelance",
            IncomeCategory::Bonus => "Bonus/Commission",
            IncomeCategory::Custom => "Custom",
        }
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_values_match_as_str() {
        for category in ExpenseCategory::ALL {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
        for category in IncomeCategory::ALL {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_side_income_is_kebab_case() {
        let parsed: IncomeCategory = serde_json::from_str("\"side-income\"").unwrap();
        assert_eq!(parsed, IncomeCategory::SideIncome);
    }

    #[test]
    fn test_unknown_value_rejected() {
        let parsed: Result<ExpenseCategory, _> = serde_json::from_str("\"travel\"");
        assert!(parsed.is_err());
        assert_eq!(ExpenseCategory::parse("travel"), None);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ExpenseCategory::parse("Rental"), Some(ExpenseCategory::Rental));
        assert_eq!(IncomeCategory::parse(" BONUS "), Some(IncomeCategory::Bonus));
    }

    #[test]
    fn test_labels() {
        assert_eq!(ExpenseCategory::Rental.label(), "Rent/Mortgage");
        assert_eq!(ExpenseCategory::Transport.to_string(), "Transportation");
        assert_eq!(IncomeCategory::Investment.label(), "Investment Returns");
        assert_eq!(IncomeCategory::Bonus.to_string(), "Bonus/Commission");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Groceries);
        assert_eq!(IncomeCategory::default(), IncomeCategory::SideIncome);
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(ExpenseCategory::Custom.next(), ExpenseCategory::Groceries);
        assert_eq!(ExpenseCategory::Groceries.previous(), ExpenseCategory::Custom);
        assert_eq!(IncomeCategory::SideIncome.next(), IncomeCategory::Investment);
        assert_eq!(IncomeCategory::SideIncome.previous(), IncomeCategory::Custom);
    }

    #[test]
    fn test_both_lists_end_with_custom() {
        assert_eq!(ExpenseCategory::ALL.last(), Some(&ExpenseCategory::Custom));
        assert_eq!(IncomeCategory::ALL.last(), Some(&IncomeCategory::Custom));
        assert_eq!(ExpenseCategory::ALL.len(), 7);
        assert_eq!(IncomeCategory::ALL.len(), 5);
    }
}
