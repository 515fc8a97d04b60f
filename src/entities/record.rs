// 🧾 Line Item Records - expense and income entries
//
// "The id is IDENTITY (never changes), name/amount/category are VALUES"
//
// Updates never touch a record in place: the store builds a merged copy from
// a `RecordPatch` and swaps it into the same slot of the list.

use serde::{Deserialize, Deserializer, Serialize};

use super::category::{ExpenseCategory, IncomeCategory};

// ============================================================================
// LINE ITEM
// ============================================================================

/// One expense or income entry.
///
/// Serialized as `{ "id", "name", "amount", "category" }`, which is the
/// persisted snapshot layout for both lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem<C> {
    /// Stable identity (UUID v4) - NEVER changes
    pub id: String,

    /// Display label
    pub name: String,

    /// Monthly amount in the user's currency
    #[serde(deserialize_with = "null_as_zero")]
    pub amount: f64,

    pub category: C,
}

/// serde_json writes NaN and infinities as `null`; read those back as 0 so
/// one bad number cannot make the whole snapshot unreadable.
pub(crate) fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

pub type ExpenseRecord = LineItem<ExpenseCategory>;
pub type IncomeRecord = LineItem<IncomeCategory>;

impl<C: Copy> LineItem<C> {
    /// Create a record with a fresh random identity
    pub fn new(name: impl Into<String>, amount: f64, category: C) -> Self {
        LineItem {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            amount,
            category,
        }
    }

    /// Build the replacement for this record with `patch` merged over it.
    ///
    /// The id is carried over unchanged; absent patch fields keep their
    /// current values.
    pub fn merged(&self, patch: &RecordPatch<C>) -> Self {
        LineItem {
            id: self.id.clone(),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            amount: patch.amount.unwrap_or(self.amount),
            category: patch.category.unwrap_or(self.category),
        }
    }
}

// ============================================================================
// PARTIAL UPDATE
// ============================================================================

/// Partial update for a line item. Has no id field by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch<C> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<C>,
}

impl<C> Default for RecordPatch<C> {
    fn default() -> Self {
        RecordPatch {
            name: None,
            amount: None,
            category: None,
        }
    }
}

impl<C> RecordPatch<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: C) -> Self {
        self.category = Some(category);
        self
    }

    /// True when the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.category.is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
