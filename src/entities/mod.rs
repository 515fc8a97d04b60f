// Entity Models - line items and their categories
//
// Each record has:
// - Stable identity (UUID) assigned once by the store
// - Values (name, amount, category) replaced wholesale on update
// - A closed category enumeration per list (expense vs income)

pub mod category;
pub mod record;

pub use category::{ExpenseCategory, IncomeCategory, ItemCategory};
pub use record::{ExpenseRecord, IncomeRecord, LineItem, RecordPatch};
