// Salary Calculator - Core Library
// State container, storage backends and export, shared by the CLI and tests

pub mod config;
pub mod entities;
pub mod export;
pub mod logging;
pub mod state;
pub mod storage;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use entities::{
    ExpenseCategory, ExpenseRecord, IncomeCategory, IncomeRecord, ItemCategory, LineItem,
    RecordPatch,
};
pub use export::{default_export_path, export_csv, export_to_path};
pub use state::FinancialState;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, SqliteStorage};
pub use store::{CalculatorStore, ListenerId, STORAGE_KEY};
pub use summary::{Breakdown, CategoryShare, Summary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
