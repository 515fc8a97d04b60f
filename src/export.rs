// 📤 CSV Export - one row per line item
//
// Header: kind,id,name,category,amount
// Expenses first, then additional income, each in list order.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::entities::{ItemCategory, LineItem};
use crate::state::FinancialState;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    kind: &'static str,
    id: &'a str,
    name: &'a str,
    category: &'static str,
    amount: f64,
}

impl<'a> ExportRow<'a> {
    fn from_item<C: ItemCategory>(kind: &'static str, item: &'a LineItem<C>) -> Self {
        ExportRow {
            kind,
            id: &item.id,
            name: &item.name,
            category: item.category.as_str(),
            amount: item.amount,
        }
    }
}

/// Write every record as CSV. Returns the number of data rows written.
pub fn export_csv<W: Write>(state: &FinancialState, writer: W) -> Result<usize> {
    // Header written by hand so an empty export still carries it
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(["kind", "id", "name", "category", "amount"])
        .context("failed to write CSV header")?;

    let rows = state
        .expenses
        .iter()
        .map(|item| ExportRow::from_item("expense", item))
        .chain(
            state
                .additional_income
                .iter()
                .map(|item| ExportRow::from_item("income", item)),
        );

    let mut count = 0;
    for row in rows {
        csv_writer
            .serialize(&row)
            .with_context(|| format!("failed to write row for {}", row.id))?;
        count += 1;
    }

    csv_writer.flush().context("failed to flush CSV output")?;
    Ok(count)
}

/// Export to a file, creating or truncating it
pub fn export_to_path(state: &FinancialState, path: &Path) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    export_csv(state, file)
}

/// `salary-calculator-YYYY-MM-DD.csv`
pub fn default_export_path(date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("salary-calculator-{}.csv", date.format("%Y-%m-%d")))
}
