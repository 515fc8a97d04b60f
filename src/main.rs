// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use salary_calculator::config::{Cli, Command, Config};
use salary_calculator::logging::{self, LogTarget};
use salary_calculator::{default_export_path, export_to_path, CalculatorStore, ItemCategory};

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse());
    config.ensure_data_dir()?;

    // The UI owns the terminal, so its logs go to a file
    let target = match config.command {
        Command::Ui => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    let _guard = logging::init(&config, target)?;

    info!(
        data_dir = %config.data_dir.display(),
        backend = ?config.backend,
        "starting salary-calculator {}",
        salary_calculator::VERSION
    );

    let storage = config.open_storage()?;
    let store = CalculatorStore::open(storage);

    match config.command.clone() {
        Command::Ui => run_ui_mode(store)?,
        Command::Summary => run_summary(&store),
        Command::Export { path } => run_export(&store, path)?,
    }

    Ok(())
}

fn run_summary(store: &CalculatorStore) {
    let summary = store.state().summary();

    println!("💰 Monthly Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Salary:             {:>14.2}", summary.salary);
    println!("Additional income:  {:>14.2}", summary.total_additional_income);
    println!("Total income:       {:>14.2}", summary.total_income);
    println!("Total expenses:     {:>14.2}", summary.total_expenses);
    println!("Net income:         {:>14.2}", summary.net_income);

    if summary.net_income >= 0.0 {
        println!("✓ Available for savings");
    } else {
        println!("⚠️  Budget deficit");
    }

    if let Some(breakdown) = summary.breakdown {
        println!("\n📊 Breakdown");
        println!("Expense ratio:      {:>13.1}%", breakdown.expense_ratio);
        println!("Savings rate:       {:>13.1}%", breakdown.savings_rate);
    }

    let expense_shares = store.state().expenses_by_category();
    if !expense_shares.is_empty() {
        println!("\n📂 Expenses by category");
        for share in expense_shares {
            println!(
                "  {:<20} {:>3} × {:>12.2}  {:>5.1}%",
                share.category.label(),
                share.count,
                share.total,
                share.percentage
            );
        }
    }

    let income_shares = store.state().income_by_category();
    if !income_shares.is_empty() {
        println!("\n📂 Additional income by category");
        for share in income_shares {
            println!(
                "  {:<20} {:>3} × {:>12.2}  {:>5.1}%",
                share.category.label(),
                share.count,
                share.total,
                share.percentage
            );
        }
    }
}

fn run_export(store: &CalculatorStore, path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| default_export_path(chrono::Local::now().date_naive()));

    let count = export_to_path(store.state(), &path)?;
    info!(rows = count, path = %path.display(), "export finished");
    println!("✓ Exported {} records to {}", count, path.display());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(store: CalculatorStore) -> Result<()> {
    let mut app = ui::App::new(store);
    ui::run_ui(&mut app)?;

    println!("✅ Budget saved. See you next month!");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_store: CalculatorStore) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: salary-calculator summary");
    std::process::exit(1);
}
